#![cfg(feature = "serde")]

use entities::{EngineConfig, Handle, ResetPhase};

#[test]
fn partial_config_fills_defaults() {
    let config: EngineConfig = serde_json::from_str(r#"{ "index_bits": 11, "handle_deletions": true }"#).unwrap();
    assert_eq!(config.index_bits, 11);
    assert!(config.handle_deletions);
    assert_eq!(config.serial_bits, EngineConfig::source2().serial_bits);
    assert!(config.create_trailer_varuint);
}

#[test]
fn config_roundtrips() {
    let config = EngineConfig::source1();
    let json = serde_json::to_string(&config).unwrap();
    let back: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn handle_is_a_bare_number() {
    assert_eq!(serde_json::to_string(&Handle::new(448)).unwrap(), "448");
    assert_eq!(serde_json::to_string(&ResetPhase::Complete).unwrap(), "\"Complete\"");
}

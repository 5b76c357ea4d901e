#![cfg(feature = "serde")]

use fieldpath::{DecoderOptions, FieldPath};

#[test]
fn field_path_serializes_as_segment_list() {
    let path = FieldPath::from_slice(&[4, 0, 12]).unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "[4,0,12]");
    let back: FieldPath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);
}

#[test]
fn oversized_path_is_rejected() {
    let result: Result<FieldPath, _> = serde_json::from_str("[0,0,0,0,0,0,0,0]");
    assert!(result.is_err());
    let result: Result<FieldPath, _> = serde_json::from_str("[]");
    assert!(result.is_err());
}

#[test]
fn decoder_options_fill_missing_fields() {
    let options: DecoderOptions = serde_json::from_str(r#"{"signed_non_topo_deltas":true}"#).unwrap();
    assert!(options.signed_non_topo_deltas);
    assert_eq!(options.max_paths, DecoderOptions::default().max_paths);
}

//! Packet-entities message layout for capture decoding.
//!
//! This crate reads the structural parts of the entity update message: the
//! message fields, the per-directive headers (slot index and lifecycle kind)
//! and the explicit deletion list. Class ids, serials and field data inside
//! a directive are read by the entity engine.

mod deletions;
mod directive;
mod error;
mod limits;
mod packet;

pub use deletions::{read_deletions, write_deletions};
pub use directive::{read_entity_header, DirectiveKind, EntityHeader};
pub use error::{DecodeError, LimitKind, WireResult};
pub use limits::Limits;
pub use packet::PacketEntities;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Limits::default();
        let _ = PacketEntities::full(0, &[]);
        let _ = DirectiveKind::Update;
        let _: WireResult<()> = Ok(());
    }
}

//! Resource bounds for untrusted messages.

/// Limits checked before a packet-entities message is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of directives in one message.
    pub max_updated_entries: usize,

    /// Maximum length of the entity data payload in bytes.
    pub max_entity_data_bytes: usize,

    /// Maximum number of entries in the trailing deletion list.
    pub max_deletions: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // One directive per slot of a 14-bit index space
            max_updated_entries: 1 << 14,
            max_entity_data_bytes: 1024 * 1024,
            max_deletions: 1 << 14,
        }
    }
}

impl Limits {
    /// Small bounds that tests can reach.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_updated_entries: 64,
            max_entity_data_bytes: 4096,
            max_deletions: 64,
        }
    }

    /// No bounds at all.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_updated_entries: usize::MAX,
            max_entity_data_bytes: usize::MAX,
            max_deletions: usize::MAX,
        }
    }
}

use serde::{Deserialize, Serialize};

/// What to do when two tiles carry the same type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypePolicy {
    /// Accept silently
    Ignore,
    /// Accept and emit a `tracing` warning
    #[default]
    Warn,
    /// Reject with [`TileSetError::DuplicateType`](crate::TileSetError::DuplicateType)
    Deny,
}

/// Loader options. Deserializable so a host can keep them in its own config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Handling of repeated tile types
    pub duplicate_types: TypePolicy,
    /// Drop custom properties with an unknown `type` instead of failing
    pub skip_unknown_property_types: bool,
}

impl LoadOptions {
    /// Options that turn every soft check into a hard error.
    pub fn strict() -> Self {
        LoadOptions {
            duplicate_types: TypePolicy::Deny,
            skip_unknown_property_types: false,
        }
    }
}

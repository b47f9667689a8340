//! Configuration types deserialized from `diagram.toml`.

use serde::Deserialize;

/// Upper bound accepted for `cache.initial_capacity`.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// The top-level configuration parsed from `diagram.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DiagramConfig {
    /// Diagram cache tuning.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Tuning knobs for the diagram cache.
///
/// None of these change what the cache returns; they only affect
/// allocation and log volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of subject entries to pre-allocate storage for.
    pub initial_capacity: usize,
    /// Emit a `trace`-level event for every cache hit.
    pub trace_hits: bool,
}

//! Memoizing diagram cache.
//!
//! [`DiagramCache`] builds a diagram for a subject once, through a
//! [`DiagramBuilder`], and hands back the stored instance on later requests.
//! Subjects are keyed by reference identity. Subjects that expose a
//! [`Kind`] keep one diagram per kind. Staleness is declared by the caller
//! through [`DiagramCache::refresh`]; the cache never inspects subjects for
//! changes on its own.

#![warn(missing_docs)]

mod build_lock;
pub mod builder;
pub mod cache;
pub mod entry;
pub mod error;
pub mod global;
pub mod stats;

pub use builder::{DiagramBuilder, Diagrammable};
pub use cache::DiagramCache;
pub use diagram_common::Kind;
pub use diagram_config::CacheConfig;
pub use error::{DiagramError, DiagramResult};
pub use global::GlobalCache;
pub use stats::CacheStats;

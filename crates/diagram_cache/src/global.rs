//! Process-wide cache instances.

use std::sync::OnceLock;

use tracing::debug;

use crate::builder::DiagramBuilder;
use crate::cache::DiagramCache;

/// Lazily constructed, process-lifetime [`DiagramCache`].
///
/// Meant to live in a `static`:
///
/// ```ignore
/// static DIAGRAMS: GlobalCache<NodeBuilder> = GlobalCache::new(make_cache);
///
/// fn make_cache() -> DiagramCache<NodeBuilder> {
///     DiagramCache::new(NodeBuilder::default())
/// }
///
/// let diagram = DIAGRAMS.instance().diagram(&node)?;
/// ```
///
/// The constructor runs exactly once, on the first call to
/// [`instance`](Self::instance), even when several threads race for it.
/// The cache is never torn down.
pub struct GlobalCache<B: DiagramBuilder> {
    cell: OnceLock<DiagramCache<B>>,
    init: fn() -> DiagramCache<B>,
}

impl<B: DiagramBuilder> GlobalCache<B> {
    /// Creates an uninitialized holder that will build its cache with `init`.
    pub const fn new(init: fn() -> DiagramCache<B>) -> Self {
        Self {
            cell: OnceLock::new(),
            init,
        }
    }

    /// The shared cache, constructed on first access.
    pub fn instance(&self) -> &DiagramCache<B> {
        self.cell.get_or_init(|| {
            debug!(builder = std::any::type_name::<B>(), "initializing diagram cache");
            (self.init)()
        })
    }

    /// The shared cache, if it has been constructed.
    pub fn get(&self) -> Option<&DiagramCache<B>> {
        self.cell.get()
    }
}

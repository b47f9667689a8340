//! The diagram cache.
//!
//! `DiagramCache` ties the builder, identity-keyed storage and per-subject
//! build locks into the get-or-build / refresh interface callers use.

use std::collections::HashMap;
use std::sync::Arc;

use diagram_common::Kind;
use diagram_config::CacheConfig;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::build_lock::BuildLocks;
use crate::builder::{DiagramBuilder, Diagrammable};
use crate::entry::{Slot, SubjectKey};
use crate::error::{DiagramError, DiagramResult};
use crate::stats::{CacheStats, Counters};

type Slots<B> =
    HashMap<SubjectKey, Slot<<B as DiagramBuilder>::Subject, <B as DiagramBuilder>::Diagram>>;

/// Memoizing store of diagrams keyed by subject identity.
///
/// A subject is diagrammed once; later requests return the stored
/// `Arc` until the caller declares the subject stale with
/// [`refresh`](Self::refresh). Subjects that report a [`Kind`] keep one
/// diagram per kind, so switching a subject back to an earlier kind finds
/// the diagram built for it then.
///
/// Storage holds subjects weakly: the cache never keeps a subject alive.
pub struct DiagramCache<B: DiagramBuilder> {
    builder: B,
    slots: RwLock<Slots<B>>,
    build_locks: BuildLocks,
    trace_hits: bool,
    counters: Counters,
}

impl<B: DiagramBuilder> DiagramCache<B> {
    /// Creates an empty cache with default configuration.
    pub fn new(builder: B) -> Self {
        Self::with_config(builder, &CacheConfig::default())
    }

    /// Creates an empty cache tuned by `config`.
    pub fn with_config(builder: B, config: &CacheConfig) -> Self {
        Self {
            builder,
            slots: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            build_locks: BuildLocks::default(),
            trace_hits: config.trace_hits,
            counters: Counters::default(),
        }
    }

    /// The builder this cache delegates to.
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Returns the subject's diagram, building and storing it on first request.
    ///
    /// For a kinded subject the diagram for its *current* kind is returned;
    /// a kind not seen before is built and added next to the stored ones.
    /// Repeated calls return the same `Arc` until [`refresh`](Self::refresh).
    pub fn diagram(&self, subject: &Arc<B::Subject>) -> DiagramResult<Arc<B::Diagram>, B::Error> {
        self.check(subject)?;
        let key = SubjectKey::of(subject);
        let kind = subject.kind();

        if let Some(diagram) = self.lookup(key, kind) {
            self.hit(subject, kind);
            return Ok(diagram);
        }

        self.build_locks.with(key, || -> DiagramResult<_, B::Error> {
            // The kind may have moved while we waited; store under the one built from.
            let kind = subject.kind();
            // Another caller may have committed while we waited for the lock.
            if let Some(diagram) = self.lookup(key, kind) {
                self.hit(subject, kind);
                return Ok(diagram);
            }

            self.counters.miss();
            debug!(?subject, ?kind, "building diagram");
            let diagram = self.assemble(subject)?;
            self.commit(subject, key, kind, Arc::clone(&diagram));
            Ok(diagram)
        })
    }

    /// Rebuilds the subject's diagram unconditionally and stores the result.
    ///
    /// This is how callers report that a subject changed since it was last
    /// diagrammed. Only the diagram for the subject's current kind is
    /// replaced; diagrams stored under other kinds are kept. The returned
    /// `Arc` is what [`diagram`](Self::diagram) returns afterwards.
    pub fn refresh(&self, subject: &Arc<B::Subject>) -> DiagramResult<Arc<B::Diagram>, B::Error> {
        self.check(subject)?;
        let key = SubjectKey::of(subject);

        self.build_locks.with(key, || -> DiagramResult<_, B::Error> {
            let kind = subject.kind();
            let diagram = self.assemble(subject)?;
            self.counters.refresh();
            let replaced = self.commit(subject, key, kind, Arc::clone(&diagram));
            debug!(
                ?subject,
                ?kind,
                replaced = replaced.is_some(),
                "diagram refreshed"
            );
            Ok(diagram)
        })
    }

    /// Whether any diagram is stored for the subject, whatever its kind.
    ///
    /// Never fails; subjects that are not diagrammable simply have no entry.
    pub fn exists(&self, subject: &Arc<B::Subject>) -> bool {
        self.slots
            .read()
            .get(&SubjectKey::of(subject))
            .is_some_and(Slot::is_live)
    }

    /// Whether a diagram is stored for the subject's *current* kind.
    ///
    /// Always `false` for subjects without a kind. After a subject's kind
    /// changes this reports `false` until a diagram is built for the new
    /// kind, even though the old kind's diagram is still stored.
    pub fn kind_exists(&self, subject: &Arc<B::Subject>) -> bool {
        match subject.kind() {
            Some(kind) => self.lookup(SubjectKey::of(subject), Some(kind)).is_some(),
            None => false,
        }
    }

    /// The stored diagram for the subject's current kind, without building.
    pub fn stored(&self, subject: &Arc<B::Subject>) -> DiagramResult<Arc<B::Diagram>, B::Error> {
        self.lookup(SubjectKey::of(subject), subject.kind())
            .ok_or_else(|| not_found(subject))
    }

    /// The diagram stored for the subject under `kind`, without building.
    ///
    /// Unlike [`stored`](Self::stored) this ignores the subject's current
    /// kind, so diagrams for kinds the subject has since left stay reachable.
    pub fn stored_kind(
        &self,
        subject: &Arc<B::Subject>,
        kind: Kind,
    ) -> DiagramResult<Arc<B::Diagram>, B::Error> {
        self.lookup(SubjectKey::of(subject), Some(kind))
            .ok_or_else(|| not_found(subject))
    }

    /// Kinds with a stored diagram for the subject, sorted by name.
    pub fn kinds(&self, subject: &Arc<B::Subject>) -> Vec<Kind> {
        self.slots
            .read()
            .get(&SubjectKey::of(subject))
            .filter(|slot| slot.is_live())
            .map(|slot| slot.entry.kinds())
            .unwrap_or_default()
    }

    /// Number of subjects with a stored entry.
    pub fn len(&self) -> usize {
        self.slots.read().values().filter(|s| s.is_live()).count()
    }

    /// Returns `true` if no subject has a stored entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose subject has been released. Returns how many.
    pub fn purge_released(&self) -> usize {
        let mut slots = self.slots.write();
        let before = slots.len();
        slots.retain(|_, slot| slot.is_live());
        let removed = before - slots.len();
        debug!(removed, remaining = slots.len(), "purged released subjects");
        removed
    }

    /// Snapshot of this cache's counters.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    fn check(&self, subject: &Arc<B::Subject>) -> DiagramResult<(), B::Error> {
        if self.builder.is_diagrammable(subject) {
            return Ok(());
        }
        self.counters.rejection();
        warn!(?subject, "subject is not diagrammable");
        Err(DiagramError::InvalidArgument {
            subject: format!("{subject:?}"),
        })
    }

    fn assemble(&self, subject: &Arc<B::Subject>) -> DiagramResult<Arc<B::Diagram>, B::Error> {
        let diagram = self.builder.build(subject).map_err(DiagramError::Build)?;
        self.counters.build();
        Ok(Arc::new(diagram))
    }

    fn lookup(&self, key: SubjectKey, kind: Option<Kind>) -> Option<Arc<B::Diagram>> {
        self.slots
            .read()
            .get(&key)
            .filter(|slot| slot.is_live())
            .and_then(|slot| slot.entry.lookup(kind))
            .cloned()
    }

    /// Stores `diagram`, returning the diagram it replaced for the same kind.
    fn commit(
        &self,
        subject: &Arc<B::Subject>,
        key: SubjectKey,
        kind: Option<Kind>,
        diagram: Arc<B::Diagram>,
    ) -> Option<Arc<B::Diagram>> {
        let mut slots = self.slots.write();
        match slots.get_mut(&key) {
            Some(slot) if slot.is_live() => slot.entry.store(kind, diagram),
            _ => {
                // Absent, or left behind by a released subject at this address.
                slots.insert(key, Slot::new(subject, kind, diagram));
                None
            }
        }
    }

    fn hit(&self, subject: &Arc<B::Subject>, kind: Option<Kind>) {
        self.counters.hit();
        if self.trace_hits {
            trace!(?subject, ?kind, "diagram cache hit");
        }
    }
}

fn not_found<S: ?Sized + Diagrammable, E>(subject: &Arc<S>) -> DiagramError<E> {
    DiagramError::NotFound {
        subject: format!("{subject:?}"),
    }
}

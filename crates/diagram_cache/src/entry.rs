//! Storage entries: one per subject, flat or partitioned by kind.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use diagram_common::Kind;

/// Reference-identity key of a subject: the address of its `Arc` allocation.
///
/// Only meaningful while the subject is alive; [`Slot`] keeps a `Weak` so a
/// reused address can be told apart from the original subject.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubjectKey(usize);

impl SubjectKey {
    /// Key of the allocation `subject` points to.
    pub fn of<S: ?Sized>(subject: &Arc<S>) -> Self {
        Self(Arc::as_ptr(subject).cast::<()>() as usize)
    }
}

/// The diagram(s) stored for one subject.
#[derive(Debug)]
pub enum Entry<D> {
    /// A subject without kinds has exactly one diagram.
    Flat(Arc<D>),
    /// A kinded subject has at most one diagram per kind.
    Partitioned(HashMap<Kind, Arc<D>>),
}

impl<D> Entry<D> {
    /// Creates the entry shape matching `kind`.
    pub fn new(kind: Option<Kind>, diagram: Arc<D>) -> Self {
        match kind {
            Some(kind) => Entry::Partitioned(HashMap::from([(kind, diagram)])),
            None => Entry::Flat(diagram),
        }
    }

    /// The diagram matching `kind`, if stored.
    ///
    /// A flat entry only answers `None` kinds and a partitioned entry only
    /// answers `Some` kinds.
    pub fn lookup(&self, kind: Option<Kind>) -> Option<&Arc<D>> {
        match (self, kind) {
            (Entry::Flat(diagram), None) => Some(diagram),
            (Entry::Partitioned(kinds), Some(kind)) => kinds.get(&kind),
            _ => None,
        }
    }

    /// Stores `diagram` under `kind`, returning the diagram it replaced.
    ///
    /// Other kinds of a partitioned entry are left alone. If the entry's
    /// shape no longer matches the subject, the whole entry is replaced.
    pub fn store(&mut self, kind: Option<Kind>, diagram: Arc<D>) -> Option<Arc<D>> {
        match (&mut *self, kind) {
            (Entry::Partitioned(kinds), Some(kind)) => kinds.insert(kind, diagram),
            (Entry::Flat(previous), None) => Some(std::mem::replace(previous, diagram)),
            _ => {
                *self = Entry::new(kind, diagram);
                None
            }
        }
    }

    /// Whether this entry is partitioned by kind.
    pub fn is_partitioned(&self) -> bool {
        matches!(self, Entry::Partitioned(_))
    }

    /// Kinds stored in this entry, sorted by name. Empty for flat entries.
    pub fn kinds(&self) -> Vec<Kind> {
        match self {
            Entry::Flat(_) => Vec::new(),
            Entry::Partitioned(kinds) => {
                let mut out: Vec<Kind> = kinds.keys().copied().collect();
                out.sort_by_key(|k| k.name());
                out
            }
        }
    }
}

/// A stored entry together with a non-owning handle to its subject.
#[derive(Debug)]
pub struct Slot<S: ?Sized, D> {
    /// The subject this entry belongs to.
    pub subject: Weak<S>,
    /// The stored diagram(s).
    pub entry: Entry<D>,
}

impl<S: ?Sized, D> Slot<S, D> {
    /// Creates a slot for `subject` holding a single diagram.
    pub fn new(subject: &Arc<S>, kind: Option<Kind>, diagram: Arc<D>) -> Self {
        Self {
            subject: Arc::downgrade(subject),
            entry: Entry::new(kind, diagram),
        }
    }

    /// Whether the subject that created this slot is still alive.
    ///
    /// A dead slot found under a live subject's key belongs to an earlier
    /// allocation at the same address.
    pub fn is_live(&self) -> bool {
        self.subject.strong_count() > 0
    }
}

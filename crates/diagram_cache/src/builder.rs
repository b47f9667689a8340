//! Collaborator traits: what the cache needs from subjects and from the
//! component that actually assembles diagrams.

use std::fmt;

use diagram_common::Kind;

/// A value the cache can key diagrams on.
///
/// Subjects are handed to the cache as `Arc<Self>` and are keyed by the
/// allocation, not by value.
pub trait Diagrammable: fmt::Debug + Send + Sync + 'static {
    /// The subject's current kind.
    ///
    /// Returning `Some` selects kind-partitioned storage: one diagram per
    /// kind the subject has been diagrammed under. `None` selects a single
    /// flat diagram.
    fn kind(&self) -> Option<Kind> {
        None
    }
}

/// Assembles diagrams for subjects.
///
/// Implementations may call back into the cache from [`build`](Self::build)
/// to obtain diagrams for other subjects.
pub trait DiagramBuilder: Send + Sync + 'static {
    /// The subject type diagrams are built for.
    type Subject: ?Sized + Diagrammable;

    /// The diagram produced for a subject.
    type Diagram: Send + Sync + 'static;

    /// Failure reported by [`build`](Self::build).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether a diagram can be built for `subject`. Must be side-effect free.
    fn is_diagrammable(&self, subject: &Self::Subject) -> bool;

    /// Assembles a fresh diagram for `subject`.
    fn build(&self, subject: &Self::Subject) -> Result<Self::Diagram, Self::Error>;
}

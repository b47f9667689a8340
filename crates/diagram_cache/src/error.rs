//! Error types for diagram cache operations.

/// Result alias for cache operations driven by a builder with error type `E`.
pub type DiagramResult<T, E> = Result<T, DiagramError<E>>;

/// Errors returned by [`DiagramCache`](crate::DiagramCache) operations.
///
/// `E` is the builder's own error type. Build failures are passed through
/// untouched in [`DiagramError::Build`].
#[derive(Debug, thiserror::Error)]
pub enum DiagramError<E> {
    /// The subject failed the builder's diagrammability predicate.
    #[error("`{subject}` is not diagrammable")]
    InvalidArgument {
        /// Debug rendering of the rejected subject.
        subject: String,
    },

    /// No diagram is stored for the subject (or for the requested kind).
    ///
    /// Only the non-building accessors return this.
    #[error("`{subject}`'s diagram was never assembled")]
    NotFound {
        /// Debug rendering of the subject.
        subject: String,
    },

    /// The builder failed.
    #[error(transparent)]
    Build(E),
}

impl<E> DiagramError<E> {
    /// Returns the builder error, if this is a build failure.
    pub fn into_build(self) -> Option<E> {
        match self {
            DiagramError::Build(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("layout exploded")]
    struct LayoutError;

    #[test]
    fn invalid_argument_display() {
        let err: DiagramError<LayoutError> = DiagramError::InvalidArgument {
            subject: "42".to_string(),
        };
        assert_eq!(err.to_string(), "`42` is not diagrammable");
    }

    #[test]
    fn not_found_display() {
        let err: DiagramError<LayoutError> = DiagramError::NotFound {
            subject: "Node(a)".to_string(),
        };
        assert_eq!(err.to_string(), "`Node(a)`'s diagram was never assembled");
    }

    #[test]
    fn build_error_is_transparent() {
        let err: DiagramError<LayoutError> = DiagramError::Build(LayoutError);
        assert_eq!(err.to_string(), "layout exploded");
        assert!(err.into_build().is_some());
    }

    #[test]
    fn into_build_on_other_variants() {
        let err: DiagramError<LayoutError> = DiagramError::NotFound {
            subject: "x".to_string(),
        };
        assert!(err.into_build().is_none());
    }
}

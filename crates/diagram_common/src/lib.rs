//! Shared foundational types for the diagram cache workspace.
//!
//! This crate provides interned identifiers and the [`Kind`] classifier that
//! partitions the diagrams cached for a single subject.

#![warn(missing_docs)]

pub mod ident;
pub mod kind;

pub use ident::{Ident, Interner};
pub use kind::Kind;

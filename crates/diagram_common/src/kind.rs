//! Kinds partition the diagrams cached for one subject.
//!
//! A subject whose type exposes a kind gets one diagram per kind it has been
//! diagrammed under. Kinds are interned names, so comparing and hashing them
//! is a `u32` operation.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ident::{Ident, Interner};

/// Process-wide interner for kind names, constructed on first use.
static KINDS: OnceLock<Interner> = OnceLock::new();

fn kinds() -> &'static Interner {
    KINDS.get_or_init(Interner::new)
}

/// A variant classification exposed by kind-partitioned subjects.
///
/// Two kinds are equal exactly when they were created from the same name.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Kind(Ident);

impl Kind {
    /// Returns the kind with the given name, interning it if needed.
    pub fn named(name: &str) -> Self {
        Self(kinds().get_or_intern(name))
    }

    /// Returns the kind with the given name only if it was seen before.
    pub fn existing(name: &str) -> Option<Self> {
        kinds().get(name).map(Self)
    }

    /// The name this kind was created from.
    pub fn name(self) -> &'static str {
        kinds().resolve(self.0)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.name())
    }
}

// Serialized by name: raw indices depend on interning order.
impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Kind::named(&name))
    }
}

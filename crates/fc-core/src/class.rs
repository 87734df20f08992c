//! The two mutually-exclusive actor classes.
//!
//! Exactly two classes exist.  Code that needs per-class counters indexes a
//! `[T; 2]` with [`Class::index`] rather than matching on every access.

use std::str::FromStr;

use crate::FcError;

/// Class membership of an actor, fixed for its lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Class {
    A,
    B,
}

impl Class {
    /// Both classes, in index order.
    pub const ALL: [Class; 2] = [Class::A, Class::B];

    /// The class that may never share the facility with `self`.
    #[inline]
    pub fn opposite(self) -> Class {
        match self {
            Class::A => Class::B,
            Class::B => Class::A,
        }
    }

    /// Position of this class in a per-class `[T; 2]` array.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Class::A => 0,
            Class::B => 1,
        }
    }

    /// Short label, used in log lines and CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Class::A => "A",
            Class::B => "B",
        }
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Class {
    type Err = FcError;

    /// Accepts `a`/`b` in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(Class::A),
            "b" | "B" => Ok(Class::B),
            other => Err(FcError::Parse(format!("unknown class {other:?} (expected A or B)"))),
        }
    }
}

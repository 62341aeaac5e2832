//! Strongly-typed identifiers used across the engine.
//!
//! Registration order is the only ordering forks have; it is carried as a
//! `ForkIndex` rather than a raw `usize`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(v: u32) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(ForkIndex);

impl ForkIndex {
    /// Position in registration order, usable as a slice index.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

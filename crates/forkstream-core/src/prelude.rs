//! Convenient re-exports for downstream crates.

pub use crate::config::{ForkConfig, TraversalPolicy};
pub use crate::error::{Error, Result};
pub use crate::failure::{BoxError, ForkFailure, SharedError, TraversalFailure};
pub use crate::id::ForkIndex;
pub use crate::notice::{Notice, NoticeTable};
pub use crate::state::ForkState;

#![forbid(unsafe_code)]
//! forkstream-core: shared vocabulary for the forkstream engine.
//!
//! Errors, fork failure causes, fork lifecycle states, configuration, and the
//! injected notice table live here. The exec crate owns every thread and
//! channel; nothing in this crate spawns or blocks.

pub mod config;
pub mod error;
pub mod failure;
pub mod id;
pub mod notice;
pub mod prelude;
pub mod require;
pub mod state;

pub use config::{ForkConfig, TraversalPolicy};
pub use error::{Error, Result};
pub use failure::{BoxError, ForkFailure, SharedError, TraversalFailure};
pub use id::ForkIndex;
pub use notice::{Notice, NoticeFn, NoticeTable};
pub use state::ForkState;

/// Crate version, recorded in dispatch reports for provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![forbid(unsafe_code)]
//! forkstream: traverse a single-pass sequence once and replay it, in full
//! and in order, to any number of concurrently running forks.
//!
//! ```
//! use forkstream::StreamForks;
//!
//! let words = ["alpha", "beta", "gamma"];
//! let mut forks = StreamForks::new(words.iter().copied());
//! forks
//!     .fork("count", |s| s.count())?
//!     .fork("longest", |s| s.max_by_key(|w: &&str| w.len()))?;
//! let results = forks.execute()?;
//!
//! assert_eq!(*results.get::<usize>(&"count")?, 3);
//! assert_eq!(*results.get::<Option<&'static str>>(&"longest")?, Some("gamma"));
//! # Ok::<(), forkstream::Error>(())
//! ```
//!
//! The pieces live in two crates: `forkstream-core` (errors, failures,
//! configuration) and `forkstream-exec` (channels, dispatcher, workers,
//! collector). This crate re-exports both.

pub use forkstream_core::prelude::*;
pub use forkstream_core::{config, error, failure, notice, require, VERSION};
pub use forkstream_exec::{
    channel, DispatchReport, Dispatcher, ForkResults, ForkStream, StreamForks,
};

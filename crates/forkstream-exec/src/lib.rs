#![forbid(unsafe_code)]
//! forkstream-exec: single-pass dispatch of one source to many concurrent forks.
//!
//! `StreamForks` collects `key -> transform` pairs. `execute` gives every fork
//! its own unbounded channel and worker thread, walks the source once on the
//! caller's thread broadcasting each element, closes every channel with an
//! end-of-stream marker, and hands back a `ForkResults` to read outcomes from.

pub mod channel;
pub mod collector;
pub mod dispatcher;
pub mod failpoints;
pub mod metrics;
pub mod registry;
pub mod stream;
pub mod worker;

pub use collector::ForkResults;
pub use dispatcher::{DispatchReport, Dispatcher};
pub use registry::StreamForks;
pub use stream::ForkStream;

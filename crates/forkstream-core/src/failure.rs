//! Failure causes captured at the worker boundary.
//!
//! A `ForkFailure` is stored once per fork and handed out on every read, so it
//! must be cheap to clone: user causes are kept behind an `Arc`.

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

/// Owned, type-erased error accepted from user code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared form of [`BoxError`], cloned into every read of an outcome.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The source sequence itself failed while the dispatcher was reading it.
#[derive(Debug, Clone, Error)]
#[error("source traversal failed after {elements_read} element(s): {cause}")]
pub struct TraversalFailure {
    /// Elements successfully read (and broadcast) before the failure.
    pub elements_read: u64,
    #[source]
    pub cause: SharedError,
}

impl TraversalFailure {
    pub fn new(elements_read: u64, cause: impl Into<BoxError>) -> Self {
        Self {
            elements_read,
            cause: Arc::from(cause.into()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ForkFailure {
    /// The transform returned an error.
    #[error("transform failed: {0}")]
    Transform(#[source] SharedError),

    /// The transform panicked; the payload is rendered to text.
    #[error("transform panicked: {0}")]
    Panicked(String),

    /// The fork's channel closed before the end-of-stream marker arrived.
    #[error("fork stream interrupted before end of stream")]
    Interrupted,

    /// The source failed and the engine is configured to fail every fork.
    #[error(transparent)]
    Traversal(#[from] TraversalFailure),
}

impl ForkFailure {
    /// Wrap any error raised by user code.
    pub fn transform(err: impl Into<BoxError>) -> Self {
        ForkFailure::Transform(Arc::from(err.into()))
    }

    /// Convert a panic payload (from `catch_unwind` or a thread join).
    pub fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ForkFailure::Panicked(msg)
    }
}

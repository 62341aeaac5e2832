use thiserror::Error;

use crate::failure::ForkFailure;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Every error the public API can return.
///
/// Misuse variants carry a rendered `message` produced by the configured
/// [`NoticeTable`](crate::notice::NoticeTable); `key` is the `Debug` rendering
/// of the caller's key.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    UnknownKey { key: String, message: String },

    #[error("{message}")]
    DuplicateKey { key: String, message: String },

    #[error("{message}")]
    AlreadyStarted { message: String },

    #[error("{message}")]
    AlreadyTaken { key: String, message: String },

    #[error("{message}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        message: String,
    },

    /// The fork ran and failed; the original cause stays reachable through
    /// `source()`.
    #[error("fork {key} failed: {failure}")]
    Fork {
        key: String,
        #[source]
        failure: ForkFailure,
    },

    #[error("failed to spawn fork worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The fork failure behind this error, if it is one.
    pub fn fork_failure(&self) -> Option<&ForkFailure> {
        match self {
            Error::Fork { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// True for errors caused by calling the API in the wrong order or with
    /// the wrong key, as opposed to a fork or the source failing.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Error::UnknownKey { .. }
                | Error::DuplicateKey { .. }
                | Error::AlreadyStarted { .. }
                | Error::AlreadyTaken { .. }
                | Error::TypeMismatch { .. }
        )
    }
}

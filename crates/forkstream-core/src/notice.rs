//! Message table for misuse errors.
//!
//! Messages are produced by plain `fn` pointers held in a table that travels
//! with the [`ForkConfig`](crate::config::ForkConfig). Callers who want
//! different wording (or a different language) build their own table; there
//! is no process-wide state.

use std::fmt;

use crate::error::Error;

/// Renders a message for one subject (usually the `Debug` form of a key).
pub type NoticeFn = fn(&str) -> String;

/// The kinds of message the table can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    UnknownKey,
    DuplicateKey,
    AlreadyStarted,
    AlreadyTaken,
    TypeMismatch,
}

#[derive(Clone, Copy)]
pub struct NoticeTable {
    pub unknown_key: NoticeFn,
    pub duplicate_key: NoticeFn,
    /// Called with an empty subject.
    pub already_started: NoticeFn,
    pub already_taken: NoticeFn,
    /// Called with `"<key> as <type>"`.
    pub type_mismatch: NoticeFn,
}

impl Default for NoticeTable {
    fn default() -> Self {
        Self {
            unknown_key: |key| format!("no fork registered under key {key}"),
            duplicate_key: |key| format!("a fork is already registered under key {key}"),
            already_started: |_| "fork registry has already been executed".to_string(),
            already_taken: |key| format!("result of fork {key} has already been taken"),
            type_mismatch: |subject| format!("fork result {subject} has a different type"),
        }
    }
}

impl fmt::Debug for NoticeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoticeTable").finish_non_exhaustive()
    }
}

impl NoticeTable {
    /// Render the message for `notice` about `subject`.
    pub fn render(&self, notice: Notice, subject: &str) -> String {
        let f = match notice {
            Notice::UnknownKey => self.unknown_key,
            Notice::DuplicateKey => self.duplicate_key,
            Notice::AlreadyStarted => self.already_started,
            Notice::AlreadyTaken => self.already_taken,
            Notice::TypeMismatch => self.type_mismatch,
        };
        f(subject)
    }

    pub fn unknown_key(&self, key: &str) -> Error {
        Error::UnknownKey {
            key: key.to_string(),
            message: self.render(Notice::UnknownKey, key),
        }
    }

    pub fn duplicate_key(&self, key: &str) -> Error {
        Error::DuplicateKey {
            key: key.to_string(),
            message: self.render(Notice::DuplicateKey, key),
        }
    }

    pub fn already_started(&self) -> Error {
        Error::AlreadyStarted {
            message: self.render(Notice::AlreadyStarted, ""),
        }
    }

    pub fn already_taken(&self, key: &str) -> Error {
        Error::AlreadyTaken {
            key: key.to_string(),
            message: self.render(Notice::AlreadyTaken, key),
        }
    }

    pub fn type_mismatch(&self, key: &str, expected: &'static str) -> Error {
        Error::TypeMismatch {
            key: key.to_string(),
            expected,
            message: self.render(Notice::TypeMismatch, &format!("{key} as {expected}")),
        }
    }
}

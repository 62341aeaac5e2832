//! Per-fork lifecycle: `Pending -> Running -> {Completed | Failed}`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ForkState {
    /// Worker spawned, transform not yet entered.
    Pending = 0,
    Running = 1,
    Completed = 2,
    Failed = 3,
}

impl ForkState {
    /// Decode a value previously produced by `as u8`. Unknown values map to
    /// `Failed` so a corrupted slot can never look healthy.
    pub const fn from_u8(v: u8) -> Self {
        match v {
            0 => ForkState::Pending,
            1 => ForkState::Running,
            2 => ForkState::Completed,
            _ => ForkState::Failed,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ForkState::Completed | ForkState::Failed)
    }
}

impl fmt::Display for ForkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ForkState::Pending => "pending",
            ForkState::Running => "running",
            ForkState::Completed => "completed",
            ForkState::Failed => "failed",
        };
        f.write_str(s)
    }
}

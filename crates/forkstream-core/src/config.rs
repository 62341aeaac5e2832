//! Engine configuration that downstream crates can serialize/deserialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notice::NoticeTable;

/// What a recorded source failure does to the forks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalPolicy {
    /// Every fork outcome reports the traversal failure once its worker has
    /// finished, whatever its transform returned.
    #[default]
    FailForks,
    /// Forks see a truncated sequence and keep their own outcome. The failure
    /// is only visible through `ForkResults::traversal_failure`.
    Truncate,
}

impl FromStr for TraversalPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-forks" | "fail_forks" | "fail" => Ok(TraversalPolicy::FailForks),
            "truncate" => Ok(TraversalPolicy::Truncate),
            other => Err(Error::Config(format!("unknown traversal policy '{other}'"))),
        }
    }
}

impl fmt::Display for TraversalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalPolicy::FailForks => f.write_str("fail-forks"),
            TraversalPolicy::Truncate => f.write_str("truncate"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkConfig {
    /// Worker threads are named `{prefix}-{index}`.
    pub thread_name_prefix: String,

    /// Stack size for worker threads; `None` uses the platform default.
    pub worker_stack_size: Option<usize>,

    pub traversal_policy: TraversalPolicy,

    /// Message table for misuse errors. Not serialized.
    #[serde(skip)]
    pub notices: NoticeTable,
}

impl Default for ForkConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "fork".to_string(),
            worker_stack_size: None,
            traversal_policy: TraversalPolicy::FailForks,
            notices: NoticeTable::default(),
        }
    }
}

impl ForkConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `FORKSTREAM_THREAD_PREFIX`: worker thread name prefix
    /// - `FORKSTREAM_STACK_SIZE`: worker stack size in bytes
    /// - `FORKSTREAM_TRAVERSAL_POLICY`: `fail-forks` or `truncate`
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("FORKSTREAM_THREAD_PREFIX") {
            if !s.trim().is_empty() {
                cfg.thread_name_prefix = s;
            }
        }

        if let Ok(s) = std::env::var("FORKSTREAM_STACK_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.worker_stack_size = Some(v);
            }
        }

        if let Ok(s) = std::env::var("FORKSTREAM_TRAVERSAL_POLICY") {
            if let Ok(v) = s.parse::<TraversalPolicy>() {
                cfg.traversal_policy = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.thread_name_prefix.trim().is_empty() {
            return Err(Error::Config("thread_name_prefix must not be empty".into()));
        }
        if self.worker_stack_size == Some(0) {
            return Err(Error::Config("worker_stack_size must be non-zero".into()));
        }
        Ok(())
    }

    pub fn with_traversal_policy(mut self, policy: TraversalPolicy) -> Self {
        self.traversal_policy = policy;
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn with_notices(mut self, notices: NoticeTable) -> Self {
        self.notices = notices;
        self
    }

    /// Name for the worker at `index`.
    pub fn thread_name(&self, index: usize) -> String {
        format!("{}-{}", self.thread_name_prefix, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = ForkConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.traversal_policy, TraversalPolicy::FailForks);
        assert_eq!(cfg.thread_name(3), "fork-3");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let cfg = ForkConfig::default().with_thread_name_prefix("  ");
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let cfg = ForkConfig {
            worker_stack_size: Some(0),
            ..ForkConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn policy_parses_from_text() {
        assert_eq!("truncate".parse::<TraversalPolicy>().unwrap(), TraversalPolicy::Truncate);
        assert_eq!(" Fail-Forks ".parse::<TraversalPolicy>().unwrap(), TraversalPolicy::FailForks);
        assert!("sometimes".parse::<TraversalPolicy>().is_err());
        assert_eq!(TraversalPolicy::Truncate.to_string(), "truncate");
    }

    #[test]
    fn serde_skips_notices_and_fills_defaults() {
        let cfg: ForkConfig =
            serde_json::from_str(r#"{"traversal_policy":"truncate"}"#).unwrap();
        assert_eq!(cfg.traversal_policy, TraversalPolicy::Truncate);
        assert_eq!(cfg.thread_name_prefix, "fork");

        let json = serde_json::to_value(&cfg).unwrap();
        assert!(json.get("notices").is_none());
        assert_eq!(json["traversal_policy"], "truncate");
    }

    // Only test in this binary that touches these variables.
    #[test]
    fn from_env_reads_overrides() {
        std::env::set_var("FORKSTREAM_THREAD_PREFIX", "replay");
        std::env::set_var("FORKSTREAM_STACK_SIZE", "262144");
        std::env::set_var("FORKSTREAM_TRAVERSAL_POLICY", "truncate");

        let cfg = ForkConfig::from_env();

        std::env::remove_var("FORKSTREAM_THREAD_PREFIX");
        std::env::remove_var("FORKSTREAM_STACK_SIZE");
        std::env::remove_var("FORKSTREAM_TRAVERSAL_POLICY");

        assert_eq!(cfg.thread_name_prefix, "replay");
        assert_eq!(cfg.worker_stack_size, Some(262_144));
        assert_eq!(cfg.traversal_policy, TraversalPolicy::Truncate);
    }
}

//! Chaos/failpoint hooks (feature: `failpoints`).
//!
//! Keep this extremely light: the macro expands to nothing unless the feature
//! is enabled. When enabled, a point panics if its name equals the value of
//! `FORKSTREAM_FAILPOINT`.

/// Environment variable naming the failpoint to trigger.
pub const FAILPOINT_ENV: &str = "FORKSTREAM_FAILPOINT";

#[cfg(feature = "failpoints")]
#[macro_export]
macro_rules! fail_point {
    ($name:expr) => {{
        if ::std::env::var($crate::failpoints::FAILPOINT_ENV).as_deref() == Ok($name) {
            panic!("failpoint triggered: {}", $name);
        }
    }};
}

#[cfg(not(feature = "failpoints"))]
#[macro_export]
macro_rules! fail_point {
    ($name:expr) => {
        // no-op
        let _ = $name;
    };
}

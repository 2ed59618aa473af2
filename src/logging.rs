//! Logging facade for the router.
//!
//! The macros below forward to the [`log`](https://docs.rs/log) crate or to
//! [`tracing`](https://docs.rs/tracing), selected by cargo feature. Enable at
//! most one of the two.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! What the router reports at each level:
//!
//! - `trace_log!` — pattern compilation, cache hits and misses.
//! - `debug_log!` — ignored navigations, stack dispatch, queued and superseded requests.
//! - `info_log!` — route and stack registration, completed navigations.
//! - `warn_log!` — swallowed analytics failures, pages a stack could not resolve.
//! - `error_log!` — transitions that could not be started after a queue flush.
//!
//! ```ignore
//! use page_navigator::{debug_log, warn_log};
//!
//! debug_log!("Resolving '{}' against {} routes", path, count);
//! warn_log!("Analytics sink failed for '{}': {}", path, err);
//! ```

/// Log target shared by every router message, so hosts can filter on it.
pub const LOG_TARGET: &str = "page_navigator";

/// Emit a **trace**-level message: finest-grained diagnostics.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **debug**-level message: routing decisions useful while debugging.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **info**-level message: registration and completed navigations.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **warn**-level message: recoverable problems the router swallowed.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **error**-level message: failures the router could not hand back to a caller.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

//! Error handling for the router.
//!
//! Two kinds of outcome leave the router:
//!
//! - [`NavigationResult`] — the normal result of resolving a URL
//!   (`Success`, `NotFound`, `Unchanged`, `Ignored`). An unmatched URL is a
//!   value, never an error.
//! - [`RouterError`] — configuration mistakes, reversal failures and
//!   collaborator failures that must reach the call site.
//!
//! # Examples
//!
//! ```
//! use page_navigator::error::{NavigationResult, RouterError};
//!
//! let result = NavigationResult::NotFound { path: "/app/nope".into() };
//! assert!(result.is_not_found());
//! assert_eq!(result.path(), Some("/app/nope"));
//!
//! let err = RouterError::DuplicateStack { name: "main".into() };
//! assert_eq!(err.to_string(), "Stack 'main' is already registered");
//! ```

use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of resolving a URL against the route table.
///
/// Returned by [`Router::open_url`](crate::Router::open_url) and the other
/// navigation entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// A route matched and its stack accepted the page.
    Success { path: String },
    /// No route matched; the not-found page (if configured) was shown.
    NotFound { path: String },
    /// The path is the one already resolved; nothing was dispatched.
    Unchanged { path: String },
    /// The router is stopped or paused.
    Ignored,
}

impl NavigationResult {
    /// Check if a route matched
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if no route matched
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if resolution was skipped because the path did not change
    pub fn is_unchanged(&self) -> bool {
        matches!(self, NavigationResult::Unchanged { .. })
    }

    /// Check if the router ignored the navigation
    pub fn is_ignored(&self) -> bool {
        matches!(self, NavigationResult::Ignored)
    }

    /// The resolved path, including the base.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Success { path }
            | NavigationResult::NotFound { path }
            | NavigationResult::Unchanged { path } => Some(path),
            NavigationResult::Ignored => None,
        }
    }
}

// ============================================================================
// Router errors
// ============================================================================

/// Why a page resolver could not produce a page factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing is registered under this name.
    NotFound { name: String },
    /// Something is registered but could not be loaded.
    Failed { name: String, message: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound { name } => write!(f, "No page registered as '{}'", name),
            ResolveError::Failed { name, message } => {
                write!(f, "Page '{}' failed to load: {}", name, message)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Errors raised by route registration, reversal and stack dispatch.
///
/// Configuration and reversal errors indicate a mismatch between the route
/// table and application code; they are returned at the call site rather
/// than logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A route declaration has an empty page name
    EmptyPageName { template: String },

    /// A route template does not compile to a valid pattern
    InvalidTemplate { template: String, message: String },

    /// A placeholder names a rule other than `string`, `number` or `any`
    UnknownParamRule { template: String, rule: String },

    /// A stack name was registered twice
    DuplicateStack { name: String },

    /// A matched route targets a stack that was never registered
    UnknownStack { name: String },

    /// No declared route can produce a URL for this target
    RouteNotFound {
        page: String,
        action: String,
        stack: String,
    },

    /// The page resolver failed and no not-found callback was configured
    PageResolution { page: String, source: ResolveError },

    /// The executor refused to run a transition
    Spawn { message: String },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::EmptyPageName { template } => {
                write!(f, "Route '{}' must name a page", template)
            }
            RouterError::InvalidTemplate { template, message } => {
                write!(f, "Invalid route template '{}': {}", template, message)
            }
            RouterError::UnknownParamRule { template, rule } => {
                write!(
                    f,
                    "Unknown parameter rule '{}' in route '{}' (expected string, number or any)",
                    rule, template
                )
            }
            RouterError::DuplicateStack { name } => {
                write!(f, "Stack '{}' is already registered", name)
            }
            RouterError::UnknownStack { name } => {
                write!(f, "Stack '{}' is not registered", name)
            }
            RouterError::RouteNotFound {
                page,
                action,
                stack,
            } => {
                write!(
                    f,
                    "No route for page '{}', action '{}' on stack '{}'",
                    page, action, stack
                )
            }
            RouterError::PageResolution { page, source } => {
                write!(f, "Cannot show page '{}': {}", page, source)
            }
            RouterError::Spawn { message } => {
                write!(f, "Cannot start transition: {}", message)
            }
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::PageResolution { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

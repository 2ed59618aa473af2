//! Transition policies between an outgoing and an incoming page.
//!
//! A [`PageStack`](crate::PageStack) uses its policy every time it replaces
//! the page it displays:
//!
//! - [`TransitionPolicy::Sequential`] — the old page plays out, then the new
//!   page is created and plays in.
//! - [`TransitionPolicy::Crossed`] — the new page is created at once and both
//!   animations run together.
//! - [`TransitionPolicy::Controlled`] — the new page is created at once and a
//!   user-supplied [`TransitionController`] drives both pages.

use crate::page::{CompletionSignal, PageHandle};
use std::fmt;
use std::rc::Rc;

/// Drives a controlled transition.
///
/// Receives the outgoing page (`None` for the first page of a stack) and the
/// incoming page. The old page is released when the returned signal resolves.
pub type TransitionController = Rc<dyn Fn(Option<PageHandle>, PageHandle) -> CompletionSignal>;

/// How a stack sequences play-out and play-in.
#[derive(Default)]
pub enum TransitionPolicy {
    /// Play out, then create and play in.
    #[default]
    Sequential,

    /// Create first, then play in and out concurrently.
    Crossed,

    /// Create first, then hand both pages to a controller.
    Controlled(TransitionController),
}

impl fmt::Debug for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "TransitionPolicy::Sequential"),
            Self::Crossed => write!(f, "TransitionPolicy::Crossed"),
            Self::Controlled(_) => write!(f, "TransitionPolicy::Controlled(..)"),
        }
    }
}

impl Clone for TransitionPolicy {
    fn clone(&self) -> Self {
        match self {
            Self::Sequential => Self::Sequential,
            Self::Crossed => Self::Crossed,
            Self::Controlled(controller) => Self::Controlled(Rc::clone(controller)),
        }
    }
}

impl TransitionPolicy {
    /// Wrap a closure as a controlled policy.
    pub fn controlled<F>(controller: F) -> Self
    where
        F: Fn(Option<PageHandle>, PageHandle) -> CompletionSignal + 'static,
    {
        Self::Controlled(Rc::new(controller))
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Crossed => "crossed",
            Self::Controlled(_) => "controlled",
        }
    }

    /// Whether the incoming page is created before the outgoing one finished.
    pub fn creates_before_play_out(&self) -> bool {
        !matches!(self, Self::Sequential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::completed;

    #[test]
    fn test_default_is_sequential() {
        let policy = TransitionPolicy::default();
        assert!(matches!(policy, TransitionPolicy::Sequential));
        assert!(!policy.creates_before_play_out());
    }

    #[test]
    fn test_controlled_clone_shares_controller() {
        let policy = TransitionPolicy::controlled(|_, _| completed());
        let cloned = policy.clone();

        match (&policy, &cloned) {
            (TransitionPolicy::Controlled(a), TransitionPolicy::Controlled(b)) => {
                assert!(Rc::ptr_eq(a, b));
            }
            _ => panic!("expected controlled policies"),
        }
        assert_eq!(format!("{:?}", cloned), "TransitionPolicy::Controlled(..)");
        assert_eq!(cloned.name(), "controlled");
    }

    #[test]
    fn test_names() {
        assert_eq!(TransitionPolicy::Sequential.name(), "sequential");
        assert_eq!(TransitionPolicy::Crossed.name(), "crossed");
        assert!(TransitionPolicy::Crossed.creates_before_play_out());
    }
}

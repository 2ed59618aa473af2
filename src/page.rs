//! Pages and the collaborators that create and display them.
//!
//! A [`Page`] is whatever application object a stack shows. The crate only
//! needs three things from it: receiving an action, playing in and playing
//! out. Play-in and play-out return a [`CompletionSignal`] that resolves when
//! the page's animation (or any other asynchronous work) is done.
//!
//! Pages are created lazily through a [`PageResolver`], which maps a page
//! name to a [`PageFactory`]. [`PageRegistry`] is the built-in resolver.
//!
//! Displaying is delegated to a [`PageHost`]: the stack tells it when a page
//! instance is mounted and when it is released.
//!
//! # Example
//!
//! ```
//! use page_navigator::page::{completed, CompletionSignal, Page, PageRegistry, PageResolver};
//! use page_navigator::params::RouteParams;
//!
//! struct About;
//!
//! impl Page for About {
//!     fn action(&mut self, _action: &str, _params: &RouteParams) {}
//!     fn play_in(&mut self) -> CompletionSignal { completed() }
//!     fn play_out(&mut self) -> CompletionSignal { completed() }
//! }
//!
//! let mut registry = PageRegistry::new();
//! registry.register("About", || Box::new(About) as Box<dyn Page>);
//!
//! assert!(registry.resolve("About").is_ok());
//! assert!(registry.resolve("Contact").is_err());
//! ```

use crate::error::ResolveError;
use crate::params::RouteParams;
use futures::future::{self, FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Resolves once a page finished playing in or out.
pub type CompletionSignal = LocalBoxFuture<'static, ()>;

/// A signal that is already resolved.
pub fn completed() -> CompletionSignal {
    future::ready(()).boxed_local()
}

// ============================================================================
// Page
// ============================================================================

/// A page shown by a [`PageStack`](crate::PageStack).
pub trait Page {
    /// Run `action` with the route parameters.
    ///
    /// Called once after the page is created and again whenever the stack is
    /// asked to show the page it already displays.
    fn action(&mut self, action: &str, params: &RouteParams);

    /// Start the entry animation.
    fn play_in(&mut self) -> CompletionSignal;

    /// Start the exit animation.
    fn play_out(&mut self) -> CompletionSignal;
}

/// Shared handle to a live page instance.
///
/// The stack, the host and transition controllers all hold the same
/// instance. Borrows never outlive a single call, so signals may be awaited
/// while other code talks to the page.
#[derive(Clone)]
pub struct PageHandle {
    inner: Rc<RefCell<Box<dyn Page>>>,
}

impl PageHandle {
    pub fn new(page: Box<dyn Page>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(page)),
        }
    }

    pub fn action(&self, action: &str, params: &RouteParams) {
        self.inner.borrow_mut().action(action, params);
    }

    pub fn play_in(&self) -> CompletionSignal {
        self.inner.borrow_mut().play_in()
    }

    pub fn play_out(&self) -> CompletionSignal {
        self.inner.borrow_mut().play_out()
    }

    /// Whether both handles point to the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageHandle")
            .field("ptr", &Rc::as_ptr(&self.inner))
            .finish()
    }
}

// ============================================================================
// Factories and resolvers
// ============================================================================

/// Creates fresh instances of one page.
pub trait PageFactory {
    fn create(&self) -> Box<dyn Page>;
}

impl<F> PageFactory for F
where
    F: Fn() -> Box<dyn Page>,
{
    fn create(&self) -> Box<dyn Page> {
        self()
    }
}

/// Maps page names to factories.
pub trait PageResolver {
    fn resolve(&self, name: &str) -> Result<Rc<dyn PageFactory>, ResolveError>;
}

impl<F> PageResolver for F
where
    F: Fn(&str) -> Result<Rc<dyn PageFactory>, ResolveError>,
{
    fn resolve(&self, name: &str) -> Result<Rc<dyn PageFactory>, ResolveError> {
        self(name)
    }
}

/// Name → factory table.
#[derive(Default)]
pub struct PageRegistry {
    factories: HashMap<String, Rc<dyn PageFactory>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: PageFactory + 'static,
    {
        self.factories.insert(name.into(), Rc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl PageResolver for PageRegistry {
    fn resolve(&self, name: &str) -> Result<Rc<dyn PageFactory>, ResolveError> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                name: name.to_string(),
            })
    }
}

impl fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("PageRegistry").field("pages", &names).finish()
    }
}

// ============================================================================
// PageHost
// ============================================================================

/// Display surface of a stack.
pub trait PageHost {
    /// `page` became part of `stack` and should be displayed.
    fn mount(&self, stack: &str, page: &PageHandle);

    /// `page` left `stack` and may be discarded.
    fn release(&self, stack: &str, page: &PageHandle);
}

/// Host that displays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl PageHost for NoopHost {
    fn mount(&self, _stack: &str, _page: &PageHandle) {}

    fn release(&self, _stack: &str, _page: &PageHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter {
        actions: Rc<Cell<usize>>,
    }

    impl Page for Counter {
        fn action(&mut self, _action: &str, _params: &RouteParams) {
            self.actions.set(self.actions.get() + 1);
        }

        fn play_in(&mut self) -> CompletionSignal {
            completed()
        }

        fn play_out(&mut self) -> CompletionSignal {
            completed()
        }
    }

    #[test]
    fn test_registry_resolves_registered_factory() {
        let actions = Rc::new(Cell::new(0));
        let shared = Rc::clone(&actions);

        let mut registry = PageRegistry::new();
        registry.register("Counter", move || {
            Box::new(Counter {
                actions: Rc::clone(&shared),
            }) as Box<dyn Page>
        });

        let factory = registry.resolve("Counter").unwrap();
        let page = PageHandle::new(factory.create());
        page.action("index", &RouteParams::new());
        assert_eq!(actions.get(), 1);
    }

    #[test]
    fn test_registry_reports_missing_page() {
        let registry = PageRegistry::new();
        let err = registry.resolve("Missing").err().unwrap();
        assert_eq!(
            err,
            ResolveError::NotFound {
                name: "Missing".into()
            }
        );
    }

    #[test]
    fn test_handles_compare_by_instance() {
        let make = || {
            PageHandle::new(Box::new(Counter {
                actions: Rc::new(Cell::new(0)),
            }))
        };
        let first = make();
        let second = make();

        assert!(first.ptr_eq(&first.clone()));
        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn test_completed_signal_resolves() {
        pollster::block_on(completed());
    }
}

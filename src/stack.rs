//! Page stacks: one displayed page per named region of the UI.
//!
//! A [`PageStack`] owns the page it currently shows and replaces it when the
//! router dispatches a different page. Replacement follows the stack's
//! [`TransitionPolicy`]; the asynchronous part of a transition runs as a
//! task on the injected [`LocalSpawn`] executor.
//!
//! # Phases
//!
//! ```text
//! Sequential:          Idle → PlayingOut → PlayingIn → Idle
//! Crossed/Controlled:  Idle → Crossing → Idle
//! ```
//!
//! # Requests during a transition
//!
//! The latest request wins. A `show_page` issued while a transition runs is
//! resolved at once (so resolution errors still reach the caller) and parked
//! in a single pending slot, replacing any request parked earlier. The
//! parked request is dispatched when the transition finishes.
//!
//! # Example
//!
//! ```
//! use futures::executor::LocalPool;
//! use page_navigator::page::{completed, CompletionSignal, Page, PageRegistry};
//! use page_navigator::params::RouteParams;
//! use page_navigator::stack::PageStack;
//!
//! struct Home;
//!
//! impl Page for Home {
//!     fn action(&mut self, _action: &str, _params: &RouteParams) {}
//!     fn play_in(&mut self) -> CompletionSignal { completed() }
//!     fn play_out(&mut self) -> CompletionSignal { completed() }
//! }
//!
//! let mut pool = LocalPool::new();
//! let mut registry = PageRegistry::new();
//! registry.register("Home", || Box::new(Home) as Box<dyn Page>);
//!
//! let stack = PageStack::new("main", registry, pool.spawner());
//! assert!(stack.show_page("Home", "index", &RouteParams::new()).unwrap());
//!
//! pool.run_until_stalled();
//! assert_eq!(stack.current_page_name().as_deref(), Some("Home"));
//! assert!(!stack.is_in_transition());
//! ```

use crate::error::{ResolveError, RouterError};
use crate::page::{NoopHost, PageFactory, PageHandle, PageHost, PageResolver};
use crate::params::RouteParams;
use crate::transition::TransitionPolicy;
use crate::{debug_log, error_log, trace_log, warn_log};
use futures::future::{self, FutureExt};
use futures::task::{LocalSpawn, LocalSpawnExt};
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Where a stack is in its transition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackPhase {
    #[default]
    Idle,
    /// Sequential: waiting for the old page to finish playing out.
    PlayingOut,
    /// Sequential: waiting for the new page to finish playing in.
    PlayingIn,
    /// Crossed or controlled: waiting for every signal of the transition.
    Crossing,
}

/// Callback run when the resolver cannot produce a page.
pub type NotFoundCallback = Rc<dyn Fn(&str)>;

struct PendingRequest {
    page: String,
    action: String,
    params: RouteParams,
    factory: Rc<dyn PageFactory>,
}

#[derive(Default)]
struct StackState {
    current_name: Option<String>,
    current: Option<PageHandle>,
    phase: StackPhase,
    pending: Option<PendingRequest>,
}

struct StackInner {
    name: String,
    policy: TransitionPolicy,
    resolver: Rc<dyn PageResolver>,
    host: Rc<dyn PageHost>,
    spawner: Rc<dyn LocalSpawn>,
    on_not_found: Option<NotFoundCallback>,
    state: RefCell<StackState>,
}

/// A named region displaying one page at a time.
///
/// Cloning is cheap; clones share the same stack.
#[derive(Clone)]
pub struct PageStack {
    inner: Rc<StackInner>,
}

impl PageStack {
    /// Stack with the sequential policy and no host.
    pub fn new<R, S>(name: impl Into<String>, resolver: R, spawner: S) -> Self
    where
        R: PageResolver + 'static,
        S: LocalSpawn + 'static,
    {
        Self::builder(name, resolver, spawner).build()
    }

    pub fn builder<R, S>(name: impl Into<String>, resolver: R, spawner: S) -> PageStackBuilder
    where
        R: PageResolver + 'static,
        S: LocalSpawn + 'static,
    {
        PageStackBuilder {
            name: name.into(),
            resolver: Rc::new(resolver),
            spawner: Rc::new(spawner),
            policy: TransitionPolicy::default(),
            host: Rc::new(NoopHost),
            on_not_found: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn policy(&self) -> &TransitionPolicy {
        &self.inner.policy
    }

    /// The page instance currently mounted, if any.
    ///
    /// During a sequential transition this is the outgoing page until it has
    /// played out, then the incoming one.
    pub fn current_page(&self) -> Option<PageHandle> {
        self.inner.state.borrow().current.clone()
    }

    /// Name of the page shown, or being transitioned to.
    pub fn current_page_name(&self) -> Option<String> {
        self.inner.state.borrow().current_name.clone()
    }

    pub fn is_in_transition(&self) -> bool {
        self.phase() != StackPhase::Idle
    }

    pub fn phase(&self) -> StackPhase {
        self.inner.state.borrow().phase
    }

    /// Name of the request parked until the running transition ends.
    pub fn pending_page_name(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .pending
            .as_ref()
            .map(|request| request.page.clone())
    }

    /// Show `page` and run `action` on it.
    ///
    /// Returns `Ok(true)` when the request was applied, started or queued,
    /// and `Ok(false)` when the page could not be resolved and the
    /// not-found callback handled it.
    ///
    /// # Errors
    ///
    /// - [`RouterError::PageResolution`] when the page cannot be resolved and
    ///   no not-found callback is configured.
    /// - [`RouterError::Spawn`] when the executor refuses the transition.
    pub fn show_page(
        &self,
        page: &str,
        action: &str,
        params: &RouteParams,
    ) -> Result<bool, RouterError> {
        let in_transition = self.is_in_transition();

        if !in_transition {
            if let Some(current) = self.current_instance_of(page) {
                debug_log!(
                    "Stack '{}': updating '{}' with action '{}'",
                    self.inner.name,
                    page,
                    action
                );
                current.action(action, params);
                return Ok(true);
            }
        }

        let factory = match self.inner.resolver.resolve(page) {
            Ok(factory) => factory,
            Err(err) => return self.page_not_found(page, err),
        };

        let request = PendingRequest {
            page: page.to_string(),
            action: action.to_string(),
            params: params.clone(),
            factory,
        };

        if in_transition {
            self.park(request);
            return Ok(true);
        }

        self.begin(request)?;
        Ok(true)
    }

    fn current_instance_of(&self, page: &str) -> Option<PageHandle> {
        let state = self.inner.state.borrow();
        if state.current_name.as_deref() == Some(page) {
            state.current.clone()
        } else {
            None
        }
    }

    fn page_not_found(&self, page: &str, err: ResolveError) -> Result<bool, RouterError> {
        match &self.inner.on_not_found {
            Some(callback) => {
                warn_log!("Stack '{}': {}", self.inner.name, err);
                callback(page);
                Ok(false)
            }
            None => Err(RouterError::PageResolution {
                page: page.to_string(),
                source: err,
            }),
        }
    }

    fn park(&self, request: PendingRequest) {
        let mut state = self.inner.state.borrow_mut();
        debug_log!(
            "Stack '{}': queueing '{}' until the running transition ends",
            self.inner.name,
            request.page
        );
        if let Some(superseded) = state.pending.replace(request) {
            debug_log!(
                "Stack '{}': dropping superseded request for '{}'",
                self.inner.name,
                superseded.page
            );
        }
    }

    fn begin(&self, request: PendingRequest) -> Result<(), RouterError> {
        let (old, old_name) = {
            let mut state = self.inner.state.borrow_mut();
            let old = state.current.clone();
            let old_name = state.current_name.replace(request.page.clone());
            state.phase = if self.inner.policy.creates_before_play_out() {
                StackPhase::Crossing
            } else if old.is_some() {
                StackPhase::PlayingOut
            } else {
                StackPhase::PlayingIn
            };
            (old, old_name)
        };

        debug_log!(
            "Stack '{}': {} transition {:?} → '{}'",
            self.inner.name,
            self.inner.policy.name(),
            old_name,
            request.page
        );

        if !self.inner.policy.creates_before_play_out() {
            return match old {
                Some(old) => {
                    let play_out = old.play_out();
                    let stack = self.clone();
                    self.spawn(async move {
                        play_out.await;
                        trace_log!("Stack '{}': play-out finished", stack.inner.name);
                        stack.release(&old);
                        let new = stack.instantiate(&request);
                        stack.inner.state.borrow_mut().phase = StackPhase::PlayingIn;
                        new.play_in().await;
                        stack.finish();
                    })
                    .map_err(|err| {
                        // The old page never played out and is still shown.
                        self.inner.state.borrow_mut().current_name = old_name;
                        err
                    })
                }
                None => {
                    let new = self.instantiate(&request);
                    let play_in = new.play_in();
                    let stack = self.clone();
                    self.spawn(async move {
                        play_in.await;
                        stack.finish();
                    })
                }
            };
        }

        let new = self.instantiate(&request);
        let transition = match &self.inner.policy {
            TransitionPolicy::Controlled(controller) => controller(old.clone(), new),
            _ => {
                let play_in = new.play_in();
                match old.as_ref().map(PageHandle::play_out) {
                    Some(play_out) => future::join(play_in, play_out).map(|_| ()).boxed_local(),
                    None => play_in,
                }
            }
        };
        let outgoing = old.clone();
        let stack = self.clone();
        self.spawn(async move {
            transition.await;
            if let Some(old) = old {
                stack.release(&old);
            }
            stack.finish();
        })
        .map_err(|err| {
            // The new page is already current; the old one must not stay mounted.
            if let Some(old) = &outgoing {
                self.release(old);
            }
            err
        })
    }

    /// Create, mount and prime the requested page, making it current.
    fn instantiate(&self, request: &PendingRequest) -> PageHandle {
        let page = PageHandle::new(request.factory.create());
        trace_log!("Stack '{}': created '{}'", self.inner.name, request.page);
        self.inner.host.mount(&self.inner.name, &page);
        page.action(&request.action, &request.params);
        self.inner.state.borrow_mut().current = Some(page.clone());
        page
    }

    fn release(&self, page: &PageHandle) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.current.as_ref().is_some_and(|current| current.ptr_eq(page)) {
                state.current = None;
            }
        }
        self.inner.host.release(&self.inner.name, page);
    }

    fn spawn<F>(&self, task: F) -> Result<(), RouterError>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.spawner.spawn_local(task).map_err(|err| {
            error_log!(
                "Stack '{}': cannot run transition: {}",
                self.inner.name,
                err
            );
            self.inner.state.borrow_mut().phase = StackPhase::Idle;
            RouterError::Spawn {
                message: err.to_string(),
            }
        })
    }

    fn finish(&self) {
        let pending = {
            let mut state = self.inner.state.borrow_mut();
            state.phase = StackPhase::Idle;
            state.pending.take()
        };
        debug_log!("Stack '{}': transition finished", self.inner.name);

        if let Some(request) = pending {
            if let Err(err) = self.dispatch(request) {
                error_log!(
                    "Stack '{}': queued request failed: {}",
                    self.inner.name,
                    err
                );
            }
        }
    }

    fn dispatch(&self, request: PendingRequest) -> Result<(), RouterError> {
        if let Some(current) = self.current_instance_of(&request.page) {
            current.action(&request.action, &request.params);
            return Ok(());
        }
        self.begin(request)
    }
}

impl fmt::Debug for PageStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("PageStack")
            .field("name", &self.inner.name)
            .field("policy", &self.inner.policy)
            .field("current", &state.current_name)
            .field("phase", &state.phase)
            .field(
                "pending",
                &state.pending.as_ref().map(|request| &request.page),
            )
            .finish()
    }
}

/// Builder for [`PageStack`].
pub struct PageStackBuilder {
    name: String,
    resolver: Rc<dyn PageResolver>,
    spawner: Rc<dyn LocalSpawn>,
    policy: TransitionPolicy,
    host: Rc<dyn PageHost>,
    on_not_found: Option<NotFoundCallback>,
}

impl PageStackBuilder {
    pub fn policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn host<H>(mut self, host: H) -> Self
    where
        H: PageHost + 'static,
    {
        self.host = Rc::new(host);
        self
    }

    /// Handle unresolvable pages with `callback` instead of an error.
    pub fn on_not_found<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.on_not_found = Some(Rc::new(callback));
        self
    }

    pub fn build(self) -> PageStack {
        PageStack {
            inner: Rc::new(StackInner {
                name: self.name,
                policy: self.policy,
                resolver: self.resolver,
                host: self.host,
                spawner: self.spawner,
                on_not_found: self.on_not_found,
                state: RefCell::new(StackState::default()),
            }),
        }
    }
}

impl fmt::Debug for PageStackBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageStackBuilder")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("has_on_not_found", &self.on_not_found.is_some())
            .finish()
    }
}

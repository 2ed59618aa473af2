//! The router: configuration, navigation entry points and dispatch.
//!
//! [`Router`] is constructed by the application and passed around; there is
//! no global instance. It owns:
//!
//! - the [`RouteTable`] (registration order is match priority),
//! - the named [`PageStack`]s that display matched pages,
//! - the [`HistoryBackend`] that records URLs,
//! - an optional [`AnalyticsSink`].
//!
//! # Navigation pipeline
//!
//! Every entry point ([`open_url`](Router::open_url),
//! [`open_page`](Router::open_page), [`handle_link_click`](Router::handle_link_click),
//! [`handle_history_change`](Router::handle_history_change)) ends in the same
//! steps:
//!
//! 1. Skip if the router is stopped or paused ([`NavigationResult::Ignored`]).
//! 2. Normalize the URL and drop its query string and fragment.
//! 3. Skip if the path equals the current one ([`NavigationResult::Unchanged`]).
//! 4. Strip the base and look the path up (cached when the `cache` feature is on).
//! 5. On a match: run the declaration's handler, tell the route's stack to
//!    show the page, notify `on_route_changed` listeners.
//! 6. Otherwise: show the configured not-found page, notify
//!    `on_route_not_found` listeners.
//! 7. Report the path to analytics, except for the first resolution.
//!
//! # Example
//!
//! ```
//! use page_navigator::history::MemoryHistory;
//! use page_navigator::{RouteDeclaration, RouteTarget, Router, RouterConfig};
//!
//! let history = MemoryHistory::new("/app/");
//! let router = Router::with_routes(
//!     RouterConfig::new().base("app"),
//!     history,
//!     vec![
//!         RouteDeclaration::new("/", "Home"),
//!         RouteDeclaration::new("/gallery/{page}", "Gallery"),
//!     ],
//! )
//! .unwrap();
//!
//! let url = router
//!     .route_to_url(&RouteTarget::new("Gallery").param("page", 2), true)
//!     .unwrap();
//! assert_eq!(url, "/app/gallery/2");
//!
//! let found = router.url_to_route(&url).unwrap();
//! assert_eq!(found.page, "Gallery");
//! assert_eq!(found.params.get_str("page"), Some("2"));
//! ```

use crate::analytics::{self, AnalyticsSink};
#[cfg(feature = "cache")]
use crate::cache::{CacheStats, RouteCache};
use crate::error::{NavigationResult, RouterError};
use crate::history::{
    normalize_base, normalize_url, split_query, strip_base, HistoryBackend,
    DEFAULT_LINK_SELECTOR,
};
use crate::matching::RouteTable;
use crate::params::{QueryParams, RouteParams};
use crate::pattern::Delimiters;
use crate::route::{RouteDeclaration, RouteMatch, RouteTarget, DEFAULT_ACTION, DEFAULT_STACK};
use crate::stack::PageStack;
use crate::{debug_log, info_log, trace_log, warn_log};
use std::collections::HashMap;
use std::fmt;
#[cfg(feature = "cache")]
use std::num::NonZeroUsize;
use std::rc::Rc;

// ============================================================================
// Configuration
// ============================================================================

/// Page shown when no route matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundPage {
    pub page: String,
    pub action: String,
    pub stack: String,
}

impl NotFoundPage {
    /// Show `page` with action `index` on stack `main`.
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            action: DEFAULT_ACTION.to_string(),
            stack: DEFAULT_STACK.to_string(),
        }
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }
}

/// Router settings.
///
/// ```
/// use page_navigator::RouterConfig;
///
/// let config = RouterConfig::new().base("shop").cache_capacity(64);
/// assert_eq!(config.base_path(), "/shop/");
/// assert_eq!(config.link_selector_value(), Some("a[internal-link]"));
/// ```
#[derive(Debug, Clone)]
pub struct RouterConfig {
    base: String,
    link_selector: Option<String>,
    delimiters: Delimiters,
    not_found: Option<NotFoundPage>,
    cache_capacity: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
            link_selector: Some(DEFAULT_LINK_SELECTOR.to_string()),
            delimiters: Delimiters::default(),
            not_found: None,
            cache_capacity: 256,
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path prefix of every URL the router produces. Slashes are normalized.
    pub fn base(mut self, base: &str) -> Self {
        self.base = normalize_base(base);
        self
    }

    /// Selector of links the host should intercept; `None` disables
    /// interception.
    pub fn link_selector(mut self, selector: Option<&str>) -> Self {
        self.link_selector = selector.map(str::to_string);
        self
    }

    pub fn delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn not_found(mut self, page: NotFoundPage) -> Self {
        self.not_found = Some(page);
        self
    }

    /// Number of resolved paths kept in the route cache.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base
    }

    pub fn link_selector_value(&self) -> Option<&str> {
        self.link_selector.as_deref()
    }

    pub fn delimiters_value(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn not_found_page(&self) -> Option<&NotFoundPage> {
        self.not_found.as_ref()
    }

    pub fn cache_capacity_value(&self) -> usize {
        self.cache_capacity
    }
}

// ============================================================================
// Router
// ============================================================================

type RouteChangedListener = Box<dyn Fn(&RouteMatch)>;
type RouteNotFoundListener = Box<dyn Fn(&str)>;

/// Client-side router.
pub struct Router {
    config: RouterConfig,
    table: RouteTable,
    stacks: HashMap<String, PageStack>,
    history: Rc<dyn HistoryBackend>,
    analytics: Option<Box<dyn AnalyticsSink>>,
    current_path: Option<String>,
    current_match: Option<RouteMatch>,
    started: bool,
    paused: bool,
    resolutions: usize,
    route_changed: Vec<RouteChangedListener>,
    route_not_found: Vec<RouteNotFoundListener>,
    #[cfg(feature = "cache")]
    cache: RouteCache,
}

impl Router {
    /// Create a router with no routes and no stacks.
    pub fn new<H>(config: RouterConfig, history: H) -> Self
    where
        H: HistoryBackend + 'static,
    {
        #[cfg(feature = "cache")]
        let cache = RouteCache::with_capacity(
            NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN),
        );

        info_log!("Router created with base '{}'", config.base);

        Self {
            table: RouteTable::with_delimiters(config.delimiters.clone()),
            config,
            stacks: HashMap::new(),
            history: Rc::new(history),
            analytics: None,
            current_path: None,
            current_match: None,
            started: false,
            paused: false,
            resolutions: 0,
            route_changed: Vec::new(),
            route_not_found: Vec::new(),
            #[cfg(feature = "cache")]
            cache,
        }
    }

    /// Create a router and register `routes` in order.
    ///
    /// # Errors
    ///
    /// The first invalid declaration, see [`add_route`](Self::add_route).
    pub fn with_routes<H, I>(config: RouterConfig, history: H, routes: I) -> Result<Self, RouterError>
    where
        H: HistoryBackend + 'static,
        I: IntoIterator<Item = RouteDeclaration>,
    {
        let mut router = Self::new(config, history);
        router.add_routes(routes)?;
        Ok(router)
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Append a route. Later routes have lower priority.
    ///
    /// # Errors
    ///
    /// [`RouterError::EmptyPageName`], [`RouterError::InvalidTemplate`] or
    /// [`RouterError::UnknownParamRule`].
    pub fn add_route(&mut self, route: RouteDeclaration) -> Result<(), RouterError> {
        self.table.add(route)?;
        self.invalidate_cache();
        Ok(())
    }

    /// Append several routes, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_routes<I>(&mut self, routes: I) -> Result<(), RouterError>
    where
        I: IntoIterator<Item = RouteDeclaration>,
    {
        let result = self.table.extend(routes);
        self.invalidate_cache();
        result
    }

    /// Register a stack under its own name.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateStack`] if the name is taken.
    pub fn register_stack(&mut self, stack: PageStack) -> Result<(), RouterError> {
        let name = stack.name().to_string();
        if self.stacks.contains_key(&name) {
            return Err(RouterError::DuplicateStack { name });
        }
        info_log!("Registered stack '{}' ({})", name, stack.policy().name());
        self.stacks.insert(name, stack);
        Ok(())
    }

    pub fn stack(&self, name: &str) -> Option<&PageStack> {
        self.stacks.get(name)
    }

    /// Report every resolution after the first to `sink`.
    pub fn set_analytics<A>(&mut self, sink: A)
    where
        A: AnalyticsSink + 'static,
    {
        self.analytics = Some(Box::new(sink));
    }

    /// Call `listener` after every successful resolution.
    pub fn on_route_changed<F>(&mut self, listener: F)
    where
        F: Fn(&RouteMatch) + 'static,
    {
        self.route_changed.push(Box::new(listener));
    }

    /// Call `listener` with the path whenever no route matches.
    pub fn on_route_not_found<F>(&mut self, listener: F)
    where
        F: Fn(&str) + 'static,
    {
        self.route_not_found.push(Box::new(listener));
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Start routing and resolve the current location.
    ///
    /// # Errors
    ///
    /// Errors of the initial dispatch, see [`open_url`](Self::open_url).
    pub fn start(&mut self) -> Result<NavigationResult, RouterError> {
        if self.started {
            debug_log!("Router already started");
            return Ok(NavigationResult::Ignored);
        }
        self.started = true;
        info_log!("Router started with {} routes", self.table.len());
        self.handle_history_change()
    }

    /// Stop routing. Navigation calls return [`NavigationResult::Ignored`]
    /// until the next [`start`](Self::start).
    pub fn stop(&mut self) {
        if self.started {
            info_log!("Router stopped");
        }
        self.started = false;
    }

    /// Pause or resume routing. Resuming resolves the current location.
    ///
    /// # Errors
    ///
    /// Errors of the resolution run when resuming.
    pub fn set_paused(&mut self, paused: bool) -> Result<NavigationResult, RouterError> {
        if self.paused == paused {
            return Ok(NavigationResult::Ignored);
        }
        self.paused = paused;
        debug_log!("Router {}", if paused { "paused" } else { "resumed" });

        if paused {
            Ok(NavigationResult::Ignored)
        } else {
            self.handle_history_change()
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Record `url` in history and resolve it.
    ///
    /// The URL may be absolute (`https://host/…`), rooted or relative to the
    /// base. The history entry is written even when the router is stopped or
    /// paused.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnknownStack`] when the matched route (or the
    ///   not-found page) targets an unregistered stack.
    /// - Errors of [`PageStack::show_page`].
    pub fn open_url(&mut self, url: &str, add_to_history: bool) -> Result<NavigationResult, RouterError> {
        let normalized = normalize_url(url, &self.config.base);

        if self.history.location() != normalized {
            if add_to_history {
                self.history.push_state(&normalized);
            } else {
                self.history.replace_state(&normalized);
            }
        }

        self.resolve(&normalized)
    }

    /// Build the URL of `target` and open it.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`] when no route produces a URL for the
    /// target, otherwise as [`open_url`](Self::open_url).
    pub fn open_page(
        &mut self,
        target: &RouteTarget,
        add_to_history: bool,
    ) -> Result<NavigationResult, RouterError> {
        let url = self
            .route_to_url(target, true)
            .ok_or_else(|| RouterError::RouteNotFound {
                page: target.page.clone(),
                action: target.action.clone(),
                stack: target.stack.clone(),
            })?;
        self.open_url(&url, add_to_history)
    }

    /// Resolve the history's location after a back/forward move.
    ///
    /// # Errors
    ///
    /// As [`open_url`](Self::open_url).
    pub fn handle_history_change(&mut self) -> Result<NavigationResult, RouterError> {
        let location = self.history.location();
        self.resolve(&location)
    }

    /// Follow an intercepted internal link.
    ///
    /// # Errors
    ///
    /// As [`open_url`](Self::open_url).
    pub fn handle_link_click(&mut self, href: &str) -> Result<NavigationResult, RouterError> {
        debug_log!("Intercepted link to '{}'", href);
        self.open_url(href, true)
    }

    // ------------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------------

    /// Match a URL without navigating.
    pub fn url_to_route(&self, url: &str) -> Option<RouteMatch> {
        let normalized = normalize_url(url, &self.config.base);
        let (path, query) = split_query(&normalized);
        let mut found = self.table.find(&strip_base(path, &self.config.base))?;
        found.query = query.map(QueryParams::from_query_string).unwrap_or_default();
        Some(found)
    }

    /// URL of `target`, prefixed with the base when `prepend_base` is set.
    pub fn route_to_url(&self, target: &RouteTarget, prepend_base: bool) -> Option<String> {
        let path = self.table.build(target)?;
        if prepend_base {
            Some(format!("{}{}", self.config.base.trim_end_matches('/'), path))
        } else {
            Some(path)
        }
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn base(&self) -> &str {
        &self.config.base
    }

    pub fn link_selector(&self) -> Option<&str> {
        self.config.link_selector.as_deref()
    }

    /// Last resolved path, base included, without query string.
    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// Match of the last resolved path, `None` when it matched nothing.
    pub fn current_match(&self) -> Option<&RouteMatch> {
        self.current_match.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    fn resolve(&mut self, location: &str) -> Result<NavigationResult, RouterError> {
        if !self.started || self.paused {
            debug_log!("Ignoring '{}': router is stopped or paused", location);
            return Ok(NavigationResult::Ignored);
        }

        let normalized = normalize_url(location, &self.config.base);
        let (path, query) = split_query(&normalized);

        if self.current_path.as_deref() == Some(path) {
            trace_log!("Path '{}' is already current", path);
            return Ok(NavigationResult::Unchanged {
                path: path.to_string(),
            });
        }

        let path = path.to_string();
        let query = query.map(QueryParams::from_query_string).unwrap_or_default();
        let relative = strip_base(&path, &self.config.base);

        // Current path and match are committed only after a successful dispatch.
        let found = self.lookup(&relative);
        let result = match found {
            Some(mut found) => {
                found.query = query;
                self.dispatch(&found)?;
                info_log!("Navigated to '{}' → {}.{}", path, found.page, found.action);
                self.current_path = Some(path.clone());
                self.current_match = Some(found.clone());
                for listener in &self.route_changed {
                    listener(&found);
                }
                NavigationResult::Success { path }
            }
            None => {
                info_log!("No route for '{}'", path);
                self.show_not_found_page()?;
                self.current_path = Some(path.clone());
                self.current_match = None;
                for listener in &self.route_not_found {
                    listener(&path);
                }
                NavigationResult::NotFound { path }
            }
        };
        self.resolutions += 1;

        if self.resolutions > 1 {
            if let (Some(sink), Some(path)) = (&self.analytics, result.path()) {
                analytics::report(sink.as_ref(), path);
            }
        }

        Ok(result)
    }

    fn lookup(&mut self, path: &str) -> Option<RouteMatch> {
        #[cfg(feature = "cache")]
        if let Some(outcome) = self.cache.get(path) {
            return outcome;
        }

        let outcome = self.table.find(path);
        #[cfg(feature = "cache")]
        self.cache.insert(path.to_string(), outcome.clone());
        outcome
    }

    fn dispatch(&self, found: &RouteMatch) -> Result<(), RouterError> {
        let stack = self.stack_named(&found.stack)?;

        if let Some(handler) = found.declaration().route_handler() {
            handler(found);
        }

        if !stack.show_page(&found.page, &found.action, &found.params)? {
            warn_log!(
                "Stack '{}' could not show '{}'",
                found.stack,
                found.page
            );
        }
        Ok(())
    }

    fn show_not_found_page(&self) -> Result<(), RouterError> {
        let Some(not_found) = &self.config.not_found else {
            return Ok(());
        };
        let stack = self.stack_named(&not_found.stack)?;
        stack.show_page(&not_found.page, &not_found.action, &RouteParams::new())?;
        Ok(())
    }

    fn stack_named(&self, name: &str) -> Result<&PageStack, RouterError> {
        self.stacks.get(name).ok_or_else(|| RouterError::UnknownStack {
            name: name.to_string(),
        })
    }

    fn invalidate_cache(&mut self) {
        #[cfg(feature = "cache")]
        self.cache.clear();
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stacks: Vec<_> = self.stacks.keys().collect();
        stacks.sort();
        f.debug_struct("Router")
            .field("base", &self.config.base)
            .field("routes", &self.table.len())
            .field("stacks", &stacks)
            .field("current_path", &self.current_path)
            .field("started", &self.started)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;

    fn router(base: &str, routes: Vec<RouteDeclaration>) -> Router {
        Router::with_routes(
            RouterConfig::new().base(base),
            MemoryHistory::new(normalize_base(base)),
            routes,
        )
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.base_path(), "/");
        assert_eq!(config.link_selector_value(), Some(DEFAULT_LINK_SELECTOR));
        assert_eq!(config.cache_capacity_value(), 256);
        assert!(config.not_found_page().is_none());
    }

    #[test]
    fn test_parameterless_round_trip() {
        let router = router(
            "/app/",
            vec![
                RouteDeclaration::new("/", "Home"),
                RouteDeclaration::new("/about", "About").action("team"),
            ],
        );

        let target = RouteTarget::new("About").action("team");
        let url = router.route_to_url(&target, true).unwrap();
        assert_eq!(url, "/app/about");

        let found = router.url_to_route(&url).unwrap();
        assert_eq!(found.to_target(), target);
    }

    #[test]
    fn test_route_to_url_without_base() {
        let router = router("/app/", vec![RouteDeclaration::new("/about", "About")]);
        assert_eq!(
            router.route_to_url(&RouteTarget::new("About"), false).as_deref(),
            Some("/about")
        );
    }

    #[test]
    fn test_url_to_route_parses_query() {
        let router = router("/", vec![RouteDeclaration::new("/search", "Search")]);
        let found = router.url_to_route("/search?q=rust&page=2#top").unwrap();
        assert_eq!(found.query.get("q").map(String::as_str), Some("rust"));
        assert_eq!(found.query.get_as::<u32>("page"), Some(2));
        assert_eq!(found.path, "/search");
    }

    #[test]
    fn test_navigation_is_ignored_before_start() {
        let mut router = router("/", vec![RouteDeclaration::new("/", "Home")]);
        let result = router.open_url("/", true).unwrap();
        assert!(result.is_ignored());
        assert!(router.current_path().is_none());
    }

    #[test]
    fn test_unregistered_stack_is_reported() {
        let mut router = router("/", vec![RouteDeclaration::new("/", "Home").stack("popup")]);
        let err = router.start().unwrap_err();
        assert_eq!(
            err,
            RouterError::UnknownStack {
                name: "popup".into()
            }
        );
        assert!(router.current_path().is_none());
        assert!(router.current_match().is_none());
    }

    #[test]
    fn test_open_page_without_route_fails() {
        let mut router = router("/", vec![RouteDeclaration::new("/", "Home")]);
        let err = router
            .open_page(&RouteTarget::new("Missing").action("show"), true)
            .unwrap_err();
        assert_eq!(
            err,
            RouterError::RouteNotFound {
                page: "Missing".into(),
                action: "show".into(),
                stack: "main".into(),
            }
        );
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_adding_routes_clears_cache() {
        let mut router = router("/", vec![]);
        router.start().unwrap();
        let before = router.cache_stats().invalidations;

        router.add_route(RouteDeclaration::new("/late", "Late")).unwrap();

        assert_eq!(router.cache_stats().invalidations, before + 1);
        assert!(router.url_to_route("/late").is_some());
    }
}

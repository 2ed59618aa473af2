//! # page-navigator
//!
//! Client-side page router: URL templates with named placeholders, reverse
//! routing, history integration and page stacks that sequence the
//! transition between an outgoing and an incoming page.
//!
//! The crate renders nothing and touches no browser API. Hosts plug in
//! through small traits:
//!
//! | Trait | Role |
//! |-------|------|
//! | [`HistoryBackend`] | `pushState` / `replaceState` / current location |
//! | [`PageResolver`] | page name → [`PageFactory`] |
//! | [`Page`] | action dispatch, play-in, play-out |
//! | [`PageHost`] | mount and release page instances |
//! | [`AnalyticsSink`] | page-view reporting |
//!
//! # Quick start
//!
//! ```
//! use futures::executor::LocalPool;
//! use page_navigator::*;
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
//! let mut pages = PageRegistry::new();
//! pages.register("Home", || Box::new(Home) as Box<dyn Page>);
//!
//! let history = MemoryHistory::new("/");
//! let mut router = Router::new(RouterConfig::new(), history.clone());
//! router.add_route(RouteDeclaration::new("/", "Home")).unwrap();
//! router
//!     .register_stack(PageStack::new("main", pages, pool.spawner()))
//!     .unwrap();
//!
//! assert!(router.start().unwrap().is_success());
//! pool.run_until_stalled();
//!
//! let main = router.stack("main").unwrap();
//! assert_eq!(main.current_page_name().as_deref(), Some("Home"));
//! ```
//!
//! # Route templates
//!
//! | Placeholder | Matches |
//! |-------------|---------|
//! | `{name}`, `{name:string}` | `[0-9a-zA-Z_%+-]+` |
//! | `{name:number}` | `[0-9]+` |
//! | `{name:any}` | `.+` |
//!
//! A trailing slash is always optional. Routes are tried in registration
//! order and the first match wins.
//!
//! # Cargo features
//!
//! | Feature | Default | Effect |
//! |---------|---------|--------|
//! | `log` | yes | log through the `log` crate |
//! | `tracing` | no | log through `tracing` |
//! | `cache` | yes | LRU cache of resolved paths |

pub mod analytics;
#[cfg(feature = "cache")]
pub mod cache;
pub mod error;
pub mod history;
pub mod logging;
pub mod matching;
pub mod page;
pub mod params;
pub mod pattern;
pub mod route;
pub mod router;
pub mod slug;
pub mod stack;
pub mod transition;

pub use analytics::{AnalyticsError, AnalyticsSink};
#[cfg(feature = "cache")]
pub use cache::{CacheStats, RouteCache};
pub use error::{NavigationResult, ResolveError, RouterError};
pub use history::{HistoryBackend, MemoryHistory, DEFAULT_LINK_SELECTOR};
pub use matching::{CompiledRoute, RouteTable};
pub use page::{
    completed, CompletionSignal, NoopHost, Page, PageFactory, PageHandle, PageHost, PageRegistry,
    PageResolver,
};
pub use params::{ParamValue, QueryParams, RouteParams};
pub use pattern::{compile, CompiledPattern, Delimiters, ParamRule};
pub use route::{RouteDeclaration, RouteHandler, RouteMatch, RouteTarget, DEFAULT_ACTION, DEFAULT_STACK};
pub use router::{NotFoundPage, Router, RouterConfig};
pub use slug::slugify;
pub use stack::{PageStack, PageStackBuilder, StackPhase};
pub use transition::{TransitionController, TransitionPolicy};

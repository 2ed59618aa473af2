//! Route declarations and the values produced by matching them.
//!
//! - [`RouteDeclaration`] — what application code registers: a URL template
//!   and the (page, action, stack) it leads to.
//! - [`RouteMatch`] — the result of resolving a concrete path.
//! - [`RouteTarget`] — the input of reverse routing: "which URL shows this
//!   page with these parameters?"
//!
//! # Example
//!
//! ```
//! use page_navigator::{RouteDeclaration, RouteTarget};
//!
//! let route = RouteDeclaration::new("/gallery/{page}", "Gallery").action("list");
//! assert_eq!(route.stack_name(), "main");
//!
//! let target = RouteTarget::new("Gallery").action("list").param("page", 2);
//! assert_eq!(target.params.get_as::<u32>("page"), Some(2));
//! ```

use crate::params::{ParamValue, QueryParams, RouteParams};
use std::fmt;
use std::rc::Rc;

/// Action used when a declaration or target does not name one.
pub const DEFAULT_ACTION: &str = "index";

/// Stack used when a declaration or target does not name one.
pub const DEFAULT_STACK: &str = "main";

/// Callback invoked when a declaration matches, before stack dispatch.
pub type RouteHandler = Rc<dyn Fn(&RouteMatch)>;

/// A route as declared by the application.
///
/// Immutable once registered with a [`Router`](crate::Router).
#[derive(Clone)]
pub struct RouteDeclaration {
    template: String,
    page: String,
    action: String,
    stack: String,
    handler: Option<RouteHandler>,
}

impl RouteDeclaration {
    /// Declare `template` as leading to `page`, action `index`, stack `main`.
    pub fn new(template: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            page: page.into(),
            action: DEFAULT_ACTION.to_string(),
            stack: DEFAULT_STACK.to_string(),
            handler: None,
        }
    }

    /// Set the action dispatched to the page.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the stack that displays the page.
    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }

    /// Attach a callback run whenever this route matches.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RouteMatch) + 'static,
    {
        self.handler = Some(Rc::new(handler));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn page_name(&self) -> &str {
        &self.page
    }

    pub fn action_name(&self) -> &str {
        &self.action
    }

    pub fn stack_name(&self) -> &str {
        &self.stack
    }

    pub fn route_handler(&self) -> Option<&RouteHandler> {
        self.handler.as_ref()
    }

    /// Whether this declaration leads to exactly this (page, action, stack).
    pub fn targets(&self, page: &str, action: &str, stack: &str) -> bool {
        self.page == page && self.action == action && self.stack == stack
    }
}

impl fmt::Debug for RouteDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDeclaration")
            .field("template", &self.template)
            .field("page", &self.page)
            .field("action", &self.action)
            .field("stack", &self.stack)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// The result of matching a path against the route table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub page: String,
    pub action: String,
    pub stack: String,
    /// Captured placeholder values, always text.
    pub params: RouteParams,
    /// Query string of the resolved URL.
    pub query: QueryParams,
    /// The base-stripped path that matched.
    pub path: String,
    declaration: Rc<RouteDeclaration>,
}

impl RouteMatch {
    pub(crate) fn new(declaration: Rc<RouteDeclaration>, path: String, params: RouteParams) -> Self {
        Self {
            page: declaration.page.clone(),
            action: declaration.action.clone(),
            stack: declaration.stack.clone(),
            params,
            query: QueryParams::new(),
            path,
            declaration,
        }
    }

    /// The declaration that produced this match.
    pub fn declaration(&self) -> &RouteDeclaration {
        &self.declaration
    }

    /// Convert into a reverse-routing target with the same page and parameters.
    pub fn to_target(&self) -> RouteTarget {
        RouteTarget {
            page: self.page.clone(),
            action: self.action.clone(),
            stack: self.stack.clone(),
            params: self.params.clone(),
        }
    }
}

impl PartialEq for RouteMatch {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page
            && self.action == other.action
            && self.stack == other.stack
            && self.params == other.params
            && self.query == other.query
            && self.path == other.path
            && Rc::ptr_eq(&self.declaration, &other.declaration)
    }
}

/// Page, action, stack and parameters to build a URL for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub page: String,
    pub action: String,
    pub stack: String,
    pub params: RouteParams,
}

impl RouteTarget {
    /// Target `page` with action `index` on stack `main`.
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            action: DEFAULT_ACTION.to_string(),
            stack: DEFAULT_STACK.to_string(),
            params: RouteParams::new(),
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

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }
}

impl From<&RouteMatch> for RouteTarget {
    fn from(route_match: &RouteMatch) -> Self {
        route_match.to_target()
    }
}

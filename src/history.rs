//! History integration: URL normalization and the history backend.
//!
//! The router never touches a browser directly. It talks to a
//! [`HistoryBackend`] — `pushState` / `replaceState` / `location.pathname`
//! in a browser host, or [`MemoryHistory`] anywhere else.
//!
//! Back/forward notifications flow the other way: the host listens for them
//! and calls [`Router::handle_history_change`](crate::Router::handle_history_change).

use std::cell::RefCell;
use std::rc::Rc;

/// Selector of links whose clicks the host should route internally.
pub const DEFAULT_LINK_SELECTOR: &str = "a[internal-link]";

/// URL mutation and location access provided by the host.
pub trait HistoryBackend {
    /// Add a history entry for `path`.
    fn push_state(&self, path: &str);

    /// Replace the current history entry with `path`.
    fn replace_state(&self, path: &str);

    /// The path the host currently displays, query string included.
    fn location(&self) -> String;
}

/// Canonical form of a base path: leading and trailing slash.
///
/// ```
/// use page_navigator::history::normalize_base;
///
/// assert_eq!(normalize_base(""), "/");
/// assert_eq!(normalize_base("app"), "/app/");
/// assert_eq!(normalize_base("/app/"), "/app/");
/// ```
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Normalize any URL form into a path that starts with `base`.
///
/// Scheme and host are removed, a single leading slash is ensured and the
/// base is prepended unless already present. `base` must be canonical
/// (see [`normalize_base`]).
///
/// ```
/// use page_navigator::history::normalize_url;
///
/// assert_eq!(normalize_url("https://example.com/app/about", "/app/"), "/app/about");
/// assert_eq!(normalize_url("about", "/app/"), "/app/about");
/// assert_eq!(normalize_url("/app/about", "/app/"), "/app/about");
/// assert_eq!(normalize_url("//cdn.example.com", "/"), "/");
/// ```
pub fn normalize_url(url: &str, base: &str) -> String {
    let without_host = match url.find("//") {
        Some(index) if index < 7 => {
            let after_host = &url[index + 2..];
            after_host.find('/').map_or("", |slash| &after_host[slash..])
        }
        _ => url,
    };

    let path = format!("/{}", without_host.trim_start_matches('/'));

    if path.starts_with(base) || base.strip_suffix('/') == Some(path.as_str()) {
        path
    } else {
        format!("{}{}", base, &path[1..])
    }
}

/// Remove `base` from a normalized path, keeping a leading slash.
///
/// ```
/// use page_navigator::history::strip_base;
///
/// assert_eq!(strip_base("/app/gallery/2", "/app/"), "/gallery/2");
/// assert_eq!(strip_base("/app", "/app/"), "/");
/// assert_eq!(strip_base("/about", "/"), "/about");
/// ```
pub fn strip_base(path: &str, base: &str) -> String {
    let remainder = path
        .strip_prefix(base)
        .or_else(|| (path == base.trim_end_matches('/')).then_some(""))
        .unwrap_or(path);
    format!("/{}", remainder.trim_start_matches('/'))
}

/// Split `path?query#fragment` into the path and the query string.
pub fn split_query(url: &str) -> (&str, Option<&str>) {
    let without_fragment = url.split_once('#').map_or(url, |(before, _)| before);
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_fragment, None),
    }
}

// ============================================================================
// MemoryHistory
// ============================================================================

#[derive(Debug)]
struct HistoryState {
    entries: Vec<String>,
    current: usize,
}

/// In-memory history stack with a cursor.
///
/// Clones share the same stack, so a host (or a test) can keep a handle to
/// simulate the back button while the router holds another.
///
/// ```
/// use page_navigator::history::{HistoryBackend, MemoryHistory};
///
/// let history = MemoryHistory::new("/app/");
/// history.push_state("/app/about");
/// assert!(history.back());
/// assert_eq!(history.location(), "/app/");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    state: Rc<RefCell<HistoryState>>,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(HistoryState {
                entries: vec![initial.into()],
                current: 0,
            })),
        }
    }

    /// Move the cursor back. Returns `false` at the first entry.
    pub fn back(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.current > 0 {
            state.current -= 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor forward. Returns `false` at the last entry.
    pub fn forward(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.current + 1 < state.entries.len() {
            state.current += 1;
            true
        } else {
            false
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.state.borrow().current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let state = self.state.borrow();
        state.current + 1 < state.entries.len()
    }

    /// Number of entries, including forward entries.
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    /// All entries in order.
    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().entries.clone()
    }
}

impl HistoryBackend for MemoryHistory {
    fn push_state(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        // Pushing drops forward history.
        let keep = state.current + 1;
        state.entries.truncate(keep);
        state.entries.push(path.to_string());
        state.current += 1;
    }

    fn replace_state(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        let current = state.current;
        state.entries[current] = path.to_string();
    }

    fn location(&self) -> String {
        let state = self.state.borrow();
        state.entries[state.current].clone()
    }
}

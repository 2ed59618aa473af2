//! Test utilities shared by the integration tests
//!
//! Provides scripted pages whose play-in/play-out signals are opened by hand,
//! an ordered event log, a recording host and router fixtures.

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::FutureExt;
use page_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Route log output through env_logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// EventLog
// ============================================================================

/// Ordered record of page, host and listener activity.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.events.borrow().iter().any(|e| e == event)
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }

    /// Index of the first occurrence of `event`.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.borrow().iter().position(|e| e == event)
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

// ============================================================================
// Gates
// ============================================================================

/// Completion signals that resolve only when a test opens them.
///
/// Labels are `"<Page>:in"` and `"<Page>:out"`.
#[derive(Clone, Default)]
pub struct Gates {
    waiting: Rc<RefCell<Vec<(String, oneshot::Sender<()>)>>>,
}

impl Gates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that resolves when `label` is opened.
    pub fn signal(&self, label: impl Into<String>) -> CompletionSignal {
        let (tx, rx) = oneshot::channel();
        self.waiting.borrow_mut().push((label.into(), tx));
        rx.map(|_| ()).boxed_local()
    }

    /// Open the oldest signal waiting on `label`. Returns `false` if none.
    pub fn open(&self, label: &str) -> bool {
        let sender = {
            let mut waiting = self.waiting.borrow_mut();
            match waiting.iter().position(|(l, _)| l == label) {
                Some(index) => waiting.remove(index).1,
                None => return false,
            }
        };
        sender.send(()).is_ok()
    }

    pub fn is_waiting(&self, label: &str) -> bool {
        self.waiting.borrow().iter().any(|(l, _)| l == label)
    }
}

// ============================================================================
// TestPage
// ============================================================================

/// Page that logs every call and optionally waits on gates.
pub struct TestPage {
    name: String,
    log: EventLog,
    gates: Option<Gates>,
}

impl TestPage {
    pub fn new(name: &str, log: &EventLog, gates: Option<&Gates>) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            gates: gates.cloned(),
        }
    }

    fn signal(&self, phase: &str) -> CompletionSignal {
        let label = format!("{}:{}", self.name, phase);
        self.log.push(label.clone());
        match &self.gates {
            Some(gates) => gates.signal(label),
            None => completed(),
        }
    }
}

impl Page for TestPage {
    fn action(&mut self, action: &str, params: &RouteParams) {
        let mut keys: Vec<_> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        keys.sort();
        if keys.is_empty() {
            self.log.push(format!("{}:action:{}", self.name, action));
        } else {
            self.log
                .push(format!("{}:action:{}({})", self.name, action, keys.join(",")));
        }
    }

    fn play_in(&mut self) -> CompletionSignal {
        self.signal("in")
    }

    fn play_out(&mut self) -> CompletionSignal {
        self.signal("out")
    }
}

/// Registry whose factories log `"<Page>:create"` before building a [`TestPage`].
pub fn registry(names: &[&str], log: &EventLog, gates: Option<&Gates>) -> PageRegistry {
    let mut registry = PageRegistry::new();
    for name in names {
        let name = (*name).to_string();
        let log = log.clone();
        let gates = gates.cloned();
        registry.register(name.clone(), move || {
            log.push(format!("{}:create", name));
            Box::new(TestPage::new(&name, &log, gates.as_ref())) as Box<dyn Page>
        });
    }
    registry
}

// ============================================================================
// RecordingHost
// ============================================================================

/// Host that logs `"<stack>:mount"` and `"<stack>:release"`.
#[derive(Clone)]
pub struct RecordingHost {
    log: EventLog,
}

impl RecordingHost {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl PageHost for RecordingHost {
    fn mount(&self, stack: &str, _page: &PageHandle) {
        self.log.push(format!("{}:mount", stack));
    }

    fn release(&self, stack: &str, _page: &PageHandle) {
        self.log.push(format!("{}:release", stack));
    }
}

// ============================================================================
// Router fixtures
// ============================================================================

/// Routes of a small site under `/app/`.
pub fn site_routes() -> Vec<RouteDeclaration> {
    vec![
        RouteDeclaration::new("/", "Home"),
        RouteDeclaration::new("/about", "About"),
        RouteDeclaration::new("/gallery/{page}", "Gallery").action("list"),
        RouteDeclaration::new("/article/{title}.html", "Article").action("read"),
        RouteDeclaration::new("/photo/{id:number}", "Photo").stack("popup"),
    ]
}

pub const SITE_PAGES: &[&str] = &["Home", "About", "Gallery", "Article", "Photo", "NotFound"];

/// Everything a navigation test needs, wired together.
pub struct Site {
    pub pool: LocalPool,
    pub history: MemoryHistory,
    pub router: Router,
    pub log: EventLog,
    pub gates: Gates,
}

impl Site {
    /// Router on `/app/` with instant pages on `main` and `popup`.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::new().base("/app/"), false)
    }

    /// Router on `/app/` whose pages wait on gates.
    pub fn gated() -> Self {
        Self::with_config(RouterConfig::new().base("/app/"), true)
    }

    pub fn with_config(config: RouterConfig, gated: bool) -> Self {
        init_logging();
        let pool = LocalPool::new();
        let history = MemoryHistory::new(config.base_path().to_string());
        let log = EventLog::new();
        let gates = Gates::new();
        let page_gates = gated.then_some(&gates);

        let mut router =
            Router::with_routes(config, history.clone(), site_routes()).expect("valid routes");
        for stack in ["main", "popup"] {
            router
                .register_stack(
                    PageStack::builder(stack, registry(SITE_PAGES, &log, page_gates), pool.spawner())
                        .host(RecordingHost::new(&log))
                        .build(),
                )
                .expect("unique stack");
        }

        Self {
            pool,
            history,
            router,
            log,
            gates,
        }
    }

    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn main(&self) -> &PageStack {
        self.router.stack("main").expect("main stack")
    }

    pub fn popup(&self) -> &PageStack {
        self.router.stack("popup").expect("popup stack")
    }
}

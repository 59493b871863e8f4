use super::*;
use crate::error::AppError;
use crate::nav::loader::Fragment;
use crate::session::Session;
use agrolink_shared::{Profile, Role};
use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    /// Operation log to verify calling order
    log: RefCell<Vec<String>>,
    /// Committed fragments, in order
    commits: RefCell<Vec<Fragment>>,
    notices: RefCell<Vec<String>>,
    history: RefCell<Vec<String>>,
    bound: RefCell<Vec<Route>>,
    session: RefCell<Session>,
    /// Companion pages served by the mock source
    pages: RefCell<HashMap<&'static str, String>>,
    /// Paths that fail with HTTP 500
    failing: RefCell<HashSet<&'static str>>,
    /// Paths whose fetch suspends until the gate fires
    gates: RefCell<HashMap<&'static str, oneshot::Receiver<()>>>,
}

impl TestContext {
    fn new() -> Rc<Self> {
        let mut pages = HashMap::new();
        pages.insert(
            "/pages/login.html",
            concat!(
                "<html><body><nav>site nav</nav>",
                "<form id=\"login-form\"></form></body></html>"
            )
            .to_string(),
        );
        pages.insert(
            "/pages/recommendations.html",
            "<html><body><section id=\"recommendations\"></section></body></html>".to_string(),
        );

        Rc::new(Self {
            log: RefCell::new(Vec::new()),
            commits: RefCell::new(Vec::new()),
            notices: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            bound: RefCell::new(Vec::new()),
            session: RefCell::new(Session::default()),
            pages: RefCell::new(pages),
            failing: RefCell::new(HashSet::new()),
            gates: RefCell::new(HashMap::new()),
        })
    }

    fn set_session(&self, session: Session) {
        *self.session.borrow_mut() = session;
    }

    fn committed_routes(&self) -> Vec<Route> {
        self.commits.borrow().iter().map(|f| f.route).collect()
    }
}

fn authenticated_session(role: Role) -> Session {
    Session {
        token: Some("tok".into()),
        user: Some(Profile {
            id: "u1".into(),
            name: "Otieno".into(),
            email: "otieno@example.com".into(),
            role,
            county: None,
            phone: None,
            joined_at: None,
        }),
        authenticated: true,
    }
}

struct TestSession(Rc<TestContext>);

impl SessionReader for TestSession {
    fn current(&self) -> Session {
        self.0.session.borrow().clone()
    }
}

struct TestSource(Rc<TestContext>);

#[async_trait(?Send)]
impl FragmentSource for TestSource {
    async fn fetch_page(&self, path: &str) -> crate::error::Result<String> {
        self.0.log.borrow_mut().push(format!("fetch:{}", path));

        let gate = self.0.gates.borrow_mut().remove(path);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.0.failing.borrow().contains(path) {
            return Err(AppError::backend("HTTP 500"));
        }
        self.0
            .pages
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::backend("HTTP 404"))
    }
}

struct TestHistory(Rc<TestContext>);

impl HistoryAdapter for TestHistory {
    fn push(&self, route: Route) {
        self.0
            .history
            .borrow_mut()
            .push(format!("push:{}", route.to_href()));
    }

    fn replace(&self, route: Route) {
        self.0
            .history
            .borrow_mut()
            .push(format!("replace:{}", route.to_href()));
    }
}

struct TestShell(Rc<TestContext>);

impl ViewShell for TestShell {
    fn commit(&self, fragment: &Fragment) {
        self.0
            .log
            .borrow_mut()
            .push(format!("commit:{}", fragment.route.name()));
        self.0.commits.borrow_mut().push(fragment.clone());
    }

    fn notify(&self, message: &str) {
        self.0.notices.borrow_mut().push(message.to_string());
    }
}

struct TestBinder(Rc<TestContext>);

impl ViewBinder for TestBinder {
    fn bind(&self, route: Route) {
        self.0.log.borrow_mut().push(format!("bind:{}", route.name()));
        self.0.bound.borrow_mut().push(route);
    }
}

type TestController = NavigationController<TestSource, TestBinder, TestHistory, TestShell>;

fn controller(ctx: &Rc<TestContext>) -> TestController {
    NavigationController::new(
        Rc::new(TestSession(ctx.clone())),
        ViewLoader::new(TestSource(ctx.clone()), TestBinder(ctx.clone())),
        TestHistory(ctx.clone()),
        TestShell(ctx.clone()),
    )
}

// =========================================================
// Guard substitution
// =========================================================

#[tokio::test]
async fn unauthenticated_protected_route_substitutes_login() {
    let ctx = TestContext::new();
    let ctrl = controller(&ctx);

    let outcome = ctrl.navigate("dashboard").await;

    assert_eq!(outcome, NavOutcome::Committed(Route::Login));
    assert_eq!(ctx.committed_routes(), vec![Route::Login]);
    assert_eq!(*ctx.history.borrow(), vec!["push:#login".to_string()]);
    assert_eq!(*ctx.bound.borrow(), vec![Route::Login]);
}

#[tokio::test]
async fn wrong_role_substitutes_dashboard() {
    let ctx = TestContext::new();
    ctx.set_session(authenticated_session(Role::Farmer));
    let ctrl = controller(&ctx);

    let outcome = ctrl.navigate("wholesaler").await;

    assert_eq!(outcome, NavOutcome::Committed(Route::Dashboard));
    let commits = ctx.commits.borrow();
    assert!(commits[0].html.contains("Otieno"));
}

#[tokio::test]
async fn matching_role_reaches_the_gated_route() {
    let ctx = TestContext::new();
    ctx.set_session(authenticated_session(Role::Farmer));
    let ctrl = controller(&ctx);

    assert_eq!(
        ctrl.navigate("sacco").await,
        NavOutcome::Committed(Route::Sacco)
    );
}

#[tokio::test]
async fn subtree_is_committed_before_it_is_wired() {
    let ctx = TestContext::new();
    let ctrl = controller(&ctx);

    ctrl.navigate("login").await;

    // Form wiring looks elements up by id, so the new subtree must
    // already be in the document when bind runs
    let log = ctx.log.borrow();
    let commit = log.iter().position(|l| l == "commit:login");
    let bind = log.iter().position(|l| l == "bind:login");
    assert!(commit.is_some() && bind.is_some(), "log: {:?}", *log);
    assert!(commit < bind, "commit must precede bind, log: {:?}", *log);
}

#[tokio::test]
async fn unknown_route_renders_welcome() {
    let ctx = TestContext::new();
    let ctrl = controller(&ctx);

    let outcome = ctrl.navigate("nonexistent").await;

    assert_eq!(outcome, NavOutcome::Committed(Route::Welcome));
    assert_eq!(*ctx.history.borrow(), vec!["push:/".to_string()]);
}

// =========================================================
// The race rule
// =========================================================

#[tokio::test]
async fn slow_navigation_is_superseded_by_newer_request() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let ctx = TestContext::new();
            ctx.set_session(authenticated_session(Role::Farmer));
            let (gate_tx, gate_rx) = oneshot::channel();
            ctx.gates
                .borrow_mut()
                .insert("/pages/recommendations.html", gate_rx);
            let ctrl = Rc::new(controller(&ctx));

            let slow = {
                let ctrl = ctrl.clone();
                tokio::task::spawn_local(async move { ctrl.navigate("recommendations").await })
            };
            // Wait until the slow request is actually suspended on its fetch
            while !ctx
                .log
                .borrow()
                .iter()
                .any(|l| l == "fetch:/pages/recommendations.html")
            {
                tokio::task::yield_now().await;
            }

            let fast = ctrl.navigate("dashboard").await;
            assert_eq!(fast, NavOutcome::Committed(Route::Dashboard));

            gate_tx.send(()).unwrap();
            assert_eq!(slow.await.unwrap(), NavOutcome::Superseded);

            // Nothing from the stale request may be observable after B committed
            assert_eq!(ctx.committed_routes(), vec![Route::Dashboard]);
            assert_eq!(*ctx.history.borrow(), vec!["push:#dashboard".to_string()]);
            assert_eq!(*ctx.bound.borrow(), vec![Route::Dashboard]);
        })
        .await;
}

#[tokio::test]
async fn stale_failure_is_discarded_without_notice() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let ctx = TestContext::new();
            ctx.set_session(authenticated_session(Role::Farmer));
            let (gate_tx, gate_rx) = oneshot::channel();
            ctx.gates
                .borrow_mut()
                .insert("/pages/recommendations.html", gate_rx);
            ctx.failing
                .borrow_mut()
                .insert("/pages/recommendations.html");
            let ctrl = Rc::new(controller(&ctx));

            let slow = {
                let ctrl = ctrl.clone();
                tokio::task::spawn_local(async move { ctrl.navigate("recommendations").await })
            };
            while ctx.log.borrow().is_empty() {
                tokio::task::yield_now().await;
            }

            ctrl.navigate("dashboard").await;
            gate_tx.send(()).unwrap();

            assert_eq!(slow.await.unwrap(), NavOutcome::Superseded);
            assert!(ctx.notices.borrow().is_empty(), "stale failure must stay silent");
        })
        .await;
}

// =========================================================
// Failure semantics
// =========================================================

#[tokio::test]
async fn render_failure_keeps_previous_view_and_notifies() {
    let ctx = TestContext::new();
    let ctrl = controller(&ctx);

    assert_eq!(
        ctrl.navigate("welcome").await,
        NavOutcome::Committed(Route::Welcome)
    );

    ctx.failing.borrow_mut().insert("/pages/login.html");
    let outcome = ctrl.navigate("login").await;

    assert_eq!(outcome, NavOutcome::Failed);
    // The previously committed view is untouched, the user gets a notice
    assert_eq!(ctx.committed_routes(), vec![Route::Welcome]);
    assert_eq!(ctx.notices.borrow().len(), 1);
    assert_eq!(*ctx.history.borrow(), vec!["push:/".to_string()]);
}

// =========================================================
// History behaviour
// =========================================================

#[tokio::test]
async fn popstate_never_pushes_history() {
    let ctx = TestContext::new();
    let ctrl = controller(&ctx);

    let outcome = ctrl.handle_popstate("/", "#marketplace").await;

    assert_eq!(outcome, NavOutcome::Committed(Route::Marketplace));
    assert!(ctx.history.borrow().is_empty());
}

#[tokio::test]
async fn popstate_guard_redirect_replaces_the_entry() {
    let ctx = TestContext::new();
    let ctrl = controller(&ctx);

    let outcome = ctrl.handle_popstate("/", "#dashboard").await;

    assert_eq!(outcome, NavOutcome::Committed(Route::Login));
    assert_eq!(*ctx.history.borrow(), vec!["replace:#login".to_string()]);
}

#[tokio::test]
async fn back_button_returns_to_previous_view_without_new_entry() {
    let ctx = TestContext::new();
    ctx.set_session(authenticated_session(Role::Farmer));
    let ctrl = controller(&ctx);

    ctrl.navigate("dashboard").await;
    ctrl.navigate("marketplace").await;
    // Browser fires popstate with the dashboard entry's location
    let outcome = ctrl.handle_popstate("/", "#dashboard").await;

    assert_eq!(outcome, NavOutcome::Committed(Route::Dashboard));
    assert_eq!(
        *ctx.history.borrow(),
        vec!["push:#dashboard".to_string(), "push:#marketplace".to_string()]
    );
}

// =========================================================
// Session transitions
// =========================================================

#[tokio::test]
async fn logout_regates_protected_routes() {
    let ctx = TestContext::new();
    ctx.set_session(authenticated_session(Role::Farmer));
    let ctrl = controller(&ctx);

    assert_eq!(
        ctrl.navigate("dashboard").await,
        NavOutcome::Committed(Route::Dashboard)
    );

    // Session store cleared; the auto-redirect sends the user home
    ctx.set_session(Session::default());
    assert_eq!(
        ctrl.redirect(Route::Welcome).await,
        NavOutcome::Committed(Route::Welcome)
    );

    // Any later attempt at a protected route resolves to login again
    assert_eq!(
        ctrl.navigate("dashboard").await,
        NavOutcome::Committed(Route::Login)
    );
}

#[tokio::test]
async fn same_route_navigation_rerenders_idempotently() {
    let ctx = TestContext::new();
    ctx.set_session(authenticated_session(Role::Farmer));
    let ctrl = controller(&ctx);

    ctrl.navigate("dashboard").await;
    ctrl.navigate("dashboard").await;

    assert_eq!(
        ctx.committed_routes(),
        vec![Route::Dashboard, Route::Dashboard]
    );
    // Fresh subtree per commit, so re-binding is safe, not duplicated
    assert_eq!(*ctx.bound.borrow(), vec![Route::Dashboard, Route::Dashboard]);
}

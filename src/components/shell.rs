//! 信号外壳与 DOM 接线
//!
//! `SignalShell` 是控制器提交的落点：内容容器同步写入，
//! 路由、瞬态通知与会话镜像走信号驱动 chrome。
//! `DomBinder` 为提交后的片段接线（表单提交等）；
//! 每次重新绑定先丢弃旧闭包，旧子树的处理器随之失效。

use std::cell::RefCell;
use std::rc::Rc;

use agrolink_shared::{Role, protocol::RegisterRequest, protocol::UpdateProfileRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

use crate::nav::adapter::{ViewBinder, ViewShell};
use crate::nav::loader::Fragment;
use crate::nav::route::Route;
use crate::session::Session;
use crate::{AppController, AppSession};

// =========================================================
// 信号外壳
// =========================================================

/// 内容容器元素 id，`App` 的挂载点与提交写入共用
pub const CONTENT_CONTAINER_ID: &str = "app-content";

/// 视图外壳
///
/// 内容容器的唯一写入方是控制器的提交步骤（经由 `ViewShell`）。
#[derive(Clone, Copy)]
pub struct SignalShell {
    route: ReadSignal<Option<Route>>,
    set_route: WriteSignal<Option<Route>>,
    notice: ReadSignal<Option<String>>,
    set_notice: WriteSignal<Option<String>>,
    session: ReadSignal<Session>,
    set_session: WriteSignal<Session>,
}

impl SignalShell {
    pub fn new() -> Self {
        let (route, set_route) = signal(None);
        let (notice, set_notice) = signal(None);
        let (session, set_session) = signal(Session::default());
        Self {
            route,
            set_route,
            notice,
            set_notice,
            session,
            set_session,
        }
    }

    /// 当前已提交的路由（非响应式读取）
    pub fn current_route(&self) -> Option<Route> {
        self.route.get_untracked()
    }

    pub fn notice_signal(&self) -> ReadSignal<Option<String>> {
        self.notice
    }

    pub fn dismiss_notice(&self) {
        self.set_notice.set(None);
    }

    pub fn session_signal(&self) -> ReadSignal<Session> {
        self.session
    }

    /// 会话变更回调入口（镜像到信号，chrome 随之刷新）
    pub fn mirror_session(&self, session: Session) {
        self.set_session.set(session);
    }
}

impl Default for SignalShell {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewShell for SignalShell {
    /// 交换内容容器为新片段
    ///
    /// 容器写入必须在返回前完成：控制器紧接着运行 `initialize`，
    /// 表单接线要求新子树此刻已在文档中。信号驱动的绑定要到
    /// 下一个 effect 刷新才落地，所以这里直接写 DOM。
    fn commit(&self, fragment: &Fragment) {
        if let Some(container) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONTENT_CONTAINER_ID))
        {
            container.set_inner_html(&fragment.html);
        }
        self.set_route.set(Some(fragment.route));
    }

    fn notify(&self, message: &str) {
        self.set_notice.set(Some(message.to_string()));
    }
}

// =========================================================
// DOM 接线
// =========================================================

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

fn input_value(id: &str) -> String {
    document()
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn select_value(id: &str) -> String {
    document()
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlSelectElement>().ok())
        .map(|select| select.value())
        .unwrap_or_default()
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 视图交互绑定的生产实现
pub struct DomBinder {
    session: Rc<AppSession>,
    shell: SignalShell,
    /// 当前视图的事件闭包，重新绑定时整体丢弃
    handlers: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>>,
}

impl DomBinder {
    pub fn new(session: Rc<AppSession>, shell: SignalShell) -> Self {
        Self {
            session,
            shell,
            handlers: RefCell::new(Vec::new()),
        }
    }

    fn on_submit(&self, form_id: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let Some(doc) = document() else { return };
        let Some(form) = doc.get_element_by_id(form_id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        self.handlers.borrow_mut().push(closure);
    }

    fn bind_login(&self) {
        let session = self.session.clone();
        let shell = self.shell;
        self.on_submit("login-form", move |ev| {
            ev.prevent_default();
            let email = input_value("login-email");
            let password = input_value("login-password");
            let session = session.clone();
            spawn_local(async move {
                // 成功后的跳转由会话订阅统一处理
                if let Err(e) = session.login(email, password).await {
                    shell.notify(e.message());
                }
            });
        });
    }

    fn bind_register(&self) {
        let session = self.session.clone();
        let shell = self.shell;
        self.on_submit("register-form", move |ev| {
            ev.prevent_default();
            let role = match select_value("register-role").as_str() {
                "wholesaler" => Role::Wholesaler,
                _ => Role::Farmer,
            };
            let req = RegisterRequest {
                name: input_value("register-name"),
                email: input_value("register-email"),
                password: input_value("register-password"),
                role,
                county: optional(input_value("register-county")),
                phone: optional(input_value("register-phone")),
            };
            let session = session.clone();
            spawn_local(async move {
                if let Err(e) = session.register(req).await {
                    shell.notify(e.message());
                }
            });
        });
    }

    fn bind_profile(&self) {
        let session = self.session.clone();
        let shell = self.shell;
        self.on_submit("profile-form", move |ev| {
            ev.prevent_default();
            let req = UpdateProfileRequest {
                name: input_value("profile-name"),
                county: optional(input_value("profile-county")),
                phone: optional(input_value("profile-phone")),
            };
            let session = session.clone();
            spawn_local(async move {
                match session.update_profile(req).await {
                    Ok(_) => shell.notify("Profile updated"),
                    Err(e) => shell.notify(e.message()),
                }
            });
        });
    }
}

impl ViewBinder for DomBinder {
    fn bind(&self, route: Route) {
        self.handlers.borrow_mut().clear();
        match route {
            Route::Login => self.bind_login(),
            Route::Register => self.bind_register(),
            Route::Profile => self.bind_profile(),
            // 其余视图只有 data-nav 控件，由全局委托处理
            _ => {}
        }
    }
}

// =========================================================
// data-nav 点击委托
// =========================================================

/// 安装 `[data-nav]` 点击委托（启动时调用一次）
///
/// 片段内的导航控件只需声明 `data-nav="route"`，
/// 不必在每次渲染后单独接线。闭包被泄漏以保持监听器存活。
pub fn install_nav_delegation(controller: Rc<AppController>) {
    let Some(doc) = document() else { return };

    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        let Some(target) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        let Ok(Some(nav_el)) = target.closest("[data-nav]") else {
            return;
        };
        let Some(name) = nav_el.get_attribute("data-nav") else {
            return;
        };

        ev.prevent_default();
        let controller = controller.clone();
        spawn_local(async move {
            let _ = controller.navigate(&name).await;
        });
    });

    let _ = doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

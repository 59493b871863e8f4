//! AgroLink 前端应用
//!
//! 以显式导航控制器为核心的架构：
//! - `nav::route`: 路由定义与守卫表（领域模型）
//! - `nav::controller`: 导航状态机（核心引擎）
//! - `nav::loader`: 渲染策略与伴生页面抽取
//! - `session`: 会话状态管理
//! - `components`: UI chrome 层

mod api;
mod error;
mod logging;
mod session;
mod views;

mod nav {
    pub mod adapter;
    pub mod controller;
    pub mod loader;
    pub mod route;
}

mod components {
    pub mod navbar;
    pub mod notice;
    pub mod shell;
}

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod history;
    mod http;
    mod storage;

    pub use http::HttpClient;
    pub use storage::LocalStorage;
}

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::components::navbar::NavBar;
use crate::components::notice::NoticeHost;
use crate::components::shell::{
    CONTENT_CONTAINER_ID, DomBinder, SignalShell, install_nav_delegation,
};
use crate::nav::adapter::{BrowserHistory, PageSource};
use crate::nav::controller::NavigationController;
use crate::nav::loader::ViewLoader;
use crate::nav::route::Route;
use crate::session::{LocalTokenStore, SessionReader, SessionStore};

/// 生产环境的具体类型组合
pub(crate) type AppSession = SessionStore<ApiClient, LocalTokenStore>;
pub(crate) type AppController =
    NavigationController<PageSource, DomBinder, BrowserHistory, SignalShell>;

/// 会话存储的 Context 句柄
///
/// 存储本身是单线程的（`Rc` + `RefCell`），而 Leptos 的 context 与
/// 渲染闭包要求 `Send + Sync`；`LocalStorage` arena 让句柄满足该约束，
/// 值留在本线程。
pub(crate) type SessionHandle = StoredValue<Rc<AppSession>, LocalStorage>;

#[component]
pub fn App() -> impl IntoView {
    // 1. 构造核心对象（会话以只读句柄注入控制器）
    let shell = SignalShell::new();
    let session: Rc<AppSession> = Rc::new(SessionStore::new(ApiClient::new(""), LocalTokenStore));
    let loader = ViewLoader::new(PageSource, DomBinder::new(session.clone(), shell));
    let controller: Rc<AppController> = Rc::new(NavigationController::new(
        session.clone() as Rc<dyn SessionReader>,
        loader,
        BrowserHistory,
        shell,
    ));

    // 2. 会话变更 -> 刷新 chrome，并在登录/注销后重定向
    {
        let controller = controller.clone();
        session.subscribe(move |current| {
            shell.mirror_session(current.clone());

            let shown = shell.current_route();
            let target = if current.authenticated {
                matches!(shown, Some(Route::Login) | Some(Route::Register))
                    .then_some(Route::Dashboard)
            } else {
                shown.filter(|route| route.requires_auth()).map(|_| Route::Welcome)
            };
            if let Some(route) = target {
                let controller = controller.clone();
                spawn_local(async move {
                    let _ = controller.redirect(route).await;
                });
            }
        });
    }

    // 3. 浏览器后退/前进
    {
        let controller = controller.clone();
        web::history::listen_popstate(move |path, hash| {
            let controller = controller.clone();
            spawn_local(async move {
                let _ = controller.handle_popstate(&path, &hash).await;
            });
        });
    }

    // 4. 片段内导航控件的全局委托
    install_nav_delegation(controller.clone());

    // 5. 启动：先恢复会话，再按当前地址渲染首个视图
    {
        let controller = controller.clone();
        let session = session.clone();
        spawn_local(async move {
            session.restore().await;
            let _ = controller
                .handle_popstate(&web::history::current_path(), &web::history::current_hash())
                .await;
        });
    }

    provide_context(shell);
    provide_context::<SessionHandle>(StoredValue::new_local(session.clone()));

    // 内容容器由提交步骤直接写入，不走响应式绑定
    view! {
        <NavBar />
        <NoticeHost />
        <main id=CONTENT_CONTAINER_ID class="min-h-screen bg-base-200"></main>
    }
}

//! 导航控制器 - 核心引擎
//!
//! 管理"当前显示什么"的状态机，流程：请求 -> 守卫裁决 -> 渲染 -> 提交。
//! 导航请求之间不做互斥：它们可以并发竞争，正确性完全由单调递增的
//! 请求编号仲裁——只有最新请求允许提交，过期结果静默丢弃。
//! 这防止了慢响应回写覆盖更新视图的问题，也因此无需取消在途请求
//! （抓取都是幂等读取）。

use std::cell::Cell;
use std::rc::Rc;

use crate::logging::{log_error, log_info};
use crate::nav::adapter::{FragmentSource, HistoryAdapter, ViewBinder, ViewShell};
use crate::nav::loader::ViewLoader;
use crate::nav::route::{self, Resolution, Route};
use crate::session::{Session, SessionReader};

/// 导航结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// 提交成功（实际渲染的路由，可能已被守卫替换）
    Committed(Route),
    /// 已被更新的请求取代，结果静默丢弃
    Superseded,
    /// 渲染失败，保留原视图并发出瞬态通知
    Failed,
}

/// 导航控制器
///
/// 会话以只读句柄注入；内容容器只在提交步骤写入（单一写者）。
pub struct NavigationController<F, B, H, S>
where
    F: FragmentSource,
    B: ViewBinder,
    H: HistoryAdapter,
    S: ViewShell,
{
    session: Rc<dyn SessionReader>,
    loader: ViewLoader<F, B>,
    history: H,
    shell: S,
    /// 最新请求编号
    latest: Cell<u64>,
}

impl<F, B, H, S> NavigationController<F, B, H, S>
where
    F: FragmentSource,
    B: ViewBinder,
    H: HistoryAdapter,
    S: ViewShell,
{
    pub fn new(
        session: Rc<dyn SessionReader>,
        loader: ViewLoader<F, B>,
        history: H,
        shell: S,
    ) -> Self {
        Self {
            session,
            loader,
            history,
            shell,
            latest: Cell::new(0),
        }
    }

    /// 用户发起的导航（链接点击、data-nav 委托）
    ///
    /// 路由名的解析与守卫裁决统一走 `route::resolve_request`，
    /// 未知名字回退到欢迎页。
    pub async fn navigate(&self, name: &str) -> NavOutcome {
        let session = self.session.current();
        let resolution = route::resolve_request(name, &session);
        self.process(name, resolution, &session, true).await
    }

    /// 程序化重定向（登录成功、注销等）
    pub async fn redirect(&self, route: Route) -> NavOutcome {
        let session = self.session.current();
        let resolution = route::resolve_route(route, &session);
        self.process(route.name(), resolution, &session, true).await
    }

    /// 浏览器后退/前进：从历史位置重新推导路由，不推入新条目。
    /// 启动时的首次渲染也走这里（等价于一次重放）。
    pub async fn handle_popstate(&self, path: &str, hash: &str) -> NavOutcome {
        let session = self.session.current();
        let requested = Route::from_location(path, hash);
        let resolution = route::resolve_route(requested, &session);
        self.process(requested.name(), resolution, &session, false).await
    }

    /// 守卫总是以进入时刻读取的最新会话裁决；历史条目不携带授权状态
    async fn process(
        &self,
        requested: &str,
        resolution: Resolution,
        session: &Session,
        push: bool,
    ) -> NavOutcome {
        let effective = resolution.route;

        if let Some(reason) = resolution.redirect {
            log_info!("[Nav] {} -> {} ({:?})", requested, effective.name(), reason);
        }

        // 分配请求编号；此刻起本请求即为最新
        let id = self.latest.get() + 1;
        self.latest.set(id);

        match self.loader.render(effective, session).await {
            Ok(fragment) => {
                if self.latest.get() != id {
                    // 渲染期间出现了更新的请求
                    return NavOutcome::Superseded;
                }

                self.shell.commit(&fragment);
                self.loader.initialize(effective);

                if push {
                    self.history.push(effective);
                } else if resolution.redirect.is_some() {
                    // popstate 上的守卫替换：修正当前历史条目
                    self.history.replace(effective);
                }

                NavOutcome::Committed(effective)
            }
            Err(e) => {
                if self.latest.get() != id {
                    // 过期的失败同样静默，不打扰用户
                    return NavOutcome::Superseded;
                }

                log_error!("[Nav] Render failed for {}: {}", effective.name(), e);
                self.shell.notify(&format!(
                    "Could not load {}. Please try again.",
                    effective.name()
                ));
                NavOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests;

//! 导航子系统的抽象接口
//!
//! 控制器只依赖这些 trait；生产实现绑定浏览器 API，
//! 测试注入 mock 实现即可在宿主目标驱动整个状态机。

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::nav::loader::Fragment;
use crate::nav::route::Route;
use crate::web::{HttpClient, history};

// =========================================================
// 抽象接口
// =========================================================

/// 伴生页面来源
#[async_trait(?Send)]
pub trait FragmentSource {
    /// 抓取伴生页面的完整 HTML
    async fn fetch_page(&self, path: &str) -> Result<String>;
}

/// 浏览器历史操作
pub trait HistoryAdapter {
    fn push(&self, route: Route);
    /// 守卫重定向时替换当前条目，不产生新条目
    fn replace(&self, route: Route);
}

/// 视图外壳
///
/// 内容容器与 chrome 的唯一写入点：只有控制器的提交步骤调用。
pub trait ViewShell {
    /// 交换内容容器为新片段并刷新 chrome
    fn commit(&self, fragment: &Fragment);
    /// 显示瞬态通知，当前视图保持不变
    fn notify(&self, message: &str);
}

/// 视图交互绑定：提交后为新挂载的子树接线
pub trait ViewBinder {
    fn bind(&self, route: Route);
}

// =========================================================
// 生产环境实现 (浏览器)
// =========================================================

pub struct PageSource;

#[async_trait(?Send)]
impl FragmentSource for PageSource {
    async fn fetch_page(&self, path: &str) -> Result<String> {
        let resp = HttpClient::get(path).await?;
        if !resp.ok() {
            return Err(AppError::backend(format!("HTTP {}", resp.status()))
                .in_op_with("source.fetch_page", path));
        }
        resp.text().await
    }
}

pub struct BrowserHistory;

impl HistoryAdapter for BrowserHistory {
    fn push(&self, route: Route) {
        history::push_state(route.to_href());
    }

    fn replace(&self, route: Route) {
        history::replace_state(route.to_href());
    }
}

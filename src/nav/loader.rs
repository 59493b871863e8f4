//! 视图加载模块
//!
//! 为单个路由产出可挂载片段：本地模板直接插值，
//! 伴生页面先抓取再抽取 body 并剥离内嵌导航（避免双重导航栏）。
//! 提交后 `initialize` 为新子树接线；每次提交都是全新子树，
//! 重复初始化不会造成处理器重复注册。

use crate::error::{AppError, Result};
use crate::nav::adapter::{FragmentSource, ViewBinder};
use crate::nav::route::Route;
use crate::session::Session;
use crate::views;

/// 可挂载的视图片段
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub route: Route,
    pub html: String,
}

/// 渲染策略
#[derive(Clone, Copy)]
pub enum RenderStrategy {
    /// 本地模板（会话数据插值）
    Local(fn(&Session) -> String),
    /// 伴生页面：抓取指定路径后抽取 body
    Companion(&'static str),
}

/// 路由 -> 渲染策略的穷尽映射
pub fn strategy(route: Route) -> RenderStrategy {
    match route {
        Route::Welcome => RenderStrategy::Local(views::welcome),
        Route::Login => RenderStrategy::Companion("/pages/login.html"),
        Route::Register => RenderStrategy::Local(views::register),
        Route::Dashboard => RenderStrategy::Local(views::dashboard),
        Route::Chat => RenderStrategy::Local(views::chat),
        Route::Marketplace => RenderStrategy::Local(views::marketplace),
        Route::Profile => RenderStrategy::Local(views::profile),
        Route::Sacco => RenderStrategy::Local(views::sacco),
        Route::Wholesaler => RenderStrategy::Local(views::wholesaler),
        Route::Recommendations => RenderStrategy::Companion("/pages/recommendations.html"),
        Route::Admin => RenderStrategy::Local(views::admin),
    }
}

// =========================================================
// 片段抽取（纯函数）
// =========================================================

/// 抽取 `<body …>` 与 `</body>` 之间的内容
pub fn extract_body(page: &str) -> Option<String> {
    let open = page.find("<body")?;
    let content_start = open + page[open..].find('>')? + 1;
    let content_end = page.rfind("</body>")?;
    if content_end < content_start {
        return None;
    }
    Some(page[content_start..content_end].to_string())
}

/// 剥离片段中内嵌的第一个 `<nav>` 元素
pub fn strip_embedded_nav(html: &str) -> String {
    const CLOSE: &str = "</nav>";
    if let Some(open) = html.find("<nav") {
        if let Some(close) = html[open..].find(CLOSE) {
            let end = open + close + CLOSE.len();
            let mut out = String::with_capacity(html.len() - (end - open));
            out.push_str(&html[..open]);
            out.push_str(&html[end..]);
            return out;
        }
    }
    html.to_string()
}

// =========================================================
// 视图加载器
// =========================================================

pub struct ViewLoader<F: FragmentSource, B: ViewBinder> {
    source: F,
    binder: B,
}

impl<F: FragmentSource, B: ViewBinder> ViewLoader<F, B> {
    pub fn new(source: F, binder: B) -> Self {
        Self { source, binder }
    }

    /// 渲染路由对应的片段
    ///
    /// 伴生页面的抓取/解析失败统一归类为 `ContentUnavailable`，
    /// 控制器据此走通用恢复路径（保留原视图 + 瞬态通知）。
    pub async fn render(&self, route: Route, session: &Session) -> Result<Fragment> {
        let html = match strategy(route) {
            RenderStrategy::Local(template) => template(session),
            RenderStrategy::Companion(path) => {
                let page = self.source.fetch_page(path).await.map_err(|e| {
                    AppError::content_unavailable(e.message)
                        .in_op_with("loader.fetch_page", path)
                })?;
                let body = extract_body(&page).ok_or_else(|| {
                    AppError::content_unavailable("page has no body element")
                        .in_op_with("loader.extract_body", path)
                })?;
                strip_embedded_nav(&body)
            }
        };

        Ok(Fragment { route, html })
    }

    /// 提交后为新挂载的子树接线
    pub fn initialize(&self, route: Route) {
        self.binder.bind(route);
    }
}

// =========================================================
// 测试
// =========================================================

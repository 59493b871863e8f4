//! History API 封装模块
//!
//! 所有对 window.history / window.location 的操作都集中在此模块。
//! popstate 监听器安装一次，进程生命周期内不卸载。

use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 获取当前 hash 片段（含前导 `#`，无则为空串）
pub fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// 推送 History 状态
pub fn push_state(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(href));
        }
    }
}

/// 替换 History 状态（用于守卫重定向，不产生新条目）
pub fn replace_state(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(href));
        }
    }
}

/// 安装浏览器后退/前进监听
///
/// 回调收到触发时刻的 (path, hash)。闭包被泄漏以保持监听器存活。
pub fn listen_popstate(callback: impl Fn(String, String) + 'static) {
    let closure = Closure::<dyn Fn()>::new(move || {
        callback(current_path(), current_hash());
    });

    if let Some(window) = web_sys::window() {
        let _ =
            window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
    }

    closure.forget();
}

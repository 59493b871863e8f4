//! HTTP 请求封装模块
//!
//! 基于 `web_sys::fetch` 的轻量封装，仅供伴生页面抓取使用；
//! REST API 调用走 `gloo-net`（见 `api.rs`）。

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::error::{AppError, Result};

/// HTTP 响应封装
pub struct HttpResponse {
    inner: Response,
}

impl HttpResponse {
    /// 获取 HTTP 状态码
    pub fn status(&self) -> u16 {
        self.inner.status()
    }

    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        self.inner.ok()
    }

    /// 获取响应体文本
    pub async fn text(self) -> Result<String> {
        let promise = self
            .inner
            .text()
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op("http.text"))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op("http.text"))?;

        text.as_string()
            .ok_or_else(|| AppError::serialization("response body is not a string"))
    }
}

/// 轻量级 HTTP 客户端
pub struct HttpClient;

impl HttpClient {
    /// 发起 GET 请求
    pub async fn get(url: &str) -> Result<HttpResponse> {
        let opts = RequestInit::new();
        opts.set_method("GET");

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op_with("http.get", url))?;

        let window = web_sys::window().ok_or_else(|| AppError::network("window unavailable"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op_with("http.get", url))?;

        let inner: Response = resp_value
            .dyn_into()
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op("http.get"))?;

        Ok(HttpResponse { inner })
    }
}

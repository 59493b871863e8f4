//! REST API 客户端
//!
//! 认证端点的 gloo-net 封装，路径与响应形状由
//! `agrolink_shared::protocol` 的类型化定义给出。

use agrolink_shared::{
    HEADER_AUTHORIZATION, Profile,
    protocol::{
        ApiRequest, AuthResponse, ErrorBody, GetProfileRequest, HttpMethod, LoginRequest,
        ProfileEnvelope, RegisterRequest, UpdateProfileRequest, ValidateRequest,
    },
};
use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};

use crate::error::{AppError, Result};
use crate::session::AuthApi;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// `base_url` 为空表示同源部署
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// 端点元数据（路径 + 方法）完全由请求类型决定
    fn request<R: ApiRequest>(&self) -> RequestBuilder {
        let url = self.url(R::PATH);
        match R::METHOD {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
            HttpMethod::Put => Request::put(&url),
        }
    }

    /// 非 2xx 响应：优先取服务端错误体 `{ message }`，401 归类为会话失效
    async fn error_from(resp: Response, operation: &str) -> AppError {
        let status = resp.status();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("HTTP {}", status),
        };
        let err = if status == 401 {
            AppError::session_invalid(message)
        } else {
            AppError::backend(message)
        };
        err.in_op(operation)
    }

    async fn get_authed<R: ApiRequest>(&self, token: &str, operation: &str) -> Result<R::Response> {
        let resp = self
            .request::<R>()
            .header(HEADER_AUTHORIZATION, &Self::bearer(token))
            .send()
            .await
            .map_err(|e| AppError::network(e.to_string()).in_op(operation))?;

        if !resp.ok() {
            return Err(Self::error_from(resp, operation).await);
        }

        resp.json::<R::Response>()
            .await
            .map_err(|e| AppError::serialization(e.to_string()).in_op(operation))
    }
}

#[async_trait(?Send)]
impl AuthApi for ApiClient {
    async fn validate(&self, token: &str) -> Result<Profile> {
        let envelope: ProfileEnvelope = self
            .get_authed::<ValidateRequest>(token, "api.validate")
            .await?;
        Ok(envelope.user)
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        let resp = self
            .request::<LoginRequest>()
            .json(req)
            .map_err(|e| AppError::serialization(e.to_string()).in_op("api.login"))?
            .send()
            .await
            .map_err(|e| AppError::network(e.to_string()).in_op("api.login"))?;

        if !resp.ok() {
            return Err(Self::error_from(resp, "api.login").await);
        }

        resp.json::<AuthResponse>()
            .await
            .map_err(|e| AppError::serialization(e.to_string()).in_op("api.login"))
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        let resp = self
            .request::<RegisterRequest>()
            .json(req)
            .map_err(|e| AppError::serialization(e.to_string()).in_op("api.register"))?
            .send()
            .await
            .map_err(|e| AppError::network(e.to_string()).in_op("api.register"))?;

        if !resp.ok() {
            return Err(Self::error_from(resp, "api.register").await);
        }

        resp.json::<AuthResponse>()
            .await
            .map_err(|e| AppError::serialization(e.to_string()).in_op("api.register"))
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile> {
        let envelope: ProfileEnvelope = self
            .get_authed::<GetProfileRequest>(token, "api.fetch_profile")
            .await?;
        Ok(envelope.user)
    }

    async fn update_profile(&self, token: &str, req: &UpdateProfileRequest) -> Result<Profile> {
        let resp = self
            .request::<UpdateProfileRequest>()
            .header(HEADER_AUTHORIZATION, &Self::bearer(token))
            .json(req)
            .map_err(|e| AppError::serialization(e.to_string()).in_op("api.update_profile"))?
            .send()
            .await
            .map_err(|e| AppError::network(e.to_string()).in_op("api.update_profile"))?;

        if !resp.ok() {
            return Err(Self::error_from(resp, "api.update_profile").await);
        }

        let envelope: ProfileEnvelope = resp
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()).in_op("api.update_profile"))?;
        Ok(envelope.user)
    }
}

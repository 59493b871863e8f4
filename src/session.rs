//! 会话模块
//!
//! "当前用户是谁、是否已认证"的唯一事实来源。
//! 显式构造后以句柄传入导航控制器，不使用全局单例；
//! 通过注入的 `AuthApi` / `TokenStore` 适配器与浏览器和后端解耦。

use std::cell::RefCell;

use agrolink_shared::{
    Profile, STORAGE_TOKEN_KEY,
    protocol::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest},
};
use async_trait::async_trait;

use crate::error::Result;
use crate::logging::log_info;
use crate::web::LocalStorage;

// =========================================================
// 会话状态
// =========================================================

/// 当前会话快照
///
/// 只由 `SessionStore` 写入；其他组件通过 `current()` 读取副本。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Profile>,
    pub authenticated: bool,
}

impl Session {
    fn established(token: String, user: Profile) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            authenticated: true,
        }
    }
}

// =========================================================
// 抽象接口
// =========================================================

/// 认证后端接口
#[async_trait(?Send)]
pub trait AuthApi {
    /// 校验持久化令牌，成功时返回最新资料
    async fn validate(&self, token: &str) -> Result<Profile>;
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse>;
    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse>;
    async fn fetch_profile(&self, token: &str) -> Result<Profile>;
    async fn update_profile(&self, token: &str, req: &UpdateProfileRequest) -> Result<Profile>;
}

/// 令牌持久化接口
pub trait TokenStore {
    fn get_token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> bool;
    fn clear_token(&self) -> bool;
}

/// 会话只读视图（导航控制器只需要读）
pub trait SessionReader {
    fn current(&self) -> Session;
}

// =========================================================
// 生产环境实现 (浏览器 LocalStorage)
// =========================================================

pub struct LocalTokenStore;

impl TokenStore for LocalTokenStore {
    fn get_token(&self) -> Option<String> {
        LocalStorage::get(STORAGE_TOKEN_KEY)
    }

    fn set_token(&self, token: &str) -> bool {
        LocalStorage::set(STORAGE_TOKEN_KEY, token)
    }

    fn clear_token(&self) -> bool {
        LocalStorage::delete(STORAGE_TOKEN_KEY)
    }
}

// =========================================================
// 会话存储
// =========================================================

type Subscriber = Box<dyn Fn(&Session)>;

/// 会话存储
///
/// 所有变更操作完成后同步通知订阅者（"session changed"），
/// 供界面 chrome 刷新与自动重定向使用，无需轮询。
pub struct SessionStore<A: AuthApi, T: TokenStore> {
    api: A,
    tokens: T,
    state: RefCell<Session>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl<A: AuthApi, T: TokenStore> SessionStore<A, T> {
    pub fn new(api: A, tokens: T) -> Self {
        Self {
            api,
            tokens,
            state: RefCell::new(Session::default()),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// 注册会话变更回调
    pub fn subscribe(&self, subscriber: impl Fn(&Session) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    fn replace(&self, next: Session) {
        *self.state.borrow_mut() = next.clone();
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(&next);
        }
    }

    /// 启动时恢复会话
    ///
    /// 读取持久化令牌并调用后端校验。任何失败（网络、非 2xx、
    /// 载荷异常）都降级为未认证状态并清除令牌，绝不向外抛错。
    pub async fn restore(&self) {
        let Some(token) = self.tokens.get_token() else {
            return;
        };

        match self.api.validate(&token).await {
            Ok(user) => {
                log_info!("[Session] Restored session for {}", user.name);
                self.replace(Session::established(token, user));
            }
            Err(e) => {
                log_info!("[Session] Stored token rejected: {}", e);
                self.tokens.clear_token();
                self.replace(Session::default());
            }
        }
    }

    /// 登录
    ///
    /// 成功时持久化令牌并整体替换会话；失败时状态保持不变，
    /// 服务端的错误消息原样向上传递。
    pub async fn login(&self, email: String, password: String) -> Result<Profile> {
        let req = LoginRequest { email, password };
        let resp = self.api.login(&req).await?;
        self.establish(resp)
    }

    /// 注册，后端语义与登录一致（返回令牌 + 资料）
    pub async fn register(&self, req: RegisterRequest) -> Result<Profile> {
        let resp = self.api.register(&req).await?;
        self.establish(resp)
    }

    fn establish(&self, resp: AuthResponse) -> Result<Profile> {
        self.tokens.set_token(&resp.token);
        let profile = resp.user.clone();
        self.replace(Session::established(resp.token, resp.user));
        Ok(profile)
    }

    /// 注销：纯本地失效，同步完成，不调用后端
    pub fn logout(&self) {
        self.tokens.clear_token();
        self.replace(Session::default());
        log_info!("[Session] Logged out");
    }

    /// 从后端刷新资料快照（整体替换）
    pub async fn refresh_profile(&self) -> Result<Profile> {
        let token = self.require_token()?;
        let user = self.api.fetch_profile(&token).await?;
        self.replace(Session::established(token, user.clone()));
        Ok(user)
    }

    /// 更新资料，以后端返回的快照整体替换本地副本
    pub async fn update_profile(&self, req: UpdateProfileRequest) -> Result<Profile> {
        let token = self.require_token()?;
        let user = self.api.update_profile(&token, &req).await?;
        self.replace(Session::established(token, user.clone()));
        Ok(user)
    }

    fn require_token(&self) -> Result<String> {
        self.state
            .borrow()
            .token
            .clone()
            .ok_or_else(|| crate::error::AppError::unauthorized("not signed in"))
    }
}

impl<A: AuthApi, T: TokenStore> SessionReader for SessionStore<A, T> {
    /// 同步读取当前会话，永不阻塞
    fn current(&self) -> Session {
        self.state.borrow().clone()
    }
}

// =========================================================
// 测试
// =========================================================

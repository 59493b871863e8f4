//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖 DOM 或 web_sys。
//! 封闭的路由枚举 + 静态守卫表，守卫裁决是纯函数，可直接单元测试。

use agrolink_shared::Role;

use crate::session::Session;

/// 应用路由枚举
///
/// 每个变体对应一个视图；访问策略见 `requires_auth` / `gate`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// 欢迎页（根路径，默认路由）
    #[default]
    Welcome,
    Login,
    Register,
    /// 控制面板（需要认证，也是角色不符时的回退页）
    Dashboard,
    /// AI 助手聊天
    Chat,
    /// 农产品市场
    Marketplace,
    Profile,
    /// 合作社互助组（仅 farmer）
    Sacco,
    /// 批发商专区（仅 wholesaler）
    Wholesaler,
    /// AI 推荐（伴生页面）
    Recommendations,
    /// 管理后台（仅 admin）
    Admin,
}

/// 角色门禁
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    /// 任意角色（或无角色限制）
    Any,
    /// 仅限指定角色
    Only(Role),
}

/// 守卫替换原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// 未注册的路由名，回退到欢迎页
    UnknownRoute,
    /// 需要认证但未认证，替换为登录页
    AuthRequired,
    /// 已认证但角色不符，替换为控制面板
    RoleMismatch,
}

/// 守卫裁决结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// 实际应渲染的路由
    pub route: Route,
    /// 若发生了替换，记录原因
    pub redirect: Option<RedirectReason>,
}

impl Route {
    /// 全部已知路由（守卫表测试用）
    pub const ALL: [Route; 11] = [
        Route::Welcome,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Chat,
        Route::Marketplace,
        Route::Profile,
        Route::Sacco,
        Route::Wholesaler,
        Route::Recommendations,
        Route::Admin,
    ];

    /// 路由名解析，未知名字返回 None
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "welcome" => Some(Route::Welcome),
            "login" => Some(Route::Login),
            "register" => Some(Route::Register),
            "dashboard" => Some(Route::Dashboard),
            "chat" => Some(Route::Chat),
            "marketplace" => Some(Route::Marketplace),
            "profile" => Some(Route::Profile),
            "sacco" => Some(Route::Sacco),
            "wholesaler" => Some(Route::Wholesaler),
            "recommendations" => Some(Route::Recommendations),
            "admin" => Some(Route::Admin),
            _ => None,
        }
    }

    /// 路由名（唯一键）
    pub fn name(&self) -> &'static str {
        match self {
            Route::Welcome => "welcome",
            Route::Login => "login",
            Route::Register => "register",
            Route::Dashboard => "dashboard",
            Route::Chat => "chat",
            Route::Marketplace => "marketplace",
            Route::Profile => "profile",
            Route::Sacco => "sacco",
            Route::Wholesaler => "wholesaler",
            Route::Recommendations => "recommendations",
            Route::Admin => "admin",
        }
    }

    /// URL 约定：欢迎页在根路径，其余路由映射为同名 hash
    pub fn to_href(&self) -> &'static str {
        match self {
            Route::Welcome => "/",
            Route::Login => "#login",
            Route::Register => "#register",
            Route::Dashboard => "#dashboard",
            Route::Chat => "#chat",
            Route::Marketplace => "#marketplace",
            Route::Profile => "#profile",
            Route::Sacco => "#sacco",
            Route::Wholesaler => "#wholesaler",
            Route::Recommendations => "#recommendations",
            Route::Admin => "#admin",
        }
    }

    /// 从浏览器位置推导目标路由
    ///
    /// hash 优先；hash 缺失或未知时回退到欢迎页
    /// （守卫在渲染时仍会重新检查，历史条目不携带授权状态）。
    pub fn from_location(_path: &str, hash: &str) -> Self {
        let name = hash.trim_start_matches('#');
        if name.is_empty() {
            return Route::Welcome;
        }
        Route::parse(name).unwrap_or(Route::Welcome)
    }

    /// **核心守卫逻辑：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Profile
                | Route::Sacco
                | Route::Wholesaler
                | Route::Recommendations
                | Route::Admin
        )
    }

    /// 角色门禁表
    pub fn gate(&self) -> RoleGate {
        match self {
            Route::Sacco => RoleGate::Only(Role::Farmer),
            Route::Wholesaler => RoleGate::Only(Role::Wholesaler),
            Route::Admin => RoleGate::Only(Role::Admin),
            _ => RoleGate::Any,
        }
    }

    /// 授权检查：认证要求与角色门禁同时满足
    pub fn is_authorized(&self, session: &Session) -> bool {
        if self.requires_auth() && !session.authenticated {
            return false;
        }
        match self.gate() {
            RoleGate::Any => true,
            RoleGate::Only(role) => session
                .user
                .as_ref()
                .map(|user| user.role == role)
                .unwrap_or(false),
        }
    }
}

/// 对已解析的路由执行守卫裁决
///
/// - 未认证访问受保护路由 -> 登录页
/// - 已认证但角色不符 -> 控制面板
pub fn resolve_route(requested: Route, session: &Session) -> Resolution {
    if requested.is_authorized(session) {
        return Resolution {
            route: requested,
            redirect: None,
        };
    }

    if !session.authenticated {
        Resolution {
            route: Route::Login,
            redirect: Some(RedirectReason::AuthRequired),
        }
    } else {
        Resolution {
            route: Route::Dashboard,
            redirect: Some(RedirectReason::RoleMismatch),
        }
    }
}

/// 对导航请求的路由名执行解析 + 守卫裁决
pub fn resolve_request(name: &str, session: &Session) -> Resolution {
    match Route::parse(name) {
        Some(route) => resolve_route(route, session),
        None => Resolution {
            route: resolve_route(Route::Welcome, session).route,
            redirect: Some(RedirectReason::UnknownRoute),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrolink_shared::Profile;

    fn authenticated(role: Role) -> Session {
        Session {
            token: Some("tok".into()),
            user: Some(Profile {
                id: "u1".into(),
                name: "Test".into(),
                email: "t@example.com".into(),
                role,
                county: None,
                phone: None,
                joined_at: None,
            }),
            authenticated: true,
        }
    }

    #[test]
    fn name_and_parse_are_inverse() {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.name()), Some(route));
        }
    }

    #[test]
    fn welcome_maps_to_root_path_others_to_hash() {
        assert_eq!(Route::Welcome.to_href(), "/");
        for route in Route::ALL {
            if route != Route::Welcome {
                assert_eq!(route.to_href(), format!("#{}", route.name()));
            }
        }
    }

    #[test]
    fn from_location_prefers_hash_and_falls_back_to_welcome() {
        assert_eq!(Route::from_location("/", ""), Route::Welcome);
        assert_eq!(Route::from_location("/", "#marketplace"), Route::Marketplace);
        assert_eq!(Route::from_location("/", "#bogus"), Route::Welcome);
    }

    #[test]
    fn every_protected_route_resolves_to_login_when_unauthenticated() {
        let session = Session::default();
        for route in Route::ALL {
            if route.requires_auth() {
                let resolution = resolve_route(route, &session);
                assert_eq!(resolution.route, Route::Login, "route: {:?}", route);
                assert_eq!(resolution.redirect, Some(RedirectReason::AuthRequired));
            }
        }
    }

    #[test]
    fn role_gated_routes_resolve_to_dashboard_for_wrong_role() {
        let farmer = authenticated(Role::Farmer);
        for route in [Route::Wholesaler, Route::Admin] {
            let resolution = resolve_route(route, &farmer);
            assert_eq!(resolution.route, Route::Dashboard, "route: {:?}", route);
            assert_eq!(resolution.redirect, Some(RedirectReason::RoleMismatch));
        }

        let wholesaler = authenticated(Role::Wholesaler);
        assert_eq!(
            resolve_route(Route::Sacco, &wholesaler).route,
            Route::Dashboard
        );
    }

    #[test]
    fn matching_role_passes_the_gate() {
        assert_eq!(
            resolve_route(Route::Sacco, &authenticated(Role::Farmer)).route,
            Route::Sacco
        );
        assert_eq!(
            resolve_route(Route::Wholesaler, &authenticated(Role::Wholesaler)).route,
            Route::Wholesaler
        );
        assert_eq!(
            resolve_route(Route::Admin, &authenticated(Role::Admin)).route,
            Route::Admin
        );
    }

    #[test]
    fn public_routes_need_no_session() {
        let session = Session::default();
        for route in [Route::Welcome, Route::Login, Route::Register, Route::Chat, Route::Marketplace] {
            assert_eq!(resolve_route(route, &session).route, route);
        }
    }

    #[test]
    fn unknown_name_falls_back_to_welcome() {
        let resolution = resolve_request("nonexistent", &Session::default());
        assert_eq!(resolution.route, Route::Welcome);
        assert_eq!(resolution.redirect, Some(RedirectReason::UnknownRoute));
    }
}

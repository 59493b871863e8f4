use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中持久化认证令牌的固定键名
pub const STORAGE_TOKEN_KEY: &str = "authToken";

/// Bearer 认证头名称
pub const HEADER_AUTHORIZATION: &str = "Authorization";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色
///
/// 与后端的角色字符串一一对应（小写序列化）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Wholesaler,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Wholesaler => "wholesaler",
            Role::Admin => "admin",
        }
    }
}

/// 用户资料快照
///
/// 不可变值对象：每次从后端获取后整体替换，不做字段级修补。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// 所在县/地区
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// 注册时间
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

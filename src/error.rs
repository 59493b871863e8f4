use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
/// 描述错误的语义分类，决定上层的恢复策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    /// 网络层失败（fetch 未能完成）
    Network,
    /// 伴生页面无法获取或解析，导航保留原视图
    ContentUnavailable,
    /// 令牌被后端拒绝，需要降级到未认证状态
    SessionInvalid,
    /// 缺少认证或权限不足
    Unauthorized,
    /// JSON 解析或序列化错误
    Serialization,
    /// 后端返回非 2xx 响应
    Backend,
}

impl ErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorStatus::Network => "NETWORK_ERROR",
            ErrorStatus::ContentUnavailable => "CONTENT_UNAVAILABLE",
            ErrorStatus::SessionInvalid => "SESSION_INVALID",
            ErrorStatus::Unauthorized => "UNAUTHORIZED",
            ErrorStatus::Serialization => "JSON_PARSE_ERROR",
            ErrorStatus::Backend => "BACKEND_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone)]
pub struct ErrorSpan {
    /// 操作名称，如 "loader.fetch_page", "api.login"
    pub operation: String,
    /// 额外的细节信息，如页面路径、路由名等
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 应用领域错误
///
/// 高内聚的错误定义，包含：
/// - status: 错误类型/语义
/// - message: 错误消息（可直接呈现给用户）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct AppError {
    pub status: ErrorStatus,
    pub message: String,
    /// 结构化的操作追踪
    spans: Vec<ErrorSpan>,
}

impl AppError {
    pub fn new(status: ErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::Network, message)
    }

    pub fn content_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::ContentUnavailable, message)
    }

    pub fn session_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::SessionInvalid, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::Unauthorized, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::Serialization, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::Backend, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    /// 获取机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    /// 获取错误消息
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " <- ")?;
                }
                match &span.detail {
                    Some(detail) => write!(f, "{}({})", span.operation, detail)?,
                    None => write!(f, "{}", span.operation)?,
                }
            }
        }
        Ok(())
    }
}


impl std::error::Error for AppError {}

pub type Result<T> = std::result::Result<T, AppError>;

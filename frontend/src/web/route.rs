//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问级别及守卫规则。

use std::fmt::Display;

/// 当前会话的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// 未登录
    #[default]
    Anonymous,
    /// 已登录的普通用户
    Customer,
    /// 管理员
    Admin,
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页（商品列表）
    #[default]
    Home,
    /// 商品详情，携带商品 ID
    ProductDetail(String),
    /// 登录 / 注册
    Auth,
    /// 我的购买 (需要登录)
    Dashboard,
    /// 单个订单的下载页 (需要登录)
    Download(String),
    /// 管理后台 (需要管理员)
    Admin,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 商品详情同时接受 `/product/:id` 与 `/project/:id`。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => return Self::Home,
            "/auth" => return Self::Auth,
            "/dashboard" => return Self::Dashboard,
            "/admin" => return Self::Admin,
            _ => {}
        }

        if let Some(order_id) = trimmed.strip_prefix("/download/") {
            return match order_id {
                id if !id.is_empty() && !id.contains('/') => Self::Download(id.to_string()),
                _ => Self::NotFound,
            };
        }

        let detail = trimmed
            .strip_prefix("/product/")
            .or_else(|| trimmed.strip_prefix("/project/"));
        match detail {
            Some(id) if !id.is_empty() && !id.contains('/') => Self::ProductDetail(id.to_string()),
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::ProductDetail(id) => format!("/product/{id}"),
            Self::Auth => "/auth".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Download(id) => format!("/download/{id}"),
            Self::Admin => "/admin".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 该路由要求的最低访问级别
    pub fn required_access(&self) -> Access {
        match self {
            Self::Dashboard | Self::Download(_) => Access::Customer,
            Self::Admin => Access::Admin,
            _ => Access::Anonymous,
        }
    }

    /// **核心守卫逻辑**
    ///
    /// 返回 `Some(redirect)` 表示当前访问级别不能进入该路由：
    /// 未登录一律去登录页，已登录但不是管理员访问后台则回首页。
    pub fn guard(&self, access: Access) -> Option<AppRoute> {
        match (self.required_access(), access) {
            (Access::Anonymous, _) => None,
            (_, Access::Anonymous) => Some(Self::Auth),
            (Access::Admin, Access::Customer) => Some(Self::Home),
            _ => None,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

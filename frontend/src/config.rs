//! 构建期配置
//!
//! 后端地址与店面变体在编译时通过环境变量注入：
//! - `BACKEND_URL`: 后端根地址，留空表示同源
//! - `STOREFRONT_VARIANT`: `codemart`（默认）或 `codestore`

use codemart_shared::{API_PREFIX, Catalog};
use leptos::prelude::*;

/// 店面变体
///
/// 两个变体共用同一套页面，只在资源路径、令牌存储键、登录端点和品牌名上不同。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    CodeMart,
    CodeStore,
}

impl Variant {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("codestore") => Variant::CodeStore,
            _ => Variant::CodeMart,
        }
    }

    pub fn catalog(&self) -> Catalog {
        match self {
            Variant::CodeMart => Catalog::Products,
            Variant::CodeStore => Catalog::Projects,
        }
    }

    /// 保存访问令牌的 LocalStorage 键
    pub fn token_key(&self) -> &'static str {
        match self {
            Variant::CodeMart => "token",
            Variant::CodeStore => "admin_token",
        }
    }

    pub fn brand(&self) -> &'static str {
        match self {
            Variant::CodeMart => "CodeMart",
            Variant::CodeStore => "CodeStore",
        }
    }

    /// CodeStore 只有后台账号，登录走 `/admin/login`
    pub fn uses_admin_login(&self) -> bool {
        matches!(self, Variant::CodeStore)
    }

    /// 只有项目目录的后端提供单张图片删除
    pub fn supports_image_delete(&self) -> bool {
        matches!(self, Variant::CodeStore)
    }
}

fn is_external_image(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub variant: Variant,
}

impl AppConfig {
    pub fn new(backend_url: &str, variant: Variant) -> Self {
        Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_string(),
            variant,
        }
    }

    /// 读取编译期注入的环境变量
    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("BACKEND_URL").unwrap_or_default(),
            Variant::parse(option_env!("STOREFRONT_VARIANT")),
        )
    }

    /// 所有端点的公共前缀，如 `https://api.example.com/api`
    pub fn api_base(&self) -> String {
        format!("{}{}", self.backend_url, API_PREFIX)
    }

    /// 图片按文件 ID 直接由后端提供
    pub fn image_url(&self, file_id: &str) -> String {
        format!("{}/images/{}", self.api_base(), file_id)
    }

    /// 商品图片字段既可能是完整 URL，也可能是文件 ID
    pub fn resolve_image(&self, reference: &str) -> String {
        if is_external_image(reference) {
            reference.to_string()
        } else {
            self.image_url(reference)
        }
    }

    /// 画廊条目能否单独删除：后端支持，且条目是上传得到的文件 ID 而不是外链
    pub fn can_delete_image(&self, reference: &str) -> bool {
        self.variant.supports_image_delete()
            && !reference.is_empty()
            && !is_external_image(reference)
            && !reference.contains('/')
    }
}

/// 从 Context 获取配置
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig should be provided")
}

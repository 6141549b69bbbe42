use crate::web::HttpError;

/// API 调用错误
///
/// 页面只关心一件事：有没有后端给出的 `detail` 文本可以直接展示。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("request failed with status {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// 需要令牌但当前未登录，请求不会发出
    #[error("not signed in")]
    Unauthenticated,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 由非 2xx 响应构造，尝试读取 `{"detail": "..."}`
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));
        ApiError::Status { status, detail }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            ApiError::Unauthenticated => Some("Please login first"),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 提示文本：优先使用后端 detail，否则使用调用方给出的默认文案
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_read_from_body() {
        let err = ApiError::from_response(401, r#"{"detail":"Invalid credentials"}"#);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message_or("Login failed"), "Invalid credentials");
    }

    #[test]
    fn test_non_string_detail_falls_back() {
        let err = ApiError::from_response(422, r#"{"detail":[{"loc":["body"],"msg":"x"}]}"#);
        assert_eq!(err.detail(), None);
        assert_eq!(err.message_or("Failed to save product"), "Failed to save product");

        let html = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(html.message_or("Purchase failed"), "Purchase failed");
    }

    #[test]
    fn test_unauthenticated_has_its_own_message() {
        let err = ApiError::Unauthenticated;
        assert_eq!(err.status(), None);
        assert_eq!(err.message_or("Download failed"), "Please login first");
    }

    #[test]
    fn test_transport_error_uses_fallback() {
        let err = ApiError::from(HttpError::NetworkError("offline".into()));
        assert_eq!(err.status(), None);
        assert_eq!(err.message_or("Download failed"), "Download failed");
    }
}

//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 发送请求，并通过 `HttpTransport` trait 与 API 客户端解耦，
//! 单元测试中以 `MockTransport` 替换。

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, Response};

pub use codemart_shared::protocol::HttpMethod;

/// HTTP 错误类型
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("failed to build request: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("network error: {0}")]
    NetworkError(String),
    /// 响应读取失败
    #[error("failed to read response: {0}")]
    ResponseParseFailed(String),
}

/// 待上传文件的来源
#[derive(Debug, Clone)]
pub enum FileSource {
    /// 来自 `<input type="file">`
    Browser(web_sys::File),
    /// 内存中的字节，仅测试构造
    #[cfg(test)]
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub source: FileSource,
}

impl UploadFile {
    pub fn from_browser(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            source: FileSource::Browser(file),
        }
    }

    #[cfg(test)]
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(String),
    /// 单字段 multipart 表单，`Content-Type`（含 boundary）由浏览器生成
    Multipart {
        field: &'static str,
        file: UploadFile,
    },
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// 添加请求头
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 设置 JSON 请求体
    pub fn with_json(self, body: String) -> Self {
        let mut req = self.with_header("Content-Type", "application/json");
        req.body = RequestBody::Json(body);
        req
    }

    pub fn with_multipart(mut self, field: &'static str, file: UploadFile) -> Self {
        self.body = RequestBody::Multipart { field, file };
        self
    }
}

/// HTTP 响应（状态码 + 文本）
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: 浏览器 fetch
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    fn build_form(field: &str, file: &UploadFile) -> Result<FormData, HttpError> {
        let form = FormData::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("FormData: {:?}", e)))?;

        let appended = match &file.source {
            FileSource::Browser(blob) => form.append_with_blob_and_filename(field, blob, &file.name),
            #[cfg(test)]
            FileSource::Bytes(bytes) => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let parts = js_sys::Array::of1(&array);
                let blob = web_sys::Blob::new_with_u8_array_sequence(&parts)
                    .map_err(|e| HttpError::RequestBuildFailed(format!("Blob: {:?}", e)))?;
                form.append_with_blob_and_filename(field, &blob, &file.name)
            }
        };
        appended.map_err(|e| HttpError::RequestBuildFailed(format!("FormData.append: {:?}", e)))?;

        Ok(form)
    }
}

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("Headers: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("header {key}: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            RequestBody::Empty => {}
            RequestBody::Json(body) => opts.set_body(&JsValue::from_str(body)),
            RequestBody::Multipart { field, file } => {
                let form = Self::build_form(field, file)?;
                opts.set_body(&form.into());
            }
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("window is unavailable".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseParseFailed(format!("not a Response: {:?}", e)))?;

        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub(crate) use mock::{MockTransport, RecordedRequest};

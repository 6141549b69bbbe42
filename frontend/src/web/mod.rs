//! 原生 Web API 封装模块
//!
//! 对 fetch、LocalStorage、History 与 window 对话框的轻量级封装。

mod http;
pub mod route;
pub mod router;
mod storage;
mod window;

pub use http::{FetchTransport, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport, UploadFile};
pub use storage::{KeyValueStore, LocalStorage};
pub use window::{confirm, open_in_new_tab};

#[cfg(test)]
pub(crate) use http::{MockTransport, RecordedRequest};
#[cfg(test)]
pub(crate) use storage::MemoryStore;

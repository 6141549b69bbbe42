//! window 对话框与新窗口

/// 原生确认框；无法弹出时视为取消
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 在新标签页打开链接（下载地址）
pub fn open_in_new_tab(url: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.open_with_url_and_target(url, "_blank").ok())
        .flatten()
        .is_some()
}

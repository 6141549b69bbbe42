//! 全局提示（Toast）
//!
//! 页面只负责调用 `success` / `error`，渲染由 `Toaster` 组件完成。

use leptos::prelude::*;
use std::time::Duration;

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn toasts(&self) -> RwSignal<Vec<Toast>> {
        self.toasts
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| list.push(Toast { id, kind, message }));

        // 3秒后清除
        let toasts = self.toasts;
        set_timeout(
            move || {
                toasts.try_update(|list| list.retain(|t| t.id != id));
            },
            TOAST_TTL,
        );
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

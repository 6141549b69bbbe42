use crate::notify::{ToastKind, use_notifier};
use leptos::prelude::*;

/// 右上角提示框，点击立即关闭
#[component]
pub fn Toaster() -> impl IntoView {
    let notifier = use_notifier();
    let toasts = notifier.toasts();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "alert alert-success shadow-lg cursor-pointer",
                        ToastKind::Error => "alert alert-error shadow-lg cursor-pointer",
                    };
                    view! {
                        <div role="alert" class=class on:click=move |_| notifier.dismiss(id)>
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}

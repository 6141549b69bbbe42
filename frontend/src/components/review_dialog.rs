//! 评价对话框
//!
//! 提交后评价需管理员审核才会公开显示。

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::Star;
use crate::notify::use_notifier;
use codemart_shared::{MAX_RATING, ReviewInput, clamp_rating};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ReviewDialog(
    #[prop(into)] product_id: String,
    /// 对话框开关，由父组件控制
    open: RwSignal<bool>,
) -> impl IntoView {
    let new_api = use_api();
    let auth = use_auth();
    let notifier = use_notifier();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let rating = RwSignal::new(MAX_RATING);
    let comment = RwSignal::new(String::new());
    let (submitting, set_submitting) = signal(false);
    let product_id = StoredValue::new(product_id);

    let reset_form = move || {
        rating.set(MAX_RATING);
        comment.set(String::new());
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if !auth.is_authenticated() {
            notifier.error("Please login to submit a review");
            return;
        }

        let review = ReviewInput {
            product_id: product_id.get_value(),
            rating: clamp_rating(rating.get_untracked()),
            comment: comment.get_untracked(),
        };
        set_submitting.set(true);
        let api = new_api();
        spawn_local(async move {
            match api.submit_review(&review).await {
                Ok(_) => {
                    notifier.success("Review submitted! It will be visible after approval.");
                    open.try_set(false);
                    reset_form();
                }
                Err(e) => notifier.error(e.message_or("Failed to submit review")),
            }
            set_submitting.try_set(false);
        });
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Write a Review"</h3>
                <p class="py-2 text-base-content/70">"Share your experience with this product"</p>

                <form on:submit=on_submit class="space-y-4">
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Rating"</span>
                        </label>
                        <div class="flex gap-2">
                            {(1..=MAX_RATING)
                                .map(|star| view! {
                                    <button type="button" on:click=move |_| rating.set(star)>
                                        <Star attr:class=move || if star <= rating.get() {
                                            "h-8 w-8 fill-warning text-warning"
                                        } else {
                                            "h-8 w-8 text-base-content/30"
                                        } />
                                    </button>
                                })
                                .collect_view()}
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="review_comment" class="label">
                            <span class="label-text">"Comment"</span>
                        </label>
                        <textarea
                            id="review_comment"
                            rows="4"
                            placeholder="Write your review..."
                            class="textarea textarea-bordered w-full"
                            prop:value=move || comment.get()
                            on:input=move |ev| comment.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                        <button type="submit" disabled=move || submitting.get() class="btn btn-primary">
                            {move || if submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                            } else {
                                "Submit Review".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

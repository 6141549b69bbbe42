//! 商品新建 / 编辑对话框
//!
//! 列表字段（标签、技术栈、图库）以逗号分隔输入。

use crate::admin::save_product;
use crate::api::use_api;
use crate::loadable::{Loadable, mutate_into};
use crate::notify::use_notifier;
use codemart_shared::{CATEGORIES, Product};
use leptos::prelude::*;

use super::form_state::{ProductDraft, ProductFormState};

/// 单行文本输入，绑定到草稿的一个字段
#[component]
fn DraftInput(
    state: ProductFormState,
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(optional, into)] placeholder: String,
    #[prop(optional)] required: bool,
    get: fn(&ProductDraft) -> String,
    set: fn(&mut ProductDraft, String),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id.clone() class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type="text"
                placeholder=placeholder
                required=required
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    state.edit(|d| set(d, value));
                }
                prop:value=move || state.draft.with(get)
                class="input input-bordered w-full"
            />
        </div>
    }
}

#[component]
pub fn ProductDialog(
    state: ProductFormState,
    open: RwSignal<bool>,
    products: RwSignal<Loadable<Vec<Product>>>,
) -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

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

        let input = match state.draft.with_untracked(ProductDraft::to_input) {
            Ok(input) => input,
            Err(e) => {
                notifier.error(e.to_string());
                return;
            }
        };
        let editing = state.editing.get_untracked();
        let success = if editing.is_some() {
            "Product updated"
        } else {
            "Product created"
        };
        let api = new_api();
        mutate_into(
            products,
            notifier,
            success,
            "Failed to save product",
            async move {
                save_product(&api, editing.as_deref(), input)
                    .await
                    .map(Some)
            },
        );

        open.set(false);
        state.reset();
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box max-w-3xl">
                <h3 class="font-bold text-lg">
                    {move || if state.is_editing() { "Edit Product" } else { "Add New Product" }}
                </h3>

                <form on:submit=on_submit class="space-y-4 mt-4">
                    <DraftInput state=state id="p_title" label="Title" required=true
                        get=|d| d.title.clone() set=|d, v| d.title = v />
                    <DraftInput state=state id="p_tagline" label="Tagline" required=true
                        get=|d| d.tagline.clone() set=|d, v| d.tagline = v />

                    <div class="form-control">
                        <label for="p_description" class="label">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="p_description"
                            rows="4"
                            required
                            class="textarea textarea-bordered w-full"
                            prop:value=move || state.draft.with(|d| d.description.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                state.edit(|d| d.description = value);
                            }
                        ></textarea>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="p_price" class="label">
                                <span class="label-text">"Price (₹)"</span>
                            </label>
                            <input
                                id="p_price"
                                type="number"
                                min="0"
                                step="0.01"
                                required
                                class="input input-bordered w-full"
                                prop:value=move || state.draft.with(|d| d.price.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.edit(|d| d.price = value);
                                }
                            />
                        </div>
                        <div class="form-control">
                            <label for="p_category" class="label">
                                <span class="label-text">"Category"</span>
                            </label>
                            <select
                                id="p_category"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.edit(|d| d.category = value);
                                }
                            >
                                {CATEGORIES
                                    .into_iter()
                                    .map(|c| view! {
                                        <option value=c selected=move || state.draft.with(|d| d.category == c)>{c}</option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                    </div>

                    <DraftInput state=state id="p_tags" label="Tags (comma-separated)" placeholder="react, nodejs, mongodb"
                        get=|d| d.tags.clone() set=|d, v| d.tags = v />
                    <DraftInput state=state id="p_tech" label="Tech Stack (comma-separated)" placeholder="React, FastAPI"
                        get=|d| d.tech_stack.clone() set=|d, v| d.tech_stack = v />
                    <DraftInput state=state id="p_demo" label="Demo URL" placeholder="https://demo.example.com"
                        get=|d| d.demo_url.clone() set=|d, v| d.demo_url = v />
                    <DraftInput state=state id="p_license" label="License Type"
                        get=|d| d.license_type.clone() set=|d, v| d.license_type = v />
                    <DraftInput state=state id="p_thumbnail" label="Thumbnail URL"
                        get=|d| d.thumbnail.clone() set=|d, v| d.thumbnail = v />
                    <DraftInput state=state id="p_gallery" label="Gallery (comma-separated URLs)"
                        get=|d| d.gallery.clone() set=|d, v| d.gallery = v />

                    <div class="form-control">
                        <label class="label cursor-pointer justify-start gap-4">
                            <input
                                type="checkbox"
                                class="toggle toggle-primary"
                                prop:checked=move || state.draft.with(|d| d.is_published)
                                on:change=move |ev| {
                                    let checked = event_target_checked(&ev);
                                    state.edit(|d| d.is_published = checked);
                                }
                            />
                            <span class="label-text">"Published"</span>
                        </label>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                        <button type="submit" class="btn btn-primary">
                            {move || if state.is_editing() { "Update Product" } else { "Create Product" }}
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

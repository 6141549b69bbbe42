use crate::admin::create_coupon;
use crate::api::use_api;
use crate::loadable::{Loadable, mutate_into};
use crate::notify::use_notifier;
use codemart_shared::{Coupon, DiscountType};
use leptos::prelude::*;

use super::form_state::{CouponDraft, parse_discount_type};

#[component]
pub fn CouponDialog(open: RwSignal<bool>, coupons: RwSignal<Loadable<Vec<Coupon>>>) -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let draft = RwSignal::new(CouponDraft::default());

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
        let input = match draft.with_untracked(CouponDraft::to_input) {
            Ok(input) => input,
            Err(e) => {
                notifier.error(e.to_string());
                return;
            }
        };
        let api = new_api();
        mutate_into(
            coupons,
            notifier,
            "Coupon created",
            "Failed to create coupon",
            async move { create_coupon(&api, &input).await.map(Some) },
        );
        open.set(false);
        draft.set(CouponDraft::default());
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Create Coupon"</h3>

                <form on:submit=on_submit class="space-y-4 mt-4">
                    <div class="form-control">
                        <label for="c_code" class="label">
                            <span class="label-text">"Code"</span>
                        </label>
                        <input
                            id="c_code"
                            type="text"
                            placeholder="SAVE20"
                            required
                            class="input input-bordered w-full uppercase"
                            prop:value=move || draft.with(|d| d.code.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.set_code(&value));
                            }
                        />
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="c_type" class="label">
                                <span class="label-text">"Discount Type"</span>
                            </label>
                            <select
                                id="c_type"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    let kind = parse_discount_type(&event_target_value(&ev));
                                    draft.update(|d| d.discount_type = kind);
                                }
                            >
                                {[DiscountType::Flat, DiscountType::Percent]
                                    .into_iter()
                                    .map(|kind| view! {
                                        <option
                                            value=kind.as_str()
                                            selected=move || draft.with(|d| d.discount_type == kind)
                                        >
                                            {match kind {
                                                DiscountType::Flat => "Flat Amount",
                                                DiscountType::Percent => "Percentage",
                                            }}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label for="c_value" class="label">
                                <span class="label-text">"Discount Value"</span>
                            </label>
                            <input
                                id="c_value"
                                type="number"
                                min="0"
                                step="0.01"
                                required
                                class="input input-bordered w-full"
                                prop:value=move || draft.with(|d| d.discount_value.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    draft.update(|d| d.discount_value = value);
                                }
                            />
                        </div>
                    </div>
                    <div class="form-control">
                        <label for="c_min" class="label">
                            <span class="label-text">"Minimum Purchase"</span>
                        </label>
                        <input
                            id="c_min"
                            type="number"
                            min="0"
                            step="0.01"
                            class="input input-bordered w-full"
                            prop:value=move || draft.with(|d| d.min_purchase.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.min_purchase = value);
                            }
                        />
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                        <button type="submit" class="btn btn-primary">"Create Coupon"</button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

use crate::api::use_api;
use crate::components::icons::Plus;
use crate::display::format_date;
use crate::loadable::{Loadable, load_into};
use crate::notify::use_notifier;
use codemart_shared::{CURRENCY_SYMBOL, Coupon};
use leptos::prelude::*;

use super::TableStatus;
use super::coupon_dialog::CouponDialog;

#[component]
pub fn CouponsPanel() -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let coupons = RwSignal::new(Loadable::<Vec<Coupon>>::pending());
    let dialog_open = RwSignal::new(false);

    let api = new_api();
    load_into(coupons, notifier, "Failed to load coupons", async move {
        api.coupons().await
    });

    view! {
        <div class="space-y-4">
            <div class="flex justify-end">
                <button class="btn btn-primary gap-2" on:click=move |_| dialog_open.set(true)>
                    <Plus attr:class="h-4 w-4" /> "Create Coupon"
                </button>
            </div>

            <div class="card bg-base-100 shadow overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Code"</th>
                            <th>"Discount"</th>
                            <th>"Min Purchase"</th>
                            <th>"Uses"</th>
                            <th>"Status"</th>
                            <th>"Created"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || coupons.with(|c| c.data.clone())
                            key=|coupon| coupon.id.clone()
                            children=|coupon| {
                                let uses = match coupon.base.max_uses {
                                    Some(max) => format!("{} / {}", coupon.uses, max),
                                    None => coupon.uses.to_string(),
                                };
                                view! {
                                    <tr>
                                        <td class="font-mono font-semibold">{coupon.base.code.clone()}</td>
                                        <td>{coupon.discount_label()}</td>
                                        <td>{format!("{CURRENCY_SYMBOL}{}", coupon.base.min_purchase)}</td>
                                        <td>{uses}</td>
                                        <td>
                                            <span class=if coupon.is_active { "badge badge-success" } else { "badge badge-ghost" }>
                                                {if coupon.is_active { "Active" } else { "Inactive" }}
                                            </span>
                                        </td>
                                        <td>{format_date(&coupon.created_at)}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <TableStatus
                    loading=Signal::derive(move || coupons.with(|c| c.loading))
                    empty=Signal::derive(move || coupons.with(|c| c.data.is_empty()))
                    message="No coupons yet"
                />
            </div>

            <CouponDialog open=dialog_open coupons=coupons />
        </div>
    }
}

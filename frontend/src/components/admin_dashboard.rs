//! 管理后台
//!
//! 五个标签页各自在挂载时拉取数据，写操作成功后整体刷新对应列表。

mod coupon_dialog;
mod coupons_panel;
mod form_state;
mod product_dialog;
mod products_panel;

use crate::admin::approve_review;
use crate::api::use_api;
use crate::components::icons::{Check, DollarSign, Package, ShoppingBag, TrendingUp};
use crate::components::navbar::Navbar;
use crate::display::{format_date, short_id, truncate};
use crate::loadable::{Loadable, load_into, mutate_into};
use crate::notify::use_notifier;
use codemart_shared::{Analytics, CURRENCY_SYMBOL, Order, Review, format_price};
use leptos::prelude::*;

use coupons_panel::CouponsPanel;
use products_panel::ProductsPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Analytics,
    Products,
    Orders,
    Coupons,
    Reviews,
}

impl AdminTab {
    const ALL: [AdminTab; 5] = [
        AdminTab::Analytics,
        AdminTab::Products,
        AdminTab::Orders,
        AdminTab::Coupons,
        AdminTab::Reviews,
    ];

    fn label(&self) -> &'static str {
        match self {
            AdminTab::Analytics => "Analytics",
            AdminTab::Products => "Products",
            AdminTab::Orders => "Orders",
            AdminTab::Coupons => "Coupons",
            AdminTab::Reviews => "Reviews",
        }
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let (tab, set_tab) = signal(AdminTab::Analytics);

    let panel = move || match tab.get() {
        AdminTab::Analytics => view! { <AnalyticsPanel /> }.into_any(),
        AdminTab::Products => view! { <ProductsPanel /> }.into_any(),
        AdminTab::Orders => view! { <OrdersPanel /> }.into_any(),
        AdminTab::Coupons => view! { <CouponsPanel /> }.into_any(),
        AdminTab::Reviews => view! { <ReviewsPanel /> }.into_any(),
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans pb-20">
            <Navbar />
            <div class="max-w-7xl mx-auto px-6 py-8 space-y-8">
                <h1 class="text-4xl font-bold">"Admin Dashboard"</h1>

                <div role="tablist" class="tabs tabs-boxed w-fit">
                    {AdminTab::ALL
                        .into_iter()
                        .map(|t| view! {
                            <a
                                role="tab"
                                class=move || if tab.get() == t { "tab tab-active" } else { "tab" }
                                on:click=move |_| set_tab.set(t)
                            >
                                {t.label()}
                            </a>
                        })
                        .collect_view()}
                </div>

                {panel}
            </div>
        </div>
    }
}

/// 表格加载中 / 空列表占位
#[component]
pub(crate) fn TableStatus(
    loading: Signal<bool>,
    empty: Signal<bool>,
    #[prop(into)] message: String,
) -> impl IntoView {
    view! {
        <Show when=move || loading.get() && empty.get()>
            <div class="flex justify-center py-12">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        </Show>
        <Show when=move || !loading.get() && empty.get()>
            <div class="text-center py-12 text-base-content/50">{message.clone()}</div>
        </Show>
    }
}

// =========================================================
// Analytics
// =========================================================

#[component]
fn AnalyticsPanel() -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let analytics = RwSignal::new(Loadable::<Analytics>::pending());

    let api = new_api();
    load_into(analytics, notifier, "Failed to load analytics", async move {
        api.analytics().await
    });

    let stat = move |f: fn(&Analytics) -> String| move || analytics.with(|a| f(&a.data));

    view! {
        <div class="space-y-8">
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary"><ShoppingBag attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Total Orders"</div>
                    <div class="stat-value text-primary">{stat(|a| a.total_orders.to_string())}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-success"><DollarSign attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Total Revenue"</div>
                    <div class="stat-value text-success">{stat(|a| format!("{CURRENCY_SYMBOL}{:.2}", a.total_revenue))}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-secondary"><Package attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Total Products"</div>
                    <div class="stat-value text-secondary">{stat(|a| a.total_products.to_string())}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title gap-2"><TrendingUp attr:class="h-5 w-5" /> "Top Products"</h2>
                    <div class="space-y-3">
                        <For
                            each=move || analytics.with(|a| a.data.top_products.clone())
                            key=|product| product.id.clone()
                            children=|product| view! {
                                <div class="flex items-center justify-between p-3 bg-base-200 rounded-lg">
                                    <div>
                                        <p class="font-semibold">{product.base.title.clone()}</p>
                                        <p class="text-sm text-base-content/60">{format!("{} downloads", product.downloads)}</p>
                                    </div>
                                    <span class="font-bold text-primary">{product.price_label()}</span>
                                </div>
                            }
                        />
                    </div>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// Orders
// =========================================================

#[component]
fn OrdersPanel() -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let orders = RwSignal::new(Loadable::<Vec<Order>>::pending());

    let api = new_api();
    load_into(orders, notifier, "Failed to load orders", async move {
        api.all_orders().await
    });

    view! {
        <div class="card bg-base-100 shadow overflow-x-auto">
            <table class="table">
                <thead>
                    <tr>
                        <th>"Order ID"</th>
                        <th>"Product"</th>
                        <th>"User"</th>
                        <th>"Amount"</th>
                        <th>"Coupon"</th>
                        <th>"Status"</th>
                        <th>"Date"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || orders.with(|o| o.data.clone())
                        key=|order| order.id.clone()
                        children=|order| {
                            let badge = if order.is_completed() { "badge badge-success" } else { "badge badge-warning" };
                            view! {
                                <tr>
                                    <td class="font-mono">{short_id(&order.id)}</td>
                                    <td class="font-mono">{short_id(&order.product_id)}</td>
                                    <td class="font-mono">{short_id(&order.user_id)}</td>
                                    <td>{format_price(order.amount)}</td>
                                    <td>{order.coupon_code.clone().unwrap_or_else(|| "-".to_string())}</td>
                                    <td><span class=badge>{order.status.as_str()}</span></td>
                                    <td>{format_date(&order.created_at)}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            <TableStatus
                loading=Signal::derive(move || orders.with(|o| o.loading))
                empty=Signal::derive(move || orders.with(|o| o.data.is_empty()))
                message="No orders yet"
            />
        </div>
    }
}

// =========================================================
// Reviews
// =========================================================

#[component]
fn ReviewsPanel() -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let reviews = RwSignal::new(Loadable::<Vec<Review>>::pending());

    let api = new_api();
    load_into(reviews, notifier, "Failed to load reviews", async move {
        api.all_reviews().await
    });

    let on_approve = move |id: String| {
        let api = new_api();
        mutate_into(
            reviews,
            notifier,
            "Review approved",
            "Failed to approve review",
            async move { approve_review(&api, &id).await.map(Some) },
        );
    };

    view! {
        <div class="card bg-base-100 shadow overflow-x-auto">
            <table class="table">
                <thead>
                    <tr>
                        <th>"User"</th>
                        <th>"Product"</th>
                        <th>"Rating"</th>
                        <th>"Comment"</th>
                        <th>"Status"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || reviews.with(|r| r.data.clone())
                        key=|review| (review.id.clone(), review.is_approved)
                        children=move |review| {
                            let id = review.id.clone();
                            let approved = review.is_approved;
                            view! {
                                <tr>
                                    <td>{review.user_name.clone()}</td>
                                    <td class="font-mono">{short_id(&review.product_id)}</td>
                                    <td>{format!("{} ★", review.rating)}</td>
                                    <td class="max-w-xs">{truncate(&review.comment, 60)}</td>
                                    <td>
                                        {if approved {
                                            view! { <span class="badge badge-success">"Approved"</span> }.into_any()
                                        } else {
                                            view! { <span class="badge badge-warning">"Pending"</span> }.into_any()
                                        }}
                                    </td>
                                    <td>
                                        <Show when=move || !approved>
                                            {
                                                let id = id.clone();
                                                view! {
                                                    <button class="btn btn-success btn-sm gap-1" on:click=move |_| on_approve(id.clone())>
                                                        <Check attr:class="h-4 w-4" /> "Approve"
                                                    </button>
                                                }
                                            }
                                        </Show>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            <TableStatus
                loading=Signal::derive(move || reviews.with(|r| r.loading))
                empty=Signal::derive(move || reviews.with(|r| r.data.is_empty()))
                message="No reviews yet"
            />
        </div>
    }
}

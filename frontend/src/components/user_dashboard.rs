use crate::api::{CodeMartApi, use_api};
use crate::auth::use_auth;
use crate::components::icons::{Download, Key, Package};
use crate::components::navbar::Navbar;
use crate::display::{format_date, short_id, truncate};
use crate::loadable::{ListView, Loadable, load_into};
use crate::notify::{Notifier, use_notifier};
use crate::web::open_in_new_tab;
use crate::web::router::Link;
use codemart_shared::{Order, format_price};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 订单状态徽章
fn status_badge(order: &Order) -> impl IntoView + use<> {
    let class = if order.is_completed() {
        "badge badge-success"
    } else {
        "badge badge-warning"
    };
    view! { <span class=class>{order.status.as_str()}</span> }
}

/// 取下载地址并在新标签页打开
fn start_download(api: CodeMartApi, notifier: Notifier, order: Order) {
    spawn_local(async move {
        match api.download_link(&order).await {
            Ok(link) => {
                open_in_new_tab(&link.download_url);
                notifier.success("Download started");
            }
            Err(e) => {
                log_warn!("[Download] {}: {}", order.id, e);
                notifier.error(e.message_or("Download failed"));
            }
        }
    });
}

#[component]
pub fn UserDashboardPage() -> impl IntoView {
    let new_api = use_api();
    let auth = use_auth();
    let notifier = use_notifier();

    let orders = RwSignal::new(Loadable::<Vec<Order>>::pending());
    let user_name = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.name.clone()))
            .unwrap_or_default()
    };

    {
        let api = new_api();
        load_into(orders, notifier, "Failed to load orders", async move {
            api.my_orders().await
        });
    }

    let on_download = move |order: Order| start_download(new_api(), notifier, order);
    let list_view = Memo::new(move |_| orders.with(Loadable::list_view));

    view! {
        <div class="min-h-screen bg-base-200 font-sans pb-20">
            <Navbar />
            <div class="max-w-7xl mx-auto px-6 py-8">
                <div class="mb-8">
                    <h1 class="text-4xl font-bold">"My Purchases"</h1>
                    <p class="text-base-content/70 mt-2">{move || format!("Welcome back, {}", user_name())}</p>
                </div>

                <Show when=move || list_view.get() == ListView::Spinner>
                    <div class="flex justify-center py-20">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                <Show when=move || list_view.get() == ListView::Empty>
                    <div class="card bg-base-100 shadow p-12 text-center">
                        <Package attr:class="h-16 w-16 mx-auto text-base-content/30" />
                        <p class="text-lg text-base-content/60 mt-4">"You haven't purchased any products yet"</p>
                        <div class="mt-6">
                            <Link to="/" class="btn btn-primary">"Browse Products"</Link>
                        </div>
                    </div>
                </Show>

                <div class="grid gap-4">
                    <For
                        each=move || orders.with(|o| o.data.clone())
                        key=|order| order.id.clone()
                        children=move |order| {
                            let completed = order.is_completed();
                            let target = order.clone();
                            let license = order
                                .license_key
                                .as_deref()
                                .map(|k| format!("{}...", truncate(k, 12)))
                                .unwrap_or_else(|| "-".to_string());
                            view! {
                                <div class="card bg-base-100 shadow">
                                    <div class="card-body flex-row flex-wrap items-center justify-between gap-4">
                                        <div class="space-y-1">
                                            <div class="flex items-center gap-2">
                                                <span class="font-mono font-semibold">{format!("#{}", short_id(&order.id))}</span>
                                                {status_badge(&order)}
                                            </div>
                                            <p class="text-sm text-base-content/70">{format!("Product: {}", short_id(&order.product_id))}</p>
                                            <p class="text-sm text-base-content/50">{format_date(&order.created_at)}</p>
                                        </div>
                                        <div class="flex items-center gap-2 text-sm">
                                            <Key attr:class="h-4 w-4 text-base-content/50" />
                                            <span class="font-mono">{license}</span>
                                        </div>
                                        <div class="flex items-center gap-4">
                                            <span class="text-xl font-bold text-primary">{format_price(order.amount)}</span>
                                            <Show when=move || completed>
                                                {
                                                    let target = target.clone();
                                                    view! {
                                                        <button class="btn btn-primary btn-sm gap-2" on:click=move |_| on_download(target.clone())>
                                                            <Download attr:class="h-4 w-4" /> "Download"
                                                        </button>
                                                    }
                                                }
                                            </Show>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </div>
    }
}

/// 单个订单的下载页，供支付完成后的跳转链接使用
#[component]
pub fn DownloadPage(order_id: String) -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let orders = RwSignal::new(Loadable::<Vec<Order>>::pending());

    {
        let api = new_api();
        load_into(orders, notifier, "Failed to load orders", async move {
            api.my_orders().await
        });
    }

    let order = {
        let order_id = order_id.clone();
        Memo::new(move |_| {
            orders.with(|o| o.data.iter().find(|order| order.id == order_id).cloned())
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Navbar />
            <div class="max-w-xl mx-auto px-6 py-16">
                <div class="card bg-base-100 shadow">
                    <div class="card-body items-center text-center space-y-4">
                        <Download attr:class="h-12 w-12 text-primary" />
                        <h1 class="text-2xl font-bold">{format!("Order #{}", short_id(&order_id))}</h1>
                        {move || match (orders.with(|o| o.loading), order.get()) {
                            (_, Some(order)) if order.is_completed() => {
                                let target = order.clone();
                                view! {
                                    <p class="text-base-content/70">"Your purchase is ready."</p>
                                    <button
                                        class="btn btn-primary gap-2"
                                        on:click=move |_| start_download(new_api(), notifier, target.clone())
                                    >
                                        <Download attr:class="h-4 w-4" /> "Download"
                                    </button>
                                }
                                .into_any()
                            }
                            (_, Some(order)) => view! {
                                <p class="text-base-content/70">"Payment pending"</p>
                                {status_badge(&order)}
                            }
                            .into_any(),
                            (true, None) => view! {
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            }
                            .into_any(),
                            (false, None) => view! {
                                <p class="text-base-content/60">"Order not found"</p>
                            }
                            .into_any(),
                        }}
                        <Link to="/dashboard" class="btn btn-ghost">"My Purchases"</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}

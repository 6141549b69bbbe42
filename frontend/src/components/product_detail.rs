use crate::api::use_api;
use crate::auth::use_auth;
use crate::checkout::{
    PaymentHandler, PurchaseStep, RazorpayGateway, confirm_payment, start_checkout,
};
use crate::components::icons::{ArrowLeft, Code, ExternalLink, ShoppingCart, Star};
use crate::components::navbar::Navbar;
use crate::components::review_dialog::ReviewDialog;
use crate::config::use_config;
use crate::display::{filled_stars, format_date, format_rating};
use crate::loadable::{Loadable, load_into};
use crate::notify::use_notifier;
use crate::web::open_in_new_tab;
use crate::web::router::{Link, use_router};
use codemart_shared::{MAX_RATING, Product, Review};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 五星评分展示
#[component]
fn StarRow(filled: u8, #[prop(into)] size: String) -> impl IntoView {
    (1..=MAX_RATING)
        .map(|i| {
            let class = if i <= filled {
                format!("{size} fill-warning text-warning")
            } else {
                format!("{size} text-base-content/30")
            };
            view! { <Star attr:class=class /> }
        })
        .collect_view()
}

#[component]
pub fn ProductDetailPage(#[prop(into)] id: String) -> impl IntoView {
    let new_api = use_api();
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();
    let config = use_config();
    let brand = config.variant.brand();

    let product = RwSignal::new(Loadable::<Option<Product>>::pending());
    let reviews = RwSignal::new(Loadable::<Vec<Review>>::pending());
    let coupon = RwSignal::new(String::new());
    let (purchasing, set_purchasing) = signal(false);
    let review_open = RwSignal::new(false);

    // 挂载时加载商品与评价
    {
        let api = new_api();
        let product_id = id.clone();
        load_into(product, notifier, "Failed to load product", async move {
            api.get_product(&product_id).await.map(Some)
        });

        let api = new_api();
        let product_id = id.clone();
        load_into(reviews, notifier, "Failed to load reviews", async move {
            api.list_reviews(&product_id).await
        });
    }

    let on_purchase = move |_| {
        let Some(item) = product.with(|p| p.data.clone()) else {
            return;
        };
        if !auth.is_authenticated() {
            notifier.error("Please login to purchase");
            router.navigate("/auth");
            return;
        }

        set_purchasing.set(true);
        let coupon_code = coupon.get_untracked();
        spawn_local(async move {
            let on_paid: PaymentHandler = Box::new(move |payment| {
                spawn_local(async move {
                    match confirm_payment(&new_api(), &payment).await {
                        Ok(_) => {
                            notifier.success("Payment successful! Check your dashboard.");
                            router.navigate("/dashboard");
                        }
                        Err(e) => {
                            log_error!("[Checkout] Verification failed: {}", e);
                            notifier.error("Payment verification failed");
                        }
                    }
                });
            });

            let api = new_api();
            match start_checkout(&api, &RazorpayGateway, &item, &coupon_code, brand, on_paid).await {
                Ok(PurchaseStep::Fulfilled { .. }) => {
                    notifier.success("Product unlocked! Check your dashboard.");
                    router.navigate("/dashboard");
                }
                Ok(PurchaseStep::Checkout(_)) => {}
                Err(e) => {
                    log_warn!("[Checkout] {}", e);
                    notifier.error(e.message_or("Purchase failed"));
                }
            }
            set_purchasing.try_set(false);
        });
    };

    let body = move || {
        let state = product.get();
        match state.data {
            None if state.loading => view! {
                <div class="flex justify-center py-32">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any(),
            None => view! {
                <div class="text-center py-32 text-base-content/50">"Product not found"</div>
            }
            .into_any(),
            Some(item) => {
                let base = item.base.clone();
                let cover = base.thumbnail.as_deref().map(|r| config.resolve_image(r));
                let gallery: Vec<String> =
                    base.gallery.iter().map(|r| config.resolve_image(r)).collect();
                let is_free = item.is_free();
                let demo_url = base.demo_url.clone();

                view! {
                    <div class="grid lg:grid-cols-2 gap-12">
                        // 左侧：图片
                        <div class="space-y-4">
                            <div class="rounded-box overflow-hidden h-96 bg-gradient-to-br from-primary to-secondary flex items-center justify-center">
                                {match cover {
                                    Some(src) => view! { <img src=src alt=base.title.clone() class="w-full h-full object-cover" /> }.into_any(),
                                    None => view! { <Code attr:class="h-24 w-24 text-white" /> }.into_any(),
                                }}
                            </div>
                            <div class="grid grid-cols-3 gap-4">
                                {gallery
                                    .into_iter()
                                    .enumerate()
                                    .map(|(i, src)| view! {
                                        <div class="rounded-lg overflow-hidden h-32">
                                            <img src=src alt=format!("Gallery {}", i + 1) class="w-full h-full object-cover" />
                                        </div>
                                    })
                                    .collect_view()}
                            </div>
                        </div>

                        // 右侧：详情与购买
                        <div class="space-y-6">
                            <span class="badge badge-primary badge-outline">{base.category.clone()}</span>
                            <h1 class="text-4xl font-bold">{base.title.clone()}</h1>
                            <p class="text-xl text-base-content/70">{base.tagline.clone()}</p>

                            <div class="flex items-center gap-4">
                                <div class="flex items-center gap-1">
                                    <StarRow filled=filled_stars(item.rating) size="h-5 w-5" />
                                    <span class="ml-2 text-base-content/70">
                                        {format!("{} ({} reviews)", format_rating(item.rating), item.reviews_count)}
                                    </span>
                                </div>
                                <span class="text-base-content/70">{format!("• {} downloads", item.downloads)}</span>
                            </div>

                            <div class="card bg-base-100 shadow">
                                <div class="card-body">
                                    <div class="text-3xl font-bold text-primary">{item.price_label()}</div>
                                    <Show when=move || !is_free>
                                        <input
                                            type="text"
                                            placeholder="Enter coupon code"
                                            class="input input-bordered w-full"
                                            prop:value=move || coupon.get()
                                            on:input=move |ev| coupon.set(event_target_value(&ev))
                                        />
                                    </Show>
                                    <button class="btn btn-primary w-full gap-2" on:click=on_purchase disabled=move || purchasing.get()>
                                        <ShoppingCart attr:class="h-4 w-4" />
                                        {if is_free { "Get Free" } else { "Purchase Now" }}
                                    </button>
                                    {demo_url.map(|url| view! {
                                        <button class="btn btn-outline w-full gap-2" on:click=move |_| { open_in_new_tab(&url); }>
                                            <ExternalLink attr:class="h-4 w-4" /> "View Live Demo"
                                        </button>
                                    })}
                                </div>
                            </div>

                            <div class="card bg-base-100 shadow">
                                <div class="card-body">
                                    <h3 class="card-title text-lg">"Description"</h3>
                                    <p class="text-base-content/70 whitespace-pre-line">{base.description.clone()}</p>
                                </div>
                            </div>

                            <div class="card bg-base-100 shadow">
                                <div class="card-body">
                                    <h3 class="card-title text-lg">"Tech Stack"</h3>
                                    <div class="flex flex-wrap gap-2">
                                        {base.tech_stack.iter().cloned().map(|t| view! { <span class="badge badge-info badge-outline">{t}</span> }).collect_view()}
                                    </div>
                                    <h3 class="card-title text-lg mt-4">"Tags"</h3>
                                    <div class="flex flex-wrap gap-2">
                                        {base.tags.iter().cloned().map(|t| view! { <span class="badge badge-ghost">{t}</span> }).collect_view()}
                                    </div>
                                    <h3 class="card-title text-lg mt-4">"License Type"</h3>
                                    <p class="text-base-content/70">{base.license_type.clone()}</p>
                                </div>
                            </div>
                        </div>
                    </div>
                }
                .into_any()
            }
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans pb-20">
            <Navbar />
            <div class="max-w-7xl mx-auto px-6 py-8 space-y-12">
                <Link to="/" class="btn btn-ghost gap-2">
                    <ArrowLeft attr:class="h-4 w-4" /> "Back to Home"
                </Link>

                {body}

                // 评价
                <section>
                    <div class="flex items-center justify-between mb-6">
                        <h2 class="text-3xl font-bold">"Reviews"</h2>
                        <button class="btn btn-primary" on:click=move |_| review_open.set(true)>"Write a Review"</button>
                    </div>
                    <div class="space-y-4">
                        <Show when=move || reviews.with(|r| !r.loading && r.data.is_empty())>
                            <div class="card bg-base-100 p-8 text-center text-base-content/50">
                                "No reviews yet. Be the first to review!"
                            </div>
                        </Show>
                        <For
                            each=move || reviews.with(|r| r.data.clone())
                            key=|review| review.id.clone()
                            children=move |review| view! {
                                <div class="card bg-base-100 shadow">
                                    <div class="card-body">
                                        <div class="flex items-center justify-between">
                                            <div>
                                                <p class="font-semibold">{review.user_name.clone()}</p>
                                                <div class="flex items-center gap-1 mt-1">
                                                    <StarRow filled=review.rating size="h-4 w-4" />
                                                </div>
                                            </div>
                                            <span class="text-sm text-base-content/50">{format_date(&review.created_at)}</span>
                                        </div>
                                        <p class="text-base-content/70">{review.comment.clone()}</p>
                                    </div>
                                </div>
                            }
                        />
                    </div>
                </section>
            </div>

            <ReviewDialog product_id=id open=review_open />
        </div>
    }
}

use crate::components::icons::Code;
use crate::config::use_config;
use crate::display::format_rating;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use codemart_shared::Product;
use leptos::prelude::*;

/// 列表页商品卡片
#[component]
pub fn ProjectCard(product: Product) -> impl IntoView {
    let config = use_config();
    let href = AppRoute::ProductDetail(product.id.clone()).to_path();

    // 封面：缩略图优先，其次图库第一张
    let cover = product
        .base
        .thumbnail
        .clone()
        .or_else(|| product.base.gallery.first().cloned())
        .map(|reference| config.resolve_image(&reference));

    let title = product.base.title.clone();
    let tags: Vec<String> = product.base.tags.iter().take(3).cloned().collect();
    let price = product.price_label();
    let is_free = product.is_free();

    view! {
        <Link to=href class="card bg-base-100 shadow-md hover:shadow-2xl transition-all duration-300 overflow-hidden">
            <figure class="relative h-48 bg-gradient-to-br from-primary to-secondary">
                {match cover {
                    Some(src) => view! {
                        <img src=src alt=title.clone() class="w-full h-full object-cover" />
                    }.into_any(),
                    None => view! { <Code attr:class="h-16 w-16 text-white" /> }.into_any(),
                }}
                <Show when=move || is_free>
                    <div class="badge badge-success absolute top-4 right-4">"FREE"</div>
                </Show>
            </figure>
            <div class="card-body p-6">
                <div class="flex items-start justify-between gap-2">
                    <h3 class="card-title">{title}</h3>
                    <span class="badge badge-primary badge-outline">{product.base.category.clone()}</span>
                </div>
                <p class="text-base-content/70 text-sm line-clamp-2">{product.base.tagline.clone()}</p>
                <div class="flex items-center justify-between mt-2">
                    <span class="text-2xl font-bold text-primary">{price}</span>
                    <div class="flex items-center gap-2 text-sm text-base-content/60">
                        <span>"⭐ " {format_rating(product.rating)}</span>
                        <span>"•"</span>
                        <span>{product.downloads} " downloads"</span>
                    </div>
                </div>
                <div class="flex flex-wrap gap-2 mt-2">
                    {tags
                        .into_iter()
                        .map(|tag| view! { <span class="badge badge-ghost badge-sm">{tag}</span> })
                        .collect_view()}
                </div>
            </div>
        </Link>
    }
}

use crate::api::use_api;
use crate::components::icons::Search;
use crate::components::navbar::Navbar;
use crate::components::project_card::ProjectCard;
use crate::config::use_config;
use crate::loadable::{ListView, Loadable, load_into};
use crate::notify::use_notifier;
use codemart_shared::{CATEGORIES, Product, ProductQuery, SortOrder};
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();
    let brand = use_config().variant.brand();

    let products = RwSignal::new(Loadable::<Vec<Product>>::pending());
    let (search, set_search) = signal(String::new());
    let (category, set_category) = signal(String::new());
    let (sort, set_sort) = signal(SortOrder::Newest);

    let load_products = move || {
        let query = ProductQuery::default()
            .with_category(category.get_untracked())
            .with_sort(sort.get_untracked())
            .with_search(search.get_untracked());
        let api = api();
        load_into(products, notifier, "Failed to load products", async move {
            api.list_products(&query).await
        });
    };

    // 分类或排序变化时立即重新加载；搜索框只在提交时加载
    Effect::new(move |_| {
        category.track();
        sort.track();
        load_products();
    });

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        load_products();
    };

    let list_view = Memo::new(move |_| products.with(Loadable::list_view));

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Navbar />

            // Hero
            <section class="hero py-16">
                <div class="hero-content text-center flex-col max-w-3xl">
                    <h1 class="text-5xl font-bold">
                        "Discover Premium"
                        <span class="block mt-2 text-primary">"Source Code Projects"</span>
                    </h1>
                    <p class="text-lg text-base-content/70">
                        "Buy production-ready source code. Build faster with pre-built solutions."
                    </p>
                    <form class="join w-full max-w-2xl" on:submit=on_search>
                        <input
                            type="text"
                            placeholder="Search projects..."
                            class="input input-bordered join-item flex-1"
                            prop:value=search
                            on:input=move |ev| set_search.set(event_target_value(&ev))
                        />
                        <button type="submit" class="btn btn-primary join-item">
                            <Search attr:class="h-4 w-4" />
                        </button>
                    </form>
                </div>
            </section>

            // 筛选
            <section class="max-w-7xl mx-auto px-6 mb-8 flex flex-wrap gap-4">
                <select
                    class="select select-bordered w-48"
                    on:change=move |ev| set_category.set(event_target_value(&ev))
                >
                    <option value="" selected=move || category.get().is_empty()>"All Categories"</option>
                    {CATEGORIES
                        .into_iter()
                        .map(|c| view! {
                            <option value=c selected=move || category.get() == c>{c}</option>
                        })
                        .collect_view()}
                </select>
                <select
                    class="select select-bordered w-48"
                    on:change=move |ev| set_sort.set(SortOrder::parse(&event_target_value(&ev)))
                >
                    {SortOrder::ALL
                        .into_iter()
                        .map(|s| view! {
                            <option value=s.as_str() selected=move || sort.get() == s>{s.label()}</option>
                        })
                        .collect_view()}
                </select>
            </section>

            // 商品列表
            <section class="max-w-7xl mx-auto px-6 pb-20">
                <Show when=move || list_view.get() == ListView::Spinner>
                    <div class="flex justify-center py-20">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>
                <Show when=move || list_view.get() == ListView::Empty>
                    <div class="text-center py-20 text-base-content/50 text-lg">"No products found"</div>
                </Show>
                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    <For
                        each=move || products.with(|p| p.data.clone())
                        key=|product| product.id.clone()
                        children=move |product| view! { <ProjectCard product=product /> }
                    />
                </div>
            </section>

            <footer class="footer footer-center p-8 bg-base-100 text-base-content/60">
                <p>{format!("© {} · All rights reserved.", brand)}</p>
            </footer>
        </div>
    }
}

use crate::admin::{delete_image, delete_product, refresh_products, upload_file};
use crate::api::use_api;
use crate::components::icons::{ImagePlus, Pencil, Plus, Trash2, Upload, X};
use crate::config::use_config;
use crate::loadable::{Loadable, load_into, mutate_into};
use crate::notify::use_notifier;
use crate::web::{UploadFile, confirm};
use codemart_shared::Product;
use codemart_shared::protocol::UploadKind;
use leptos::prelude::*;
use web_sys::HtmlInputElement;

use super::TableStatus;
use super::form_state::ProductFormState;
use super::product_dialog::ProductDialog;

/// 取出 `<input type="file">` 选中的第一个文件，并清空输入以便重复选择同一文件
fn take_selected_file(ev: &leptos::ev::Event) -> Option<UploadFile> {
    let input = event_target::<HtmlInputElement>(ev);
    let file = input.files().and_then(|files| files.get(0))?;
    input.set_value("");
    Some(UploadFile::from_browser(file))
}

/// 隐藏的文件选择按钮
#[component]
fn UploadButton(
    kind: UploadKind,
    #[prop(into)] product_id: String,
    products: RwSignal<Loadable<Vec<Product>>>,
) -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();

    let (accept, title) = match kind {
        UploadKind::CodeArchive => (".zip", "Upload code (.zip)"),
        UploadKind::Image => ("image/*", "Upload image"),
    };

    let on_change = move |ev: leptos::ev::Event| {
        let Some(file) = take_selected_file(&ev) else {
            return;
        };
        log_info!("[Admin] Uploading {} for {}", file.name, product_id);
        let api = new_api();
        let product_id = product_id.clone();
        mutate_into(
            products,
            notifier,
            "File uploaded",
            "File upload failed",
            async move {
                upload_file(&api, kind, &product_id, file)
                    .await
                    .map(Some)
            },
        );
    };

    view! {
        <label class="btn btn-ghost btn-sm" title=title>
            {match kind {
                UploadKind::CodeArchive => view! { <Upload attr:class="h-4 w-4" /> }.into_any(),
                UploadKind::Image => view! { <ImagePlus attr:class="h-4 w-4" /> }.into_any(),
            }}
            <input type="file" class="hidden" accept=accept on:change=on_change />
        </label>
    }
}

#[component]
pub fn ProductsPanel() -> impl IntoView {
    let new_api = use_api();
    let notifier = use_notifier();
    let config = StoredValue::new(use_config());

    let products = RwSignal::new(Loadable::<Vec<Product>>::pending());
    let form = ProductFormState::new();
    let dialog_open = RwSignal::new(false);

    {
        let api = new_api();
        load_into(products, notifier, "Failed to load products", async move {
            refresh_products(&api).await
        });
    }

    let on_create = move |_| {
        form.reset();
        dialog_open.set(true);
    };

    let on_edit = move |product: &Product| {
        form.fill(product);
        dialog_open.set(true);
    };

    let on_delete = move |id: String| {
        let confirmed = confirm("Are you sure you want to delete this product?");
        let api = new_api();
        mutate_into(
            products,
            notifier,
            "Product deleted",
            "Failed to delete product",
            async move { delete_product(&api, &id, confirmed).await },
        );
    };

    let on_delete_image = move |product_id: String, image_id: String| {
        let confirmed = confirm("Delete this image?");
        let api = new_api();
        mutate_into(
            products,
            notifier,
            "Image deleted",
            "Failed to delete image",
            async move { delete_image(&api, &product_id, &image_id, confirmed).await },
        );
    };

    // 整表随列表刷新重新渲染，编辑后的字段立即可见
    let row = move |product: Product| {
        let id = product.id.clone();
        let delete_id = id.clone();
        let published = product.base.is_published;
        let has_code = product.has_code_archive();
        let images = product.base.gallery.clone();
        let edit_target = product.clone();
        view! {
            <tr>
                <td>
                    <div class="font-semibold">{product.base.title.clone()}</div>
                    <div class="text-xs text-base-content/50">
                        {if has_code { "Code uploaded" } else { "No code archive" }}
                    </div>
                </td>
                <td>{product.base.category.clone()}</td>
                <td>{product.price_label()}</td>
                <td>{product.downloads}</td>
                <td>
                    <span class=if published { "badge badge-success" } else { "badge badge-ghost" }>
                        {if published { "Published" } else { "Draft" }}
                    </span>
                </td>
                <td>
                    <div class="flex gap-1">
                        {images
                            .into_iter()
                            .map(|image| {
                                let src = config.with_value(|c| c.resolve_image(&image));
                                let deletable = config.with_value(|c| c.can_delete_image(&image));
                                let product_id = id.clone();
                                view! {
                                    <div class="relative">
                                        <img src=src class="h-10 w-10 rounded object-cover" />
                                        {deletable.then(|| view! {
                                            <button
                                                class="btn btn-error btn-xs btn-circle absolute -top-2 -right-2"
                                                on:click=move |_| on_delete_image(product_id.clone(), image.clone())
                                            >
                                                <X attr:class="h-3 w-3" />
                                            </button>
                                        })}
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </td>
                <td>
                    <div class="flex gap-1">
                        <button class="btn btn-ghost btn-sm" title="Edit" on:click=move |_| on_edit(&edit_target)>
                            <Pencil attr:class="h-4 w-4" />
                        </button>
                        <UploadButton kind=UploadKind::CodeArchive product_id=id.clone() products=products />
                        <UploadButton kind=UploadKind::Image product_id=id.clone() products=products />
                        <button class="btn btn-ghost btn-sm text-error" title="Delete" on:click=move |_| on_delete(delete_id.clone())>
                            <Trash2 attr:class="h-4 w-4" />
                        </button>
                    </div>
                </td>
            </tr>
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex justify-end">
                <button class="btn btn-primary gap-2" on:click=on_create>
                    <Plus attr:class="h-4 w-4" /> "Add Product"
                </button>
            </div>

            <div class="card bg-base-100 shadow overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Title"</th>
                            <th>"Category"</th>
                            <th>"Price"</th>
                            <th>"Downloads"</th>
                            <th>"Status"</th>
                            <th>"Gallery"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || products.with(|p| p.data.clone()).into_iter().map(row).collect_view()}
                    </tbody>
                </table>
                <TableStatus
                    loading=Signal::derive(move || products.with(|p| p.loading))
                    empty=Signal::derive(move || products.with(|p| p.data.is_empty()))
                    message="No products yet"
                />
            </div>

            <ProductDialog state=form open=dialog_open products=products />
        </div>
    }
}

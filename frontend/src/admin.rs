//! 管理后台的写操作
//!
//! 每个写操作只发一次请求，成功后整体重新拉取对应列表。
//! 删除需要先确认，未确认时不发任何请求。

use codemart_shared::protocol::UploadKind;
use codemart_shared::{Coupon, CouponInput, Product, ProductInput, ProductQuery, Review};

use crate::api::CodeMartApi;
use crate::error::ApiResult;
use crate::web::{HttpTransport, UploadFile};

/// 后台商品列表包含未发布商品
pub fn catalog_query() -> ProductQuery {
    ProductQuery::including_unpublished()
}

pub async fn refresh_products<T: HttpTransport>(api: &CodeMartApi<T>) -> ApiResult<Vec<Product>> {
    api.list_products(&catalog_query()).await
}

/// 新建（`editing` 为空）或更新商品
pub async fn save_product<T: HttpTransport>(
    api: &CodeMartApi<T>,
    editing: Option<&str>,
    input: ProductInput,
) -> ApiResult<Vec<Product>> {
    match editing {
        Some(id) => api.update_product(id, input).await?,
        None => api.create_product(&input).await?,
    };
    refresh_products(api).await
}

/// 删除商品，`confirmed` 为 false 时直接返回 `None`
pub async fn delete_product<T: HttpTransport>(
    api: &CodeMartApi<T>,
    id: &str,
    confirmed: bool,
) -> ApiResult<Option<Vec<Product>>> {
    if !confirmed {
        return Ok(None);
    }
    api.delete_product(id).await?;
    log_info!("[Admin] Deleted product {}", id);
    refresh_products(api).await.map(Some)
}

pub async fn upload_file<T: HttpTransport>(
    api: &CodeMartApi<T>,
    kind: UploadKind,
    product_id: &str,
    file: UploadFile,
) -> ApiResult<Vec<Product>> {
    api.upload(kind, product_id, file).await?;
    refresh_products(api).await
}

pub async fn delete_image<T: HttpTransport>(
    api: &CodeMartApi<T>,
    product_id: &str,
    image_id: &str,
    confirmed: bool,
) -> ApiResult<Option<Vec<Product>>> {
    if !confirmed {
        return Ok(None);
    }
    api.delete_image(product_id, image_id).await?;
    refresh_products(api).await.map(Some)
}

pub async fn create_coupon<T: HttpTransport>(
    api: &CodeMartApi<T>,
    input: &CouponInput,
) -> ApiResult<Vec<Coupon>> {
    api.create_coupon(input).await?;
    api.coupons().await
}

pub async fn approve_review<T: HttpTransport>(
    api: &CodeMartApi<T>,
    id: &str,
) -> ApiResult<Vec<Review>> {
    api.approve_review(id).await?;
    api.all_reviews().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{api_with, product_json, url};
    use crate::web::HttpMethod;
    use codemart_shared::DiscountType;
    use serde_json::json;

    const LIST: &str = "/products?published_only=false";

    #[tokio::test]
    async fn test_declined_delete_issues_no_request() {
        let api = api_with(Some("admin"));

        let result = delete_product(&api, "p1", false).await.unwrap();

        assert!(result.is_none());
        assert_eq!(api.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmed_delete_then_single_refetch() {
        let api = api_with(Some("admin"));
        api.transport()
            .mock_response(HttpMethod::Delete, &url("/admin/products/p1"), 200, json!({ "message": "Product deleted" }));
        api.transport()
            .mock_response(HttpMethod::Get, &url(LIST), 200, json!([product_json("p2", 0.0)]));

        let list = delete_product(&api, "p1", true).await.unwrap().unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "p2");
        let requests = api.transport().recorded();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[1].method, HttpMethod::Get);
        assert_eq!(requests[1].url, url(LIST));
    }

    #[tokio::test]
    async fn test_failed_delete_skips_refetch() {
        let api = api_with(Some("admin"));
        api.transport().mock_response(
            HttpMethod::Delete,
            &url("/admin/products/p1"),
            404,
            json!({ "detail": "Product not found" }),
        );

        let err = delete_product(&api, "p1", true).await.unwrap_err();

        assert_eq!(err.message_or("Failed to delete product"), "Product not found");
        assert_eq!(api.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_save_product_create_vs_update() {
        let api = api_with(Some("admin"));
        api.transport()
            .mock_response(HttpMethod::Post, &url("/admin/products"), 200, product_json("new", 5.0));
        api.transport()
            .mock_response(HttpMethod::Put, &url("/admin/products/p1"), 200, product_json("p1", 9.0));
        api.transport()
            .mock_response(HttpMethod::Get, &url(LIST), 200, json!([product_json("p1", 9.0)]));

        let input = ProductInput {
            title: "Kit".into(),
            ..ProductInput::default()
        };
        save_product(&api, None, input.clone()).await.unwrap();
        save_product(&api, Some("p1"), input).await.unwrap();

        let requests = api.transport().recorded();
        let methods: Vec<_> = requests.iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Post, HttpMethod::Get, HttpMethod::Put, HttpMethod::Get]
        );
        assert_eq!(requests[2].json()["title"], "Kit");
        assert!(requests[2].json().get("id").is_none());
    }

    #[tokio::test]
    async fn test_upload_image_refetches() {
        let api = api_with(Some("admin"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/admin/products/p1/upload-image"),
            200,
            json!({ "image_id": "img1" }),
        );
        api.transport()
            .mock_response(HttpMethod::Get, &url(LIST), 200, json!([]));

        upload_file(&api, UploadKind::Image, "p1", UploadFile::from_bytes("shot.png", vec![0]))
            .await
            .unwrap();

        assert_eq!(api.transport().request_count(), 2);
    }

    #[tokio::test]
    async fn test_create_coupon_refetches_coupons() {
        let api = api_with(Some("admin"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/admin/coupons"),
            200,
            json!({
                "id": "c1", "code": "SAVE20", "discount_type": "percent",
                "discount_value": 20.0, "min_purchase": 0.0,
                "uses": 0, "is_active": true, "created_at": "2024-06-01T00:00:00Z"
            }),
        );
        api.transport()
            .mock_response(HttpMethod::Get, &url("/admin/coupons"), 200, json!([]));

        let input = CouponInput {
            code: "SAVE20".into(),
            discount_type: DiscountType::Percent,
            discount_value: 20.0,
            ..CouponInput::default()
        };
        let coupons = create_coupon(&api, &input).await.unwrap();

        assert!(coupons.is_empty());
        let body = api.transport().recorded()[0].json();
        assert_eq!(body["discount_type"], "percent");
        assert!(body.get("max_uses").is_none());
    }

    #[tokio::test]
    async fn test_approve_review_refetches_reviews() {
        let api = api_with(Some("admin"));
        api.transport().mock_response(
            HttpMethod::Put,
            &url("/admin/reviews/r1/approve"),
            200,
            json!({ "message": "Review approved" }),
        );
        api.transport()
            .mock_response(HttpMethod::Get, &url("/admin/reviews"), 200, json!([]));

        approve_review(&api, "r1").await.unwrap();

        let requests = api.transport().recorded();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url, url("/admin/reviews"));
    }
}

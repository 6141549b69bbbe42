use crate::query::{Catalog, encode_path_segment};
use crate::{
    Analytics, AuthResponse, Coupon, CouponInput, CreateOrderResponse, DownloadLink, Order,
    PaymentVerification, Product, ProductInput, ProductQuery, Review, ReviewInput, VerifyResponse,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters are carried as `#[serde(skip)]` fields so that only the real
/// payload is serialized when `JSON_BODY` is set.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request itself is sent as the JSON body.
    const JSON_BODY: bool = false;

    /// Path below the `/api` prefix.
    fn path(&self, catalog: Catalog) -> String;

    /// Query parameters appended to the path.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Acknowledgement-only responses (`{"message": ...}`) are read and discarded.
pub type Ack = IgnoredAny;

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, _: Catalog) -> String {
        "/auth/login".to_string()
    }
}

/// Back-office login used by the CodeStore storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest(pub LoginRequest);

impl ApiRequest for AdminLoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, _: Catalog) -> String {
        "/admin/login".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, _: Catalog) -> String {
        "/auth/register".to_string()
    }
}

// =========================================================
// Catalog
// =========================================================

/// List products; the query doubles as the request.
impl ApiRequest for ProductQuery {
    type Response = Vec<Product>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, catalog: Catalog) -> String {
        format!("/{}", catalog.segment())
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.to_pairs()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetProductRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetProductRequest {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, catalog: Catalog) -> String {
        format!("/{}/{}", catalog.segment(), self.id)
    }
}

/// Create a product (re-uses ProductInput as the body)
impl ApiRequest for ProductInput {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, catalog: Catalog) -> String {
        format!("/admin/{}", catalog.segment())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProductRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub input: ProductInput,
}

impl ApiRequest for UpdateProductRequest {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Put;
    const JSON_BODY: bool = true;

    fn path(&self, catalog: Catalog) -> String {
        format!("/admin/{}/{}", catalog.segment(), self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteProductRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteProductRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self, catalog: Catalog) -> String {
        format!("/admin/{}/{}", catalog.segment(), self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteImageRequest {
    #[serde(skip)]
    pub product_id: String,
    #[serde(skip)]
    pub image_id: String,
}

impl ApiRequest for DeleteImageRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self, catalog: Catalog) -> String {
        format!(
            "/admin/{}/{}/images/{}",
            catalog.segment(),
            encode_path_segment(&self.product_id),
            encode_path_segment(&self.image_id)
        )
    }
}

/// Multipart upload targets (single `file` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Source-code archive (zip)
    CodeArchive,
    /// Thumbnail / gallery image
    Image,
}

impl UploadKind {
    pub const FIELD: &'static str = "file";

    pub fn path(&self, catalog: Catalog, product_id: &str) -> String {
        match (self, catalog) {
            (UploadKind::CodeArchive, Catalog::Products) => {
                format!("/admin/products/{product_id}/upload")
            }
            (UploadKind::CodeArchive, Catalog::Projects) => {
                format!("/admin/projects/{product_id}/upload-code")
            }
            (UploadKind::Image, _) => {
                format!("/admin/{}/{product_id}/upload-image", catalog.segment())
            }
        }
    }
}

// =========================================================
// Orders
// =========================================================

/// Create an order; parameters travel in the query string.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub product_id: String,
    pub coupon_code: Option<String>,
}

impl ApiRequest for CreateOrderRequest {
    type Response = CreateOrderResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self, _: Catalog) -> String {
        "/orders/create".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("product_id", self.product_id.clone())];
        if let Some(code) = self.coupon_code.as_ref().filter(|c| !c.trim().is_empty()) {
            pairs.push(("coupon_code", code.trim().to_string()));
        }
        pairs
    }
}

/// Create an order against the projects catalog; parameters travel as a JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectOrderRequest {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl From<CreateOrderRequest> for CreateProjectOrderRequest {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            project_id: req.product_id,
            coupon_code: req
                .coupon_code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}

impl ApiRequest for CreateProjectOrderRequest {
    type Response = CreateOrderResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, _: Catalog) -> String {
        "/orders/create".to_string()
    }
}

impl ApiRequest for PaymentVerification {
    type Response = VerifyResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, _: Catalog) -> String {
        "/orders/verify".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMyOrdersRequest;

impl ApiRequest for ListMyOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, _: Catalog) -> String {
        "/orders/my-orders".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadLinkRequest {
    #[serde(skip)]
    pub order_id: String,
}

impl ApiRequest for DownloadLinkRequest {
    type Response = DownloadLink;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, _: Catalog) -> String {
        format!("/orders/{}/download", encode_path_segment(&self.order_id))
    }
}

/// Streamed archive download for the projects catalog.
///
/// The browser opens this URL directly, so the bearer token rides in the query string.
/// The body is the file itself and is never decoded.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDownloadRequest {
    #[serde(skip)]
    pub project_id: String,
    #[serde(skip)]
    pub order_id: String,
    #[serde(skip)]
    pub token: String,
}

impl ApiRequest for ProjectDownloadRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, catalog: Catalog) -> String {
        format!(
            "/{}/{}/download",
            catalog.segment(),
            encode_path_segment(&self.project_id)
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("token", self.token.clone()),
            ("order_id", self.order_id.clone()),
        ]
    }
}

// =========================================================
// Reviews
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct ListReviewsRequest {
    #[serde(skip)]
    pub product_id: String,
}

impl ApiRequest for ListReviewsRequest {
    type Response = Vec<Review>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, _: Catalog) -> String {
        format!("/reviews/{}", self.product_id)
    }
}

impl ApiRequest for ReviewInput {
    type Response = Review;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, _: Catalog) -> String {
        "/reviews".to_string()
    }
}

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsRequest;

impl ApiRequest for AnalyticsRequest {
    type Response = Analytics;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, _: Catalog) -> String {
        "/admin/analytics".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListAllOrdersRequest;

impl ApiRequest for ListAllOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, _: Catalog) -> String {
        "/admin/orders".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCouponsRequest;

impl ApiRequest for ListCouponsRequest {
    type Response = Vec<Coupon>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, _: Catalog) -> String {
        "/admin/coupons".to_string()
    }
}

impl ApiRequest for CouponInput {
    type Response = Coupon;
    const METHOD: HttpMethod = HttpMethod::Post;
    const JSON_BODY: bool = true;

    fn path(&self, _: Catalog) -> String {
        "/admin/coupons".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListAllReviewsRequest;

impl ApiRequest for ListAllReviewsRequest {
    type Response = Vec<Review>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self, _: Catalog) -> String {
        "/admin/reviews".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveReviewRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for ApproveReviewRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self, _: Catalog) -> String {
        format!("/admin/reviews/{}/approve", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_paths_follow_variant() {
        let get = GetProductRequest { id: "p1".into() };
        assert_eq!(get.path(Catalog::Products), "/products/p1");
        assert_eq!(get.path(Catalog::Projects), "/projects/p1");

        let delete = DeleteProductRequest { id: "p1".into() };
        assert_eq!(delete.path(Catalog::Projects), "/admin/projects/p1");
    }

    #[test]
    fn test_upload_paths() {
        assert_eq!(
            UploadKind::CodeArchive.path(Catalog::Products, "p1"),
            "/admin/products/p1/upload"
        );
        assert_eq!(
            UploadKind::CodeArchive.path(Catalog::Projects, "p1"),
            "/admin/projects/p1/upload-code"
        );
        assert_eq!(
            UploadKind::Image.path(Catalog::Projects, "p1"),
            "/admin/projects/p1/upload-image"
        );
    }

    #[test]
    fn test_create_order_query_skips_blank_coupon() {
        let without = CreateOrderRequest {
            product_id: "p1".into(),
            coupon_code: Some("  ".into()),
        };
        assert_eq!(without.query(), vec![("product_id", "p1".to_string())]);

        let with = CreateOrderRequest {
            product_id: "p1".into(),
            coupon_code: Some(" SAVE10 ".into()),
        };
        assert_eq!(
            with.query(),
            vec![
                ("product_id", "p1".to_string()),
                ("coupon_code", "SAVE10".to_string())
            ]
        );
    }

    #[test]
    fn test_project_order_moves_parameters_into_body() {
        let req = CreateProjectOrderRequest::from(CreateOrderRequest {
            product_id: "p1".into(),
            coupon_code: Some(" SAVE10 ".into()),
        });
        assert!(req.query().is_empty());
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({ "project_id": "p1", "coupon_code": "SAVE10" }));

        let blank = CreateProjectOrderRequest::from(CreateOrderRequest {
            product_id: "p1".into(),
            coupon_code: Some("   ".into()),
        });
        assert!(serde_json::to_value(&blank).unwrap().get("coupon_code").is_none());
    }

    #[test]
    fn test_project_download_carries_token_and_order() {
        let req = ProjectDownloadRequest {
            project_id: "p1".into(),
            order_id: "o1".into(),
            token: "tok".into(),
        };
        assert_eq!(req.path(Catalog::Projects), "/projects/p1/download");
        assert_eq!(
            req.query(),
            vec![("token", "tok".to_string()), ("order_id", "o1".to_string())]
        );
    }

    #[test]
    fn test_delete_image_escapes_url_shaped_ids() {
        let req = DeleteImageRequest {
            product_id: "p1".into(),
            image_id: "https://cdn.example.com/shots/a b.png".into(),
        };
        let path = req.path(Catalog::Projects);
        assert!(path.starts_with("/admin/projects/p1/images/"));
        assert!(!path.contains("://"));
        assert!(!path.contains(' '));
        assert_eq!(path.matches('/').count(), 5);

        let plain = DeleteImageRequest {
            product_id: "p1".into(),
            image_id: "img-1".into(),
        };
        assert_eq!(plain.path(Catalog::Projects), "/admin/projects/p1/images/img-1");
    }

    #[test]
    fn test_update_body_omits_path_id() {
        let req = UpdateProductRequest {
            id: "p1".into(),
            input: ProductInput {
                title: "Kit".into(),
                ..ProductInput::default()
            },
        };
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["title"], "Kit");
        assert_eq!(body["category"], "Web App");
        assert_eq!(body["is_published"], true);
    }
}

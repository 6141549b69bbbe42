//! 后端 API 客户端
//!
//! 每个后端端点对应一个方法；请求元数据（方法、路径、请求体）由
//! `codemart_shared::protocol::ApiRequest` 描述，这里只负责拼 URL、
//! 附加 Bearer 令牌、发送与解码。

use codemart_shared::protocol::{
    AdminLoginRequest, AnalyticsRequest, ApiRequest, ApproveReviewRequest, CreateOrderRequest,
    CreateProjectOrderRequest, DeleteImageRequest, DeleteProductRequest, DownloadLinkRequest,
    GetProductRequest, ListAllOrdersRequest, ListAllReviewsRequest, ListCouponsRequest,
    ListMyOrdersRequest, ListReviewsRequest, LoginRequest, ProjectDownloadRequest,
    RegisterRequest, UpdateProductRequest, UploadKind,
};
use codemart_shared::query::encode_query;
use codemart_shared::{
    Analytics, AuthResponse, Catalog, Coupon, CouponInput, CreateOrderResponse, DownloadLink,
    HEADER_AUTHORIZATION, Order, PaymentVerification, Product, ProductInput, ProductQuery, Review,
    ReviewInput, VerifyResponse,
};
use leptos::prelude::*;
use serde::de::DeserializeOwned;

use crate::config::{AppConfig, use_config};
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use crate::web::{
    FetchTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport, LocalStorage, UploadFile,
};

#[derive(Clone, Debug)]
pub struct CodeMartApi<T = FetchTransport> {
    api_base: String,
    catalog: Catalog,
    token: Option<String>,
    transport: T,
}

impl CodeMartApi<FetchTransport> {
    /// 按当前 LocalStorage 中的令牌构建客户端
    ///
    /// 每次操作都重新读取存储，登录 / 登出后无需重建任何状态。
    pub fn from_storage(config: &AppConfig) -> Self {
        let token = SessionStore::new(LocalStorage, config.variant).token();
        Self::new(config, token, FetchTransport)
    }
}

/// 组件中使用：返回可复制的客户端构造器，每次调用都读取最新的令牌
pub fn use_api() -> impl Fn() -> CodeMartApi + Copy + Send + Sync + 'static {
    let config = StoredValue::new(use_config());
    move || config.with_value(CodeMartApi::from_storage)
}

impl<T: HttpTransport> CodeMartApi<T> {
    pub fn new(config: &AppConfig, token: Option<String>, transport: T) -> Self {
        Self {
            api_base: config.api_base(),
            catalog: config.variant.catalog(),
            token: token.filter(|t| !t.is_empty()),
            transport,
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        if query.is_empty() {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}{}?{}", self.api_base, path, encode_query(query))
        }
    }

    // 认证头
    fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match &self.token {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}")),
            None => req,
        }
    }

    fn decode<D: DeserializeOwned>(url: &str, res: HttpResponse) -> ApiResult<D> {
        if !res.ok() {
            log_warn!("[Api] {} -> {}", url, res.status);
            return Err(ApiError::from_response(res.status, &res.body));
        }
        let body = if res.body.trim().is_empty() {
            "null"
        } else {
            res.body.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }

    /// 发送一个 `ApiRequest`
    pub async fn execute<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let url = self.url(&request.path(self.catalog), &request.query());
        let mut http = HttpRequest::new(R::METHOD, url.clone());
        if R::JSON_BODY {
            http = http.with_json(serde_json::to_string(request)?);
        }

        let res = self.transport.send(self.authorize(http)).await?;
        Self::decode(&url, res)
    }

    /// multipart 上传（代码压缩包或图片）
    pub async fn upload(&self, kind: UploadKind, product_id: &str, file: UploadFile) -> ApiResult<()> {
        let url = self.url(&kind.path(self.catalog, product_id), &[]);
        let http = HttpRequest::new(HttpMethod::Post, url.clone())
            .with_multipart(UploadKind::FIELD, file);

        let res = self.transport.send(self.authorize(http)).await?;
        Self::decode::<serde::de::IgnoredAny>(&url, res).map(|_| ())
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        self.execute(&request).await
    }

    pub async fn admin_login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        self.execute(&AdminLoginRequest(request)).await
    }

    pub async fn register(&self, request: RegisterRequest) -> ApiResult<AuthResponse> {
        self.execute(&request).await
    }

    // =========================================================
    // 商品
    // =========================================================

    pub async fn list_products(&self, query: &ProductQuery) -> ApiResult<Vec<Product>> {
        self.execute(query).await
    }

    pub async fn get_product(&self, id: &str) -> ApiResult<Product> {
        self.execute(&GetProductRequest { id: id.to_string() }).await
    }

    pub async fn create_product(&self, input: &ProductInput) -> ApiResult<Product> {
        self.execute(input).await
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> ApiResult<Product> {
        self.execute(&UpdateProductRequest {
            id: id.to_string(),
            input,
        })
        .await
    }

    pub async fn delete_product(&self, id: &str) -> ApiResult<()> {
        self.execute(&DeleteProductRequest { id: id.to_string() })
            .await
            .map(|_| ())
    }

    pub async fn delete_image(&self, product_id: &str, image_id: &str) -> ApiResult<()> {
        self.execute(&DeleteImageRequest {
            product_id: product_id.to_string(),
            image_id: image_id.to_string(),
        })
        .await
        .map(|_| ())
    }

    // =========================================================
    // 订单
    // =========================================================

    /// 商品目录用查询参数，项目目录用 JSON 请求体
    pub async fn create_order(
        &self,
        product_id: &str,
        coupon_code: Option<String>,
    ) -> ApiResult<CreateOrderResponse> {
        let request = CreateOrderRequest {
            product_id: product_id.to_string(),
            coupon_code,
        };
        match self.catalog {
            Catalog::Products => self.execute(&request).await,
            Catalog::Projects => {
                self.execute(&CreateProjectOrderRequest::from(request))
                    .await
            }
        }
    }

    pub async fn verify_payment(&self, payment: &PaymentVerification) -> ApiResult<VerifyResponse> {
        self.execute(payment).await
    }

    pub async fn my_orders(&self) -> ApiResult<Vec<Order>> {
        self.execute(&ListMyOrdersRequest).await
    }

    /// 下载地址
    ///
    /// 商品目录向后端换取签名链接；项目目录直接拼出带令牌的文件地址，交给浏览器打开。
    pub async fn download_link(&self, order: &Order) -> ApiResult<DownloadLink> {
        match self.catalog {
            Catalog::Products => {
                self.execute(&DownloadLinkRequest {
                    order_id: order.id.clone(),
                })
                .await
            }
            Catalog::Projects => {
                let token = self.token.clone().ok_or(ApiError::Unauthenticated)?;
                let request = ProjectDownloadRequest {
                    project_id: order.product_id.clone(),
                    order_id: order.id.clone(),
                    token,
                };
                Ok(DownloadLink {
                    download_url: self.url(&request.path(self.catalog), &request.query()),
                    expires_in: None,
                })
            }
        }
    }

    // =========================================================
    // 评价
    // =========================================================

    pub async fn list_reviews(&self, product_id: &str) -> ApiResult<Vec<Review>> {
        self.execute(&ListReviewsRequest {
            product_id: product_id.to_string(),
        })
        .await
    }

    pub async fn submit_review(&self, review: &ReviewInput) -> ApiResult<Review> {
        self.execute(review).await
    }

    // =========================================================
    // 管理后台
    // =========================================================

    pub async fn analytics(&self) -> ApiResult<Analytics> {
        self.execute(&AnalyticsRequest).await
    }

    pub async fn all_orders(&self) -> ApiResult<Vec<Order>> {
        self.execute(&ListAllOrdersRequest).await
    }

    pub async fn coupons(&self) -> ApiResult<Vec<Coupon>> {
        self.execute(&ListCouponsRequest).await
    }

    pub async fn create_coupon(&self, coupon: &CouponInput) -> ApiResult<Coupon> {
        self.execute(coupon).await
    }

    pub async fn all_reviews(&self) -> ApiResult<Vec<Review>> {
        self.execute(&ListAllReviewsRequest).await
    }

    pub async fn approve_review(&self, id: &str) -> ApiResult<()> {
        self.execute(&ApproveReviewRequest { id: id.to_string() })
            .await
            .map(|_| ())
    }
}

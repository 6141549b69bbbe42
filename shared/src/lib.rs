use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod query;

pub use query::{Catalog, ProductQuery, SortOrder};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const API_PREFIX: &str = "/api";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const CURRENCY: &str = "INR";
pub const CURRENCY_SYMBOL: &str = "₹";

/// 首页分类筛选可选值（"全部" 用空值表示）
pub const CATEGORIES: [&str; 5] = ["Web App", "Mobile App", "API", "Plugin", "Template"];

pub const DEFAULT_CATEGORY: &str = "Web App";
pub const DEFAULT_LICENSE_TYPE: &str = "Single-use";

// =========================================================
// 用户与会话 (Users)
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// 后端返回的用户资料，登录后原样写入 LocalStorage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// 登录 / 注册成功后的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

// =========================================================
// 商品 (Products / Projects)
// =========================================================

/// 商品的可编辑部分，也是创建 / 更新请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub tech_stack: Vec<String>,
    pub demo_url: Option<String>,
    pub license_type: String,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}

impl Default for ProductInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            tagline: String::new(),
            description: String::new(),
            price: 0.0,
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
            tech_stack: Vec::new(),
            demo_url: None,
            license_type: DEFAULT_LICENSE_TYPE.to_string(),
            thumbnail: None,
            gallery: Vec::new(),
            is_published: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(flatten)]
    pub base: ProductInput,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_free(&self) -> bool {
        self.base.price <= 0.0
    }

    /// 列表与详情页展示的价格文本
    pub fn price_label(&self) -> String {
        format_price(self.base.price)
    }

    pub fn has_code_archive(&self) -> bool {
        self.file_path.is_some()
    }
}

/// `0` 显示为 `FREE`，其余带货币符号
pub fn format_price(price: f64) -> String {
    if price <= 0.0 {
        "FREE".to_string()
    } else {
        format!("{CURRENCY_SYMBOL}{price}")
    }
}

/// 主货币金额转换为支付网关使用的最小货币单位（分 / paise）
pub fn to_minor_units(amount: f64) -> u64 {
    (amount * 100.0).round().max(0.0) as u64
}

// =========================================================
// 订单 (Orders)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub amount: f64,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub license_key: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

/// 创建订单的响应
///
/// 免费商品（或优惠后金额为 0）只返回 `order_id` 与 `is_free`，
/// 付费商品返回支付网关所需的参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub razorpay_key: Option<String>,
}

/// 支付网关回调载荷，原样转发给后端校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub license_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub download_url: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// =========================================================
// 优惠券 (Coupons)
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Flat,
    Percent,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Flat => "flat",
            DiscountType::Percent => "percent",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouponInput {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_purchase: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    #[serde(flatten)]
    pub base: CouponInput,
    #[serde(default)]
    pub uses: u32,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// 管理面板里的折扣描述，如 `₹100 off` 或 `20% off`
    pub fn discount_label(&self) -> String {
        match self.base.discount_type {
            DiscountType::Flat => format!("{CURRENCY_SYMBOL}{} off", self.base.discount_value),
            DiscountType::Percent => format!("{}% off", self.base.discount_value),
        }
    }
}

// =========================================================
// 评价 (Reviews)
// =========================================================

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    #[serde(default)]
    pub user_id: String,
    pub user_name: String,
    /// 历史数据里可能有越界或小数评分，读取时收进 1..=5
    #[serde(deserialize_with = "lenient_rating")]
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// 将评分限制在 1..=5
pub fn clamp_rating(rating: u8) -> u8 {
    rating.clamp(MIN_RATING, MAX_RATING)
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Ok(MIN_RATING);
    }
    Ok(raw.round().clamp(f64::from(MIN_RATING), f64::from(MAX_RATING)) as u8)
}

// =========================================================
// 统计 (Analytics)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_orders: u64,
    pub total_revenue: f64,
    pub total_products: u64,
    #[serde(default)]
    pub top_products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json(price: f64) -> serde_json::Value {
        json!({
            "id": "p1",
            "title": "Shop Starter",
            "tagline": "Storefront in a box",
            "description": "Full source",
            "price": price,
            "category": "Web App",
            "tags": ["react", "shop"],
            "tech_stack": ["React", "FastAPI"],
            "demo_url": null,
            "license_type": "Single-use",
            "thumbnail": null,
            "gallery": [],
            "is_published": true,
            "file_path": null,
            "downloads": 12,
            "rating": 4.5,
            "reviews_count": 2,
            "created_at": "2024-05-01T10:00:00+00:00"
        })
    }

    #[test]
    fn test_product_from_backend_json() {
        let product: Product = serde_json::from_value(product_json(499.0)).unwrap();
        assert_eq!(product.base.title, "Shop Starter");
        assert_eq!(product.base.tech_stack, vec!["React", "FastAPI"]);
        assert_eq!(product.downloads, 12);
        assert!(!product.is_free());
        assert!(!product.has_code_archive());
    }

    #[test]
    fn test_price_label() {
        let free: Product = serde_json::from_value(product_json(0.0)).unwrap();
        assert!(free.is_free());
        assert_eq!(free.price_label(), "FREE");

        let paid: Product = serde_json::from_value(product_json(499.0)).unwrap();
        assert_eq!(paid.price_label(), "₹499");
        assert_eq!(format_price(99.5), "₹99.5");
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(499.0), 49900);
        assert_eq!(to_minor_units(0.1 + 0.2), 30);
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(-5.0), 0);
    }

    #[test]
    fn test_create_order_response_shapes() {
        let free: CreateOrderResponse =
            serde_json::from_value(json!({ "order_id": "o1", "is_free": true })).unwrap();
        assert!(free.is_free);
        assert!(free.razorpay_order_id.is_none());

        let paid: CreateOrderResponse = serde_json::from_value(json!({
            "order_id": "o2",
            "razorpay_order_id": "order_rzp_1",
            "amount": 450.0,
            "razorpay_key": "rzp_test_key"
        }))
        .unwrap();
        assert!(!paid.is_free);
        assert_eq!(paid.amount, Some(450.0));
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let user: User = serde_json::from_value(json!({ "id": "u1", "name": "Asha" })).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());

        let admin: User =
            serde_json::from_value(json!({ "id": "u2", "name": "Root", "role": "admin" })).unwrap();
        assert!(admin.is_admin());
    }

    #[test]
    fn test_coupon_discount_label() {
        let coupon: Coupon = serde_json::from_value(json!({
            "id": "c1",
            "code": "SAVE20",
            "discount_type": "percent",
            "discount_value": 20.0,
            "min_purchase": 100.0,
            "uses": 3,
            "is_active": true,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(coupon.discount_label(), "20% off");
        assert_eq!(coupon.uses, 3);
    }

    #[test]
    fn test_out_of_range_ratings_do_not_break_review_list() {
        let review = |id: &str, rating: serde_json::Value| {
            json!({
                "id": id,
                "product_id": "p1",
                "user_name": "Ravi",
                "rating": rating,
                "comment": "ok",
                "created_at": "2024-06-01T00:00:00Z"
            })
        };
        let body = json!([
            review("r1", json!(0)),
            review("r2", json!(-2)),
            review("r3", json!(9)),
            review("r4", json!(4)),
            review("r5", json!(3.6)),
        ]);

        let reviews: Vec<Review> = serde_json::from_value(body).unwrap();
        let ratings: Vec<u8> = reviews.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![1, 1, 5, 4, 4]);
    }

    #[test]
    fn test_clamp_rating() {
        assert_eq!(clamp_rating(0), 1);
        assert_eq!(clamp_rating(3), 3);
        assert_eq!(clamp_rating(9), 5);
    }
}

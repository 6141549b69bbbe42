//! 表单状态管理模块
//!
//! 将零散的 signal 整合为结构体，负责：
//! - 数据的持有
//! - 数据的重置 / 编辑时回填
//! - 数据到请求对象的转换

use codemart_shared::{
    CouponInput, DEFAULT_CATEGORY, DEFAULT_LICENSE_TYPE, DiscountType, Product, ProductInput,
};
use leptos::prelude::*;

/// 逗号分隔输入 -> 列表，去掉空白项
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// 表单校验错误，直接作为提示文案展示
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{field} must be a non-negative number")]
    InvalidAmount { field: &'static str },
}

/// 金额输入：必须是有限的非负数
pub fn parse_amount(field: &'static str, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or(FormError::InvalidAmount { field })
}

/// 可留空的金额，空白按 0
fn parse_optional_amount(field: &'static str, raw: &str) -> Result<f64, FormError> {
    if raw.trim().is_empty() {
        Ok(0.0)
    } else {
        parse_amount(field, raw)
    }
}

fn optional(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// =========================================================
// 商品表单
// =========================================================

/// 商品表单的原始输入（全部为文本）
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub tags: String,
    pub tech_stack: String,
    pub demo_url: String,
    pub license_type: String,
    pub thumbnail: String,
    pub gallery: String,
    pub is_published: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            tagline: String::new(),
            description: String::new(),
            price: "0".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: String::new(),
            tech_stack: String::new(),
            demo_url: String::new(),
            license_type: DEFAULT_LICENSE_TYPE.to_string(),
            thumbnail: String::new(),
            gallery: String::new(),
            is_published: true,
        }
    }
}

impl ProductDraft {
    /// 编辑时回填
    pub fn from_product(product: &Product) -> Self {
        let base = &product.base;
        Self {
            title: base.title.clone(),
            tagline: base.tagline.clone(),
            description: base.description.clone(),
            price: base.price.to_string(),
            category: base.category.clone(),
            tags: join_list(&base.tags),
            tech_stack: join_list(&base.tech_stack),
            demo_url: base.demo_url.clone().unwrap_or_default(),
            license_type: base.license_type.clone(),
            thumbnail: base.thumbnail.clone().unwrap_or_default(),
            gallery: join_list(&base.gallery),
            is_published: base.is_published,
        }
    }

    pub fn to_input(&self) -> Result<ProductInput, FormError> {
        Ok(ProductInput {
            title: self.title.trim().to_string(),
            tagline: self.tagline.trim().to_string(),
            description: self.description.clone(),
            price: parse_amount("Price", &self.price)?,
            category: self.category.clone(),
            tags: split_list(&self.tags),
            tech_stack: split_list(&self.tech_stack),
            demo_url: optional(self.demo_url.clone()),
            license_type: self.license_type.trim().to_string(),
            thumbnail: optional(self.thumbnail.clone()),
            gallery: split_list(&self.gallery),
            is_published: self.is_published,
        })
    }
}

/// 商品表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct ProductFormState {
    pub draft: RwSignal<ProductDraft>,
    /// 正在编辑的商品 ID，`None` 表示新建
    pub editing: RwSignal<Option<String>>,
}

impl ProductFormState {
    pub fn new() -> Self {
        Self {
            draft: RwSignal::new(ProductDraft::default()),
            editing: RwSignal::new(None),
        }
    }

    pub fn reset(&self) {
        self.draft.set(ProductDraft::default());
        self.editing.set(None);
    }

    pub fn fill(&self, product: &Product) {
        self.draft.set(ProductDraft::from_product(product));
        self.editing.set(Some(product.id.clone()));
    }

    pub fn is_editing(&self) -> bool {
        self.editing.with(Option::is_some)
    }

    /// 更新单个字段
    pub fn edit(&self, f: impl FnOnce(&mut ProductDraft)) {
        self.draft.update(f);
    }
}

impl Default for ProductFormState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================
// 优惠券表单
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CouponDraft {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: String,
    pub min_purchase: String,
}

impl Default for CouponDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            discount_type: DiscountType::Flat,
            discount_value: "0".to_string(),
            min_purchase: "0".to_string(),
        }
    }
}

impl CouponDraft {
    /// 优惠码统一大写
    pub fn set_code(&mut self, raw: &str) {
        self.code = raw.to_uppercase();
    }

    pub fn to_input(&self) -> Result<CouponInput, FormError> {
        Ok(CouponInput {
            code: self.code.trim().to_string(),
            discount_type: self.discount_type,
            discount_value: parse_amount("Discount value", &self.discount_value)?,
            min_purchase: parse_optional_amount("Minimum purchase", &self.min_purchase)?,
            max_uses: None,
            expires_at: None,
        })
    }
}

pub fn parse_discount_type(raw: &str) -> DiscountType {
    match raw {
        "percent" => DiscountType::Percent,
        _ => DiscountType::Flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::product_json;

    #[test]
    fn test_defaults() {
        let input = ProductDraft::default().to_input().unwrap();
        assert_eq!(input.category, "Web App");
        assert_eq!(input.license_type, "Single-use");
        assert!(input.is_published);
        assert_eq!(input.price, 0.0);
        assert!(input.gallery.is_empty());
        assert!(input.demo_url.is_none());
    }

    #[test]
    fn test_comma_fields_are_split_and_trimmed() {
        let draft = ProductDraft {
            title: " Admin Kit ".into(),
            price: "499".into(),
            tags: "react, nodejs ,mongodb,".into(),
            tech_stack: "React, FastAPI".into(),
            gallery: "   ".into(),
            demo_url: "https://demo.example.com".into(),
            ..ProductDraft::default()
        };
        let input = draft.to_input().unwrap();

        assert_eq!(input.title, "Admin Kit");
        assert_eq!(input.price, 499.0);
        assert_eq!(input.tags, vec!["react", "nodejs", "mongodb"]);
        assert_eq!(input.tech_stack, vec!["React", "FastAPI"]);
        assert!(input.gallery.is_empty());
        assert_eq!(input.demo_url.as_deref(), Some("https://demo.example.com"));
    }

    #[test]
    fn test_edit_prefill_joins_lists() {
        let mut json = product_json("p1", 250.0);
        json["tags"] = serde_json::json!(["a", "b"]);
        json["gallery"] = serde_json::json!(["img1", "img2"]);
        let product: Product = serde_json::from_value(json).unwrap();

        let draft = ProductDraft::from_product(&product);
        assert_eq!(draft.tags, "a, b");
        assert_eq!(draft.gallery, "img1, img2");
        assert_eq!(draft.price, "250");
        assert_eq!(draft.to_input(), Ok(product.base));
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(parse_amount("Price", " 12.5 "), Ok(12.5));
        assert_eq!(parse_amount("Price", "0"), Ok(0.0));
        for bad in ["abc", "-3", "", "NaN", "inf"] {
            assert_eq!(
                parse_amount("Price", bad),
                Err(FormError::InvalidAmount { field: "Price" }),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn test_invalid_price_is_reported_not_zeroed() {
        let draft = ProductDraft {
            title: "Kit".into(),
            price: "abc".into(),
            ..ProductDraft::default()
        };
        let err = draft.to_input().unwrap_err();
        assert_eq!(err.to_string(), "Price must be a non-negative number");

        let negative = ProductDraft {
            price: "-3".into(),
            ..ProductDraft::default()
        };
        assert!(negative.to_input().is_err());
    }

    #[test]
    fn test_coupon_rejects_bad_amounts() {
        let draft = CouponDraft {
            discount_value: "-10".into(),
            ..CouponDraft::default()
        };
        assert_eq!(
            draft.to_input().unwrap_err().to_string(),
            "Discount value must be a non-negative number"
        );

        let blank_min = CouponDraft {
            min_purchase: "  ".into(),
            ..CouponDraft::default()
        };
        assert_eq!(blank_min.to_input().unwrap().min_purchase, 0.0);

        let bad_min = CouponDraft {
            min_purchase: "ten".into(),
            ..CouponDraft::default()
        };
        assert!(bad_min.to_input().is_err());
    }

    #[test]
    fn test_coupon_draft() {
        let mut draft = CouponDraft::default();
        draft.set_code("save20");
        draft.discount_type = parse_discount_type("percent");
        draft.discount_value = "20".into();

        let input = draft.to_input().unwrap();
        assert_eq!(input.code, "SAVE20");
        assert_eq!(input.discount_type, DiscountType::Percent);
        assert_eq!(input.discount_value, 20.0);
        assert_eq!(input.min_purchase, 0.0);
        assert_eq!(parse_discount_type("flat"), DiscountType::Flat);
    }
}

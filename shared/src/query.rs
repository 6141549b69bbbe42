//! 商品列表查询
//!
//! 首页的分类 / 排序 / 搜索条件以及管理端的 `published_only=false`，
//! 统一由 `ProductQuery` 转换为查询字符串。

use serde::{Deserialize, Serialize};

/// 商品资源路径段，CodeMart 使用 `products`，CodeStore 使用 `projects`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    #[default]
    Products,
    Projects,
}

impl Catalog {
    pub fn segment(&self) -> &'static str {
        match self {
            Catalog::Products => "products",
            Catalog::Projects => "projects",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Popular,
    Rating,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Newest,
        SortOrder::PriceLow,
        SortOrder::PriceHigh,
        SortOrder::Popular,
        SortOrder::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::PriceLow => "price_low",
            SortOrder::PriceHigh => "price_high",
            SortOrder::Popular => "popular",
            SortOrder::Rating => "rating",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::PriceLow => "Price: Low to High",
            SortOrder::PriceHigh => "Price: High to Low",
            SortOrder::Popular => "Most Popular",
            SortOrder::Rating => "Highest Rated",
        }
    }

    /// 未知值回退到 `Newest`，与后端默认排序一致
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub sort: Option<SortOrder>,
    pub search: Option<String>,
    pub published_only: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub tags: Vec<String>,
}

impl ProductQuery {
    /// 管理端列表：包含未发布商品
    pub fn including_unpublished() -> Self {
        Self {
            published_only: Some(false),
            ..Self::default()
        }
    }

    /// 设置分类，空字符串视为"全部分类"
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_empty(search.into());
        self
    }

    /// 以 `(key, value)` 形式返回非空参数，顺序固定
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(published_only) = self.published_only {
            pairs.push(("published_only", published_only.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        pairs
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 以 `application/x-www-form-urlencoded` 规则拼接查询字符串（不含 `?`）
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_encode(input: &str) -> String {
    percent_encode(input, true)
}

/// Escapes a single URL path segment; `/`, `:` and spaces never survive
pub fn encode_path_segment(input: &str) -> String {
    percent_encode(input, false)
}

fn percent_encode(input: &str, space_as_plus: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(byte as char)
            }
            b' ' if space_as_plus => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_sort_pairs() {
        let query = ProductQuery::default()
            .with_category("Mobile App")
            .with_sort(SortOrder::PriceLow);
        assert_eq!(
            encode_query(&query.to_pairs()),
            "category=Mobile+App&sort=price_low"
        );
    }

    #[test]
    fn test_empty_values_are_dropped() {
        let query = ProductQuery::default()
            .with_category("")
            .with_search("   ");
        assert!(query.to_pairs().is_empty());
        assert_eq!(encode_query(&query.to_pairs()), "");
    }

    #[test]
    fn test_including_unpublished() {
        let query = ProductQuery::including_unpublished();
        assert_eq!(encode_query(&query.to_pairs()), "published_only=false");
    }

    #[test]
    fn test_search_is_escaped() {
        let query = ProductQuery::default().with_search("c++ & rust");
        assert_eq!(encode_query(&query.to_pairs()), "search=c%2B%2B+%26+rust");
    }

    #[test]
    fn test_tags_and_price_range() {
        let query = ProductQuery {
            min_price: Some(10.0),
            max_price: Some(99.5),
            tags: vec!["react".to_string(), "shop".to_string()],
            ..ProductQuery::default()
        };
        assert_eq!(
            encode_query(&query.to_pairs()),
            "min_price=10&max_price=99.5&tags=react%2Cshop"
        );
    }

    #[test]
    fn test_path_segment_escapes_separators() {
        assert_eq!(encode_path_segment("f1-abc_2.png"), "f1-abc_2.png");
        assert_eq!(
            encode_path_segment("https://cdn.example.com/a b.png"),
            "https%3A%2F%2Fcdn.example.com%2Fa%20b.png"
        );
    }

    #[test]
    fn test_sort_parse_falls_back() {
        assert_eq!(SortOrder::parse("rating"), SortOrder::Rating);
        assert_eq!(SortOrder::parse("cheapest"), SortOrder::Newest);
    }
}

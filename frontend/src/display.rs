//! 表格与卡片中的展示格式

use chrono::{DateTime, Utc};
use codemart_shared::MAX_RATING;

/// 截断长 ID / 许可证，如 `3f2a9c1b...`
pub fn truncate(value: &str, len: usize) -> String {
    if value.chars().count() <= len {
        value.to_string()
    } else {
        let head: String = value.chars().take(len).collect();
        format!("{head}...")
    }
}

pub fn short_id(id: &str) -> String {
    truncate(id, 8)
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%d %b %Y").to_string()
}

/// 亮起的星星数量（向下取整，上限 5）
pub fn filled_stars(rating: f64) -> u8 {
    if rating.is_nan() || rating <= 0.0 {
        0
    } else {
        (rating.floor() as u8).min(MAX_RATING)
    }
}

pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(short_id("3f2a9c1b-7d4e"), "3f2a9c1b...");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(truncate("LIC-0123456789AB", 12), "LIC-01234567...");
    }

    #[test]
    fn test_stars_and_rating() {
        assert_eq!(filled_stars(4.7), 4);
        assert_eq!(filled_stars(0.0), 0);
        assert_eq!(filled_stars(9.0), 5);
        assert_eq!(format_rating(4.0), "4.0");
    }

    #[test]
    fn test_format_date() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(format_date(&at), "01 Jun 2024");
    }
}

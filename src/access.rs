//! Entitlement checks and price display.

use serde::{Deserialize, Serialize};

use crate::types::{ids_match, Course};

const FREE_TOKENS: [&str; 9] = ["", "0", "free", "null", "undefined", "-", "n/a", "none", "nil"];

/// Digit grouping used when printing an amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 1,00,000
    #[default]
    Indian,
    /// 100,000
    Western,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFormat {
    pub currency_symbol: String,
    pub grouping: Grouping,
}

impl Default for PriceFormat {
    fn default() -> Self { Self { currency_symbol: "₹".to_string(), grouping: Grouping::Indian } }
}

/// A missing price, any of the usual "nothing" tokens, or a zero amount is free.
pub fn is_free(price: Option<&str>) -> bool {
    let Some(price) = price else { return true };
    let p = price.trim().to_lowercase();
    FREE_TOKENS.contains(&p.as_str()) || parse_float_prefix(&p) == Some(0.0)
}

pub fn is_purchased(course_id: &str, purchased: &[String]) -> bool {
    purchased.iter().any(|id| ids_match(id, course_id))
}

pub fn is_unlocked(course: &Course, purchased: &[String]) -> bool {
    is_free(Some(&course.price)) || is_purchased(&course.id, purchased)
}

/// "FREE" for free or unreadable prices, otherwise the grouped amount with its currency symbol.
pub fn format_price(price: Option<&str>, fmt: &PriceFormat) -> String {
    if is_free(price) { return "FREE".to_string(); }
    let cleaned: String = price.unwrap_or_default().chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    match parse_float_prefix(&cleaned) {
        Some(amount) if amount != 0.0 => format!("{}{}", fmt.currency_symbol, group_amount(amount, fmt.grouping)),
        _ => "FREE".to_string(),
    }
}

/// Parse the longest leading decimal number, ignoring anything after it.
/// "12abc" -> 12, "1.2.3" -> 1.2, "abc" -> None.
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) { end += 1; }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() { end += 1; }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() { frac_end += 1; }
        digits += frac_end - frac_start;
        if digits > 0 { end = frac_end; }
    }
    if digits == 0 { return None; }
    s[..end].parse().ok()
}

fn group_amount(amount: f64, grouping: Grouping) -> String {
    let rounded = (amount * 1000.0).round() / 1000.0;
    let int_part = rounded.trunc() as u64;
    let frac = format!("{:.3}", rounded.fract());
    let frac = frac.trim_start_matches('0').trim_end_matches('0').trim_end_matches('.');

    let digits = int_part.to_string();
    let grouped = match grouping {
        Grouping::Western => group_from_right(&digits, 3, 3),
        Grouping::Indian => group_from_right(&digits, 3, 2),
    };
    format!("{grouped}{frac}")
}

fn group_from_right(digits: &str, first: usize, rest: usize) -> String {
    if digits.len() <= first { return digits.to_string(); }
    let (head, tail) = digits.split_at(digits.len() - first);
    let mut groups = vec![tail.to_string()];
    let mut head = head;
    while head.len() > rest {
        let (h, t) = head.split_at(head.len() - rest);
        groups.push(t.to_string());
        head = h;
    }
    groups.push(head.to_string());
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::course;

    #[test]
    fn free_tokens() {
        for p in ["", "0", "FREE", "Free", "-", "N/A", "none", " nil ", "0.00", "null", "undefined"] {
            assert!(is_free(Some(p)), "{p:?} should be free");
        }
        assert!(is_free(None));
        for p in ["199", "₹499", "$5", "0.5"] {
            assert!(!is_free(Some(p)), "{p:?} should be paid");
        }
    }

    #[test]
    fn unlock_requires_free_or_purchase() {
        let paid = course("7", "Systems", "999");
        let free = course("8", "Intro", "free");
        assert!(!is_unlocked(&paid, &[]));
        assert!(is_unlocked(&paid, &["7".to_string()]));
        assert!(is_unlocked(&free, &[]));
        assert!(is_purchased("7", &["3".into(), "7".into()]));
    }

    #[test]
    fn prices_format_with_grouping() {
        let inr = PriceFormat::default();
        assert_eq!(format_price(Some("free"), &inr), "FREE");
        assert_eq!(format_price(Some("499"), &inr), "₹499");
        assert_eq!(format_price(Some("₹1,999"), &inr), "₹1,999");
        assert_eq!(format_price(Some("100000"), &inr), "₹1,00,000");
        assert_eq!(format_price(Some("1234567.5"), &inr), "₹12,34,567.5");
        assert_eq!(format_price(Some("Rs. abc"), &inr), "FREE");

        let usd = PriceFormat { currency_symbol: "$".into(), grouping: Grouping::Western };
        assert_eq!(format_price(Some("1234567"), &usd), "$1,234,567");
        assert_eq!(format_price(Some("$19.99"), &usd), "$19.99");
    }

    #[test]
    fn float_prefix_parsing() {
        assert_eq!(parse_float_prefix("12abc"), Some(12.0));
        assert_eq!(parse_float_prefix("1.2.3"), Some(1.2));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("-0"), Some(0.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
    }
}

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// A monetary figure as printed on a statement: digit groups with optional
/// comma separators and exactly two fractional digits.
///
/// Western ("10,250.00") and Indian ("1,00,000.00") grouping both match, as do
/// figures without separators ("1500.00").
pub const MONEY_PATTERN: &str = r"\b\d+(?:,\d+)*\.\d{2}";

pub static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(MONEY_PATTERN).unwrap());

const DATE_FORMAT: &str = "%d-%m-%Y";

/// All monetary figures in `text`, in source order.
pub fn money_figures(text: &str) -> Vec<&str> {
    MONEY_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Parse a statement amount into a decimal, dropping separators and the rupee sign.
///
/// Returns None for anything that is not a plain number after cleanup.
pub fn parse_money(s: &str) -> Option<Decimal> {
    let cleaned: String = strip_currency(s)
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Remove the rupee symbol (and the "Rs." prefix some exports use) and trim.
pub fn strip_currency(s: &str) -> String {
    let s = s.replace('₹', "");
    let s = s.trim();
    let s = s
        .strip_prefix("Rs.")
        .or_else(|| s.strip_prefix("INR"))
        .unwrap_or(s);
    s.trim().to_string()
}

/// Check that a `DD-MM-YYYY` token is a real calendar date.
pub fn validate_dmy(s: &str) -> Option<String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .ok()
        .map(|d| d.format(DATE_FORMAT).to_string())
}

/// Reformat a human date such as "12 Jan, 2024" into `DD-MM-YYYY`.
///
/// Accepts the comma-less and full-month-name variants wallet apps also print.
pub fn normalize_human_date(s: &str) -> Option<String> {
    let s = s.trim();
    ["%d %b, %Y", "%d %b %Y", "%d %B, %Y", "%d %B %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.format(DATE_FORMAT).to_string())
}

/// Normalize a time of day to `HH:MM:SS`.
///
/// Handles "10:15 AM", "10:15AM", "22:05" and "22:05:09". Returns None when
/// the text is not a recognizable time.
pub fn normalize_time(s: &str) -> Option<String> {
    let compact = s.trim().to_uppercase().replace(' ', "");
    ["%I:%M%p", "%I:%M:%S%p", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&compact, fmt).ok())
        .map(|t| t.format("%H:%M:%S").to_string())
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_figures_in_order() {
        let figures = money_figures("UPI/DR 500.00 1,500.00 Chq: 12345");
        assert_eq!(figures, vec!["500.00", "1,500.00"]);
    }

    #[test]
    fn test_money_figures_indian_grouping() {
        assert_eq!(money_figures("credit 1,00,000.00"), vec!["1,00,000.00"]);
    }

    #[test]
    fn test_money_figures_ignore_dates_and_times() {
        assert!(money_figures("01-01-2024 10:15:30 Chq: 12345").is_empty());
    }

    #[test]
    fn test_money_figure_not_split_mid_number() {
        assert_eq!(money_figures("1500.00"), vec!["1500.00"]);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("10,250.00"), Some(dec!(10250.00)));
        assert_eq!(parse_money("₹1,200"), Some(dec!(1200)));
        assert_eq!(parse_money("Rs. 99.50"), Some(dec!(99.50)));
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("n/a"), None);
    }

    #[test]
    fn test_strip_currency() {
        assert_eq!(strip_currency("₹250"), "250");
        assert_eq!(strip_currency(" ₹ 1,250.50 "), "1,250.50");
    }

    #[test]
    fn test_validate_dmy() {
        assert_eq!(validate_dmy("01-01-2024").as_deref(), Some("01-01-2024"));
        assert_eq!(validate_dmy("31-02-2024"), None);
    }

    #[test]
    fn test_normalize_human_date() {
        assert_eq!(
            normalize_human_date("12 Jan, 2024").as_deref(),
            Some("12-01-2024")
        );
        assert_eq!(
            normalize_human_date("3 March 2024").as_deref(),
            Some("03-03-2024")
        );
        assert_eq!(normalize_human_date("yesterday"), None);
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("10:15 AM").as_deref(), Some("10:15:00"));
        assert_eq!(normalize_time("9:05 pm").as_deref(), Some("21:05:00"));
        assert_eq!(normalize_time("22:05:09").as_deref(), Some("22:05:09"));
        assert_eq!(normalize_time("noon"), None);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n b\t\tc "), "a b c");
    }
}

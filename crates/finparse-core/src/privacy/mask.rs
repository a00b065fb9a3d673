use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Digit runs, including the `*` prefix an earlier masking pass left behind.
static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\**\d+").unwrap());

const HANDLE_STARS: &str = "****";

/// Mask a sensitive value.
///
/// `name@domain` keeps the first two characters of the name and the domain.
/// Otherwise every run of 4+ digits has its first half replaced by `*`.
/// A run whose `*` prefix covers at least half of it was masked before and is
/// left alone, so masking an already masked value returns it unchanged.
pub fn mask_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    if let Some((name, domain)) = value.split_once('@') {
        let prefix: String = name.chars().take(2).collect();
        let prefix = prefix.trim_end_matches('*');
        return format!("{prefix}{HANDLE_STARS}@{domain}");
    }

    DIGIT_RUN_RE
        .replace_all(value, |caps: &Captures| {
            let run = &caps[0];
            let digits = run.trim_start_matches('*');
            let stars = run.len() - digits.len();
            if (stars > 0 && stars >= run.len() / 2) || digits.len() < 4 {
                return run.to_string();
            }
            let half = digits.len() / 2;
            format!("{}{}{}", &run[..stars], "*".repeat(half), &digits[half..])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_upi_handle() {
        assert_eq!(mask_value("jane@okaxis"), "ja****@okaxis");
        assert_eq!(mask_value("j@ybl"), "j****@ybl");
    }

    #[test]
    fn test_mask_digit_runs() {
        assert_eq!(mask_value("401234567890"), "******567890");
        assert_eq!(mask_value("12345"), "**345");
        assert_eq!(mask_value("HDFC Bank 1234"), "HDFC Bank **34");
    }

    #[test]
    fn test_short_runs_untouched() {
        assert_eq!(mask_value("007"), "007");
        assert_eq!(mask_value("TXN1"), "TXN1");
    }

    #[test]
    fn test_literal_stars_do_not_count_as_digits() {
        assert_eq!(mask_value("*123"), "*123");
        assert_eq!(mask_value("x*1234"), "x***34");
        assert_eq!(mask_value("**12345678"), "******5678");
    }

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(mask_value(""), "");
    }

    #[test]
    fn test_masking_is_idempotent() {
        for value in [
            "jane@okaxis",
            "j@ybl",
            "401234567890",
            "12345",
            "A/C 9876543 ref 1234",
            "x*1234",
            "**12345678",
        ] {
            let once = mask_value(value);
            assert_eq!(mask_value(&once), once, "re-masking {value}");
        }
    }
}

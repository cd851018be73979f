//! crates/marketplace_core/src/util.rs
//!
//! Small validation and pricing helpers shared by the core and the api service.

use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Rounded percentage saved relative to `original_price`.
pub fn calculate_discount(original_price: f64, price: f64) -> u32 {
    if original_price <= 0.0 {
        return 0;
    }
    (((original_price - price) / original_price) * 100.0)
        .round()
        .max(0.0) as u32
}

/// Rounded completion percentage; 0 when there is nothing to complete.
pub fn calculate_progress(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// "Free" for zero, otherwise US dollars with thousands separators.
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "Free".to_string();
    }
    let cents = (price * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}.{:02}", grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("student@edtech.demo"));
        assert!(!is_valid_email("student@edtech"));
        assert!(!is_valid_email("student edtech@demo.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_length() {
        assert!(is_valid_password("student123"));
        assert!(!is_valid_password("short"));
    }

    #[test]
    fn discount_and_progress_round() {
        assert_eq!(calculate_discount(149.99, 89.99), 40);
        assert_eq!(calculate_discount(0.0, 10.0), 0);
        assert_eq!(calculate_progress(1, 3), 33);
        assert_eq!(calculate_progress(0, 0), 0);
    }

    #[test]
    fn prices_format_like_currency() {
        assert_eq!(format_price(0.0), "Free");
        assert_eq!(format_price(89.99), "$89.99");
        assert_eq!(format_price(1234567.5), "$1,234,567.50");
    }
}

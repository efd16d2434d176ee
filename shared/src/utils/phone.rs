//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// E.164: plus sign, non-zero leading digit, 8-15 digits total
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{7,14}$").expect("E.164 regex is valid")
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is a valid E.164 number
pub fn is_valid_phone(phone: &str) -> bool {
    E164_REGEX.is_match(&normalize_phone(phone))
}

/// Mask a phone number for logs (e.g., +7999****67)
pub fn mask_phone(phone: &str) -> String {
    let normalized = normalize_phone(phone);
    if normalized.len() >= 8 {
        format!(
            "{}****{}",
            &normalized[0..normalized.len() - 6],
            &normalized[normalized.len() - 2..]
        )
    } else {
        "****".to_string()
    }
}

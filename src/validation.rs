/// accepted language levels for translators, stored upper-cased
pub const LANGUAGE_LEVELS: [&str; 7] = ["A1", "A2", "B1", "B2", "C1", "C2", "NATIVE"];

/// parses a price typed by a user, accepting either `.` or `,` as decimal separator
pub fn parse_price(price_text: &str) -> Option<f64> {
    price_text.trim().replace(',', ".").parse::<f64>().ok()
}

/// true when the text is a strictly positive number
pub fn validate_price(price_text: &str) -> bool {
    // "inf" and "nan" parse as f64 but are not prices
    matches!(parse_price(price_text), Some(price) if price.is_finite() && price > 0.0)
}

/// case-insensitive check against [`LANGUAGE_LEVELS`]
pub fn validate_language_level(level: &str) -> bool {
    normalize_language_level(level).is_some()
}

/// returns the canonical (upper-case) spelling of a valid language level
pub fn normalize_language_level(level: &str) -> Option<String> {
    let upper = level.to_uppercase();
    LANGUAGE_LEVELS
        .iter()
        .any(|valid| *valid == upper)
        .then_some(upper)
}

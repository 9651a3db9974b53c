use once_cell::sync::Lazy;
use regex::Regex;

/// share of upper-case characters above which a message counts as shouting spam
pub const UPPERCASE_SPAM_RATIO: f64 = 0.7;

/// substrings that give away a translator posing as a client during verification
pub const SUSPICIOUS_VERIFICATION_PATTERNS: [&str; 11] = [
    "translator",
    "interpret",
    "übersetz",
    "dolmetsch",
    "language service",
    "sprach",
    "translation",
    "переводчик",
    "перевод",
    "язык",
    "услуги перевода",
];

static SPAM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // english scam vocabulary
        r"(?i)viagra|casino|lottery|winner|prize|money|bitcoin|crypto",
        // russian scam vocabulary
        r"(?i)казино|лотерея|выигрыш|приз|деньги|биткоин|крипто|обогащение|доход",
        r"(?i)заработок онлайн|быстрые деньги|инвестиции|вложения|пассивный доход",
        // international phone numbers
        r"\+\d{9,}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("spam pattern must compile"))
    .collect()
});

static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://(\S*)").expect("link pattern must compile"));

/// true when the text links anywhere other than t.me
fn has_foreign_link(text: &str) -> bool {
    LINK_REGEX.captures_iter(text).any(|captures| {
        let target = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        !target.to_lowercase().starts_with("t.me")
    })
}

/// share of upper-case characters among all characters of the text
pub fn uppercase_ratio(text: &str) -> f64 {
    let total = text.chars().count().max(1);
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f64 / total as f64
}

/// detects scam keywords, non-Telegram links, phone numbers and shouting
pub fn is_spam(text: &str) -> bool {
    if has_foreign_link(text) {
        return true;
    }

    if SPAM_PATTERNS.iter().any(|pattern| pattern.is_match(text)) {
        return true;
    }

    uppercase_ratio(text) > UPPERCASE_SPAM_RATIO
}

/// true when a client's verification answer reads like a translator describing their own services.
///
/// Used both when a client finishes registration and when the admin summary re-scans
/// stored clients, so the two never disagree on what counts as suspicious.
pub fn is_suspicious_client_verification(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SUSPICIOUS_VERIFICATION_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

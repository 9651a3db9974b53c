use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tg_dolmetscher::config::{BotConfig, ConfigError};
use tg_dolmetscher::detection::{is_spam, is_suspicious_client_verification, uppercase_ratio};
use tg_dolmetscher::localization::Lang;
use tg_dolmetscher::rate_limiters::FloodGuard;
use tg_dolmetscher::registration::RetryPolicy;
use tg_dolmetscher::router::UserLocks;
use tg_dolmetscher::store::Role;
use tg_dolmetscher::utils::MessageFormatter;
use tg_dolmetscher::validation::{normalize_language_level, parse_price, validate_language_level, validate_price};

fn config_from(pairs: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    BotConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn test_price_validation() {
    assert!(validate_price("20"));
    assert!(validate_price("20,5"));
    assert!(validate_price("20.5"));
    assert!(validate_price(" 15 "));
    assert!(!validate_price("0"));
    assert!(!validate_price("-5"));
    assert!(!validate_price("abc"));
    assert!(!validate_price(""));
    assert!(!validate_price("inf"));
    assert!(!validate_price("NaN"));

    assert_eq!(parse_price("25,50"), Some(25.5));
    assert_eq!(parse_price("twenty"), None);
}

#[test]
fn test_language_level_validation() {
    assert!(validate_language_level("B1"));
    assert!(validate_language_level("c2"));
    assert!(validate_language_level("Native"));
    assert!(!validate_language_level("B3"));
    assert!(!validate_language_level("fluent"));
    assert!(!validate_language_level(""));

    assert_eq!(normalize_language_level("b1"), Some("B1".to_string()));
    assert_eq!(normalize_language_level("native"), Some("NATIVE".to_string()));
    // surrounding whitespace is not stripped
    assert_eq!(normalize_language_level(" B1"), None);
}

#[test]
fn test_spam_detection() {
    assert!(is_spam("BUY NOW CHEAP"));
    assert!(is_spam("Win big at our casino"));
    assert!(is_spam("Earn BITCOIN today"));
    assert!(is_spam("Пассивный доход от 100к"));
    assert!(is_spam("Write to +491701234567"));
    assert!(is_spam("see http://example.com"));
    assert!(is_spam("see HTTPS://EXAMPLE.COM/x"));

    assert!(!is_spam("Need a translator in Berlin tomorrow"));
    assert!(!is_spam("Join https://t.me/berlin_translators"));
    assert!(!is_spam("Call +49 170 123"));
}

#[test]
fn test_uppercase_ratio_counts_all_characters() {
    assert_eq!(uppercase_ratio(""), 0.0);
    assert_eq!(uppercase_ratio("AB"), 1.0);
    assert_eq!(uppercase_ratio("Ab  "), 0.25);
    // exactly at the threshold is not spam
    assert!(!is_spam("AAAAAAAbbb"));
    assert!(is_spam("AAAAAAAAbb"));
}

#[test]
fn test_suspicious_client_verification() {
    assert!(is_suspicious_client_verification("I am a professional translator"));
    assert!(is_suspicious_client_verification("Ich bin Dolmetscherin"));
    assert!(is_suspicious_client_verification("Предлагаю услуги перевода"));
    assert!(is_suspicious_client_verification("Sprachkurse und mehr"));
    assert!(!is_suspicious_client_verification("I need a dentist appointment translated"));
    assert!(!is_suspicious_client_verification("Termin beim Jobcenter"));
}

#[test]
fn test_config_from_lookup() {
    let config = config_from(&[
        ("BOT_TOKEN", "123:abc"),
        ("ADMIN_USER_IDS", "1, 2,,3"),
        ("DATA_DIR", "/var/lib/bot"),
        ("GROUP_USERNAME", "@berlin_translators"),
        ("MAX_MESSAGES_PER_MINUTE", "10"),
        ("DEFAULT_LANGUAGE", "EN"),
        ("REGISTRATION_RETRY", "same"),
    ])
    .expect("config should parse");

    assert_eq!(config.bot_token, "123:abc");
    assert_eq!(config.admin_user_ids, vec![1, 2, 3]);
    assert!(config.is_admin(2));
    assert!(!config.is_admin(4));
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/bot"));
    assert_eq!(config.group_username.as_deref(), Some("berlin_translators"));
    assert_eq!(config.max_messages_per_minute, 10);
    assert_eq!(config.default_lang, Lang::En);
    assert_eq!(config.retry_policy, RetryPolicy::SameStep);
}

#[test]
fn test_config_defaults() {
    let config = config_from(&[("BOT_TOKEN", "123:abc")]).expect("config should parse");

    assert!(config.admin_user_ids.is_empty());
    assert_eq!(config.data_dir, PathBuf::from("data"));
    assert_eq!(config.group_username, None);
    assert_eq!(config.max_messages_per_minute, 0);
    assert_eq!(config.default_lang, Lang::Ru);
    assert_eq!(config.retry_policy, RetryPolicy::PreviousStep);
}

#[test]
fn test_config_errors() {
    assert!(matches!(config_from(&[]), Err(ConfigError::Missing("BOT_TOKEN"))));
    assert!(matches!(
        config_from(&[("BOT_TOKEN", "  ")]),
        Err(ConfigError::Missing("BOT_TOKEN"))
    ));
    assert!(matches!(
        config_from(&[("BOT_TOKEN", "t"), ("ADMIN_USER_IDS", "1,admin")]),
        Err(ConfigError::Invalid { key: "ADMIN_USER_IDS", .. })
    ));
    assert!(matches!(
        config_from(&[("BOT_TOKEN", "t"), ("MAX_MESSAGES_PER_MINUTE", "many")]),
        Err(ConfigError::Invalid { key: "MAX_MESSAGES_PER_MINUTE", .. })
    ));
    assert!(matches!(
        config_from(&[("BOT_TOKEN", "t"), ("DEFAULT_LANGUAGE", "de")]),
        Err(ConfigError::Invalid { key: "DEFAULT_LANGUAGE", .. })
    ));
    assert!(matches!(
        config_from(&[("BOT_TOKEN", "t"), ("REGISTRATION_RETRY", "never")]),
        Err(ConfigError::Invalid { key: "REGISTRATION_RETRY", .. })
    ));
}

#[test]
fn test_language_from_telegram_code() {
    assert_eq!(Lang::from_code(Some("ru"), Lang::En), Lang::Ru);
    assert_eq!(Lang::from_code(Some("ru-RU"), Lang::En), Lang::Ru);
    assert_eq!(Lang::from_code(Some("de"), Lang::Ru), Lang::En);
    assert_eq!(Lang::from_code(None, Lang::Ru), Lang::Ru);
    assert_eq!(Lang::from_code(None, Lang::En), Lang::En);
}

#[test]
fn test_role_callback_payloads() {
    assert_eq!(Role::from_callback(Role::Translator.as_str()), Some(Role::Translator));
    assert_eq!(Role::from_callback(Role::Client.as_str()), Some(Role::Client));
    assert_eq!(Role::from_callback("admin"), None);
}

#[tokio::test]
async fn test_flood_guard_sliding_window() {
    let guard = FloodGuard::new(2);
    let start = Instant::now();

    assert!(!guard.record_at(1, start).await);
    assert!(!guard.record_at(1, start + Duration::from_secs(1)).await);
    assert!(guard.record_at(1, start + Duration::from_secs(2)).await);
    assert!(!guard.record_at(2, start + Duration::from_secs(2)).await);

    // the first two messages have left the window
    assert!(!guard.record_at(1, start + Duration::from_secs(61)).await);
}

#[tokio::test]
async fn test_flood_guard_disabled() {
    let guard = FloodGuard::new(0);
    let start = Instant::now();

    for _ in 0..50 {
        assert!(!guard.record_at(1, start).await);
    }
}

#[tokio::test]
async fn test_flood_guard_forgets_quiet_users() {
    let guard = FloodGuard::new(2);
    let start = Instant::now();

    guard.record_at(1, start).await;
    guard.record_at(2, start + Duration::from_secs(1)).await;
    assert_eq!(guard.tracked_users().await, 2);

    guard.record_at(3, start + Duration::from_secs(70)).await;
    assert_eq!(guard.tracked_users().await, 1);
}

#[tokio::test]
async fn test_user_locks_are_released_when_idle() {
    let locks = UserLocks::default();

    let guard = locks.lock_user(1).await;
    locks.release_idle(1).await;
    assert_eq!(locks.tracked_users().await, 1);

    drop(guard);
    locks.release_idle(1).await;
    assert_eq!(locks.tracked_users().await, 0);
}

#[test]
fn test_message_formatter_helpers() {
    assert_eq!(MessageFormatter::escape_html("a < b & c"), "a &lt; b &amp; c");
    assert_eq!(MessageFormatter::truncate_with_ellipsis("short", 30), "short");
    assert_eq!(MessageFormatter::truncate_with_ellipsis("abcdefghij", 8), "abcde...");
    assert_eq!(MessageFormatter::count_utf16_code_units("€😀"), 3);

    let text = "line one\nline two\nline three";
    assert_eq!(MessageFormatter::split_by_lines(text, 100), vec![text.to_string()]);
    assert_eq!(
        MessageFormatter::split_by_lines(text, 18),
        vec!["line one\nline two".to_string(), "line three".to_string()]
    );
}

//! Central configuration for the user_accounts crate

use std::sync::LazyLock;

/// Application name used in page titles and the welcome message
///
/// Default: "Sample App"
pub static APP_NAME: LazyLock<String> =
    LazyLock::new(|| std::env::var("APP_NAME").unwrap_or_else(|_| "Sample App".to_string()));

/// Number of users shown per page on the user listing
///
/// Default: 30
pub static USERS_PER_PAGE: LazyLock<u32> = LazyLock::new(|| {
    parse_users_per_page(std::env::var("USERS_PER_PAGE").ok().as_deref())
});

/// Whether cookies set by this crate carry the `Secure` attribute
///
/// Default: true. Only disable for plain-HTTP development and tests.
pub(crate) static COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("COOKIE_SECURE")
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or(true)
});

fn parse_users_per_page(value: Option<&str>) -> u32 {
    value
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(30)
}

//! Central configuration for the user_accounts_axum crate

use std::sync::LazyLock;

use chrono_tz::Tz;

pub const ROOT_PATH: &str = "/";
pub const SIGNIN_PATH: &str = "/signin";
pub const USERS_PATH: &str = "/users";

/// Notice shown when a protected page is requested without a session
pub(crate) const SIGN_IN_NOTICE: &str = "Please sign in to access this page.";

/// Gravatar sizes used by the pages
pub(crate) const GRAVATAR_SIZE_LIST: u32 = 52;
pub(crate) const GRAVATAR_SIZE_PROFILE: u32 = 80;

/// Whether form submissions of signed in users must carry the session's
/// authenticity token
///
/// Default: true
pub static CSRF_PROTECTION: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("CSRF_PROTECTION")
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or(true)
});

/// Time zone used when showing timestamps on pages
///
/// Default: UTC
pub static DISPLAY_TIMEZONE: LazyLock<Tz> =
    LazyLock::new(|| parse_timezone(std::env::var("DISPLAY_TIMEZONE").ok().as_deref()));

fn parse_timezone(value: Option<&str>) -> Tz {
    match value {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!("Unknown DISPLAY_TIMEZONE '{}', falling back to UTC", name);
            Tz::UTC
        }),
        None => Tz::UTC,
    }
}

pub(crate) fn user_path(user_id: i64) -> String {
    format!("{USERS_PATH}/{user_id}")
}

pub(crate) fn edit_user_path(user_id: i64) -> String {
    format!("{USERS_PATH}/{user_id}/edit")
}

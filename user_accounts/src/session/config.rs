use std::sync::LazyLock;

/// Name of the cookie carrying the session id
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("SessionId".to_string())
});

const DEFAULT_SESSION_COOKIE_MAX_AGE: u64 = 86400;

/// Ten years; larger values overflow session expiry arithmetic
const MAX_SESSION_COOKIE_MAX_AGE: u64 = 10 * 365 * 86400;

pub(super) static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    parse_session_cookie_max_age(std::env::var("SESSION_COOKIE_MAX_AGE").ok().as_deref())
});

fn parse_session_cookie_max_age(raw: Option<&str>) -> u64 {
    let max_age = raw
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SESSION_COOKIE_MAX_AGE);

    if max_age > MAX_SESSION_COOKIE_MAX_AGE {
        tracing::warn!(
            "SESSION_COOKIE_MAX_AGE {} is too large, using {}",
            max_age,
            MAX_SESSION_COOKIE_MAX_AGE
        );
        return MAX_SESSION_COOKIE_MAX_AGE;
    }
    max_age
}

pub(super) static FLASH_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("FLASH_COOKIE_NAME")
        .ok()
        .unwrap_or("Flash".to_string())
});

/// Name of the cookie remembering where to go after sign-in
pub static RETURN_TO_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("RETURN_TO_COOKIE_NAME")
        .ok()
        .unwrap_or("ReturnTo".to_string())
});

/// Flash entries only need to outlive a single redirect
pub(super) const FLASH_MAX_AGE: u64 = 300;

pub(super) const RETURN_TO_MAX_AGE: u64 = 1800;

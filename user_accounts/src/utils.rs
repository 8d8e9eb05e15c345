use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

use crate::config::COOKIE_SECURE;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

pub(crate) fn gen_random_bytes(len: usize) -> Result<Vec<u8>, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(bytes)
}

pub(crate) fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let bytes = gen_random_bytes(len)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn format_cookie(name: &str, value: &str, max_age: i64, secure: bool) -> String {
    let secure = if secure { " Secure;" } else { "" };
    format!("{name}={value}; SameSite=Lax;{secure} HttpOnly; Path=/; Max-Age={max_age}")
}

pub(crate) fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
) -> Result<(), UtilError> {
    let cookie = format_cookie(name, value, max_age, *COOKIE_SECURE);
    tracing::trace!("Set-Cookie: {}", cookie);
    headers.append(
        SET_COOKIE,
        cookie
            .parse::<HeaderValue>()
            .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(())
}

/// Build headers that expire the named cookie in the browser
pub fn expire_cookie_header(name: &str) -> Result<HeaderMap, UtilError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, name, "", -86400)?;
    Ok(headers)
}

/// Extract a cookie value from the request headers
///
/// Returns `Ok(None)` when there is no `Cookie` header or the cookie is absent.
pub fn cookie_value_from_headers<'a>(
    headers: &'a HeaderMap,
    cookie_name: &str,
) -> Result<Option<&'a str>, UtilError> {
    let mut found = None;

    for cookie_header in headers.get_all(COOKIE) {
        let cookie_str = cookie_header
            .to_str()
            .map_err(|_| UtilError::Cookie("Invalid cookie header".to_string()))?;

        found = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
            let mut parts = s.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(k), Some(v)) if k == cookie_name && !v.is_empty() => Some(v),
                _ => None,
            }
        });

        if found.is_some() {
            break;
        }
    }

    Ok(found)
}

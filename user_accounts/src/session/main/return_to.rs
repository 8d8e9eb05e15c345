use http::header::HeaderMap;

use crate::session::config::{RETURN_TO_COOKIE_NAME, RETURN_TO_MAX_AGE};
use crate::session::errors::SessionError;

use super::one_shot::{put_one_shot, take_one_shot};

const RETURN_TO_PREFIX: &str = "return_to";

/// Only same-origin absolute paths may be remembered
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Remember where the visitor was heading before being sent to sign in
pub async fn prepare_return_to_cookie(path: &str) -> Result<HeaderMap, SessionError> {
    if !is_local_path(path) {
        return Err(SessionError::InvalidRedirect(path.to_string()));
    }

    put_one_shot(
        RETURN_TO_PREFIX,
        RETURN_TO_COOKIE_NAME.as_str(),
        path.to_string(),
        RETURN_TO_MAX_AGE,
    )
    .await
}

/// Take the remembered location, if any, together with headers expiring its cookie
pub async fn take_return_to_from_headers(
    headers: &HeaderMap,
) -> Result<(Option<String>, HeaderMap), SessionError> {
    let (path, response_headers) = take_one_shot::<String>(
        RETURN_TO_PREFIX,
        RETURN_TO_COOKIE_NAME.as_str(),
        headers,
    )
    .await?;

    Ok((path.filter(|p| is_local_path(p)), response_headers))
}

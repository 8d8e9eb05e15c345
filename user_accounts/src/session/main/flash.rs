use http::header::HeaderMap;

use crate::session::config::{FLASH_COOKIE_NAME, FLASH_MAX_AGE};
use crate::session::errors::SessionError;
use crate::session::types::FlashMessage;

use super::one_shot::{put_one_shot, take_one_shot};

const FLASH_PREFIX: &str = "flash";

/// Store flash messages for the next request and return the cookie headers referencing them
pub async fn prepare_flash_cookie(messages: Vec<FlashMessage>) -> Result<HeaderMap, SessionError> {
    tracing::debug!("Setting {} flash message(s)", messages.len());
    put_one_shot(
        FLASH_PREFIX,
        FLASH_COOKIE_NAME.as_str(),
        messages,
        FLASH_MAX_AGE,
    )
    .await
}

/// Take the flash messages referenced by the request cookies
///
/// Messages are removed from the store, so each one is shown exactly once.
/// The returned headers expire the flash cookie and must be added to the
/// response.
pub async fn take_flash_from_headers(
    headers: &HeaderMap,
) -> Result<(Vec<FlashMessage>, HeaderMap), SessionError> {
    let (messages, response_headers) =
        take_one_shot::<Vec<FlashMessage>>(FLASH_PREFIX, FLASH_COOKIE_NAME.as_str(), headers)
            .await?;
    Ok((messages.unwrap_or_default(), response_headers))
}

//! Values parked in the cache store under a random id carried by a cookie,
//! read once and then discarded.

use chrono::{DateTime, Duration, Utc};
use http::header::HeaderMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::session::errors::SessionError;
use crate::storage::{CacheData, GENERIC_CACHE_STORE};
use crate::utils::{
    cookie_value_from_headers, expire_cookie_header, gen_random_string, header_set_cookie,
};

#[derive(Debug, Serialize, Deserialize)]
struct StoredOneShot<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

pub(super) async fn put_one_shot<T: Serialize>(
    prefix: &str,
    cookie_name: &str,
    value: T,
    max_age: u64,
) -> Result<HeaderMap, SessionError> {
    let id = gen_random_string(16)?;
    let stored = StoredOneShot {
        value,
        expires_at: Utc::now() + Duration::seconds(max_age as i64),
    };
    let data = CacheData {
        value: serde_json::to_string(&stored).map_err(|e| SessionError::Storage(e.to_string()))?,
    };

    GENERIC_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(prefix, &id, data, max_age as usize)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, cookie_name, &id, max_age as i64)?;
    Ok(headers)
}

/// Take the value referenced by the request's cookie
///
/// The returned headers expire the cookie whenever one was presented, so the
/// browser stops sending a reference to a consumed entry.
pub(super) async fn take_one_shot<T: DeserializeOwned>(
    prefix: &str,
    cookie_name: &str,
    headers: &HeaderMap,
) -> Result<(Option<T>, HeaderMap), SessionError> {
    let Some(id) = cookie_value_from_headers(headers, cookie_name)? else {
        return Ok((None, HeaderMap::new()));
    };

    let mut store = GENERIC_CACHE_STORE.lock().await;
    let cached = store
        .get(prefix, id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;
    store
        .remove(prefix, id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;
    drop(store);

    let response_headers = expire_cookie_header(cookie_name)?;

    let Some(cached) = cached else {
        tracing::debug!("No {} entry for cookie value", prefix);
        return Ok((None, response_headers));
    };

    let stored: StoredOneShot<T> =
        serde_json::from_str(&cached.value).map_err(|e| SessionError::Storage(e.to_string()))?;

    if stored.expires_at < Utc::now() {
        tracing::debug!("Discarding expired {} entry", prefix);
        return Ok((None, response_headers));
    }

    Ok((Some(stored.value), response_headers))
}

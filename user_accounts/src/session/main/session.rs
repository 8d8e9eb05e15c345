use chrono::{Duration, Utc};
use http::header::HeaderMap;

use crate::session::config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::session::types::{CsrfToken, StoredSession, User as SessionUser};
use crate::storage::GENERIC_CACHE_STORE;
use crate::userdb::{UserSearchField, UserStore};
use crate::utils::{gen_random_string, header_set_cookie};

const SESSION_PREFIX: &str = "session";

/// Prepare a logout response by expiring the session cookie and deleting the session from storage
pub async fn prepare_logout_response(cookies: headers::Cookie) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, SESSION_COOKIE_NAME.as_str(), "", -86400)?;

    if let Some(session_id) = cookies.get(SESSION_COOKIE_NAME.as_str()) {
        delete_session_from_store_by_session_id(session_id).await?;
    }

    Ok(headers)
}

/// Create a new session for the user and return the `Set-Cookie` headers for it
#[tracing::instrument]
pub(crate) async fn create_session_with_uid(user_id: i64) -> Result<HeaderMap, SessionError> {
    let session_id = gen_random_string(32)?;
    let csrf_token = gen_random_string(32)?;
    let expires_at = Utc::now() + Duration::seconds(*SESSION_COOKIE_MAX_AGE as i64);

    let stored_session = StoredSession {
        user_id,
        csrf_token,
        expires_at,
        ttl: *SESSION_COOKIE_MAX_AGE,
    };

    GENERIC_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(
            SESSION_PREFIX,
            &session_id,
            stored_session.try_into()?,
            *SESSION_COOKIE_MAX_AGE as usize,
        )
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        SESSION_COOKIE_NAME.as_str(),
        &session_id,
        *SESSION_COOKIE_MAX_AGE as i64,
    )?;

    tracing::debug!("Created session for user {}", user_id);
    Ok(headers)
}

pub(crate) async fn delete_session_from_store_by_session_id(
    session_id: &str,
) -> Result<(), SessionError> {
    GENERIC_CACHE_STORE
        .lock()
        .await
        .remove(SESSION_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;
    Ok(())
}

/// Load a live session record, discarding it when it has expired
async fn get_stored_session(session_id: &str) -> Result<StoredSession, SessionError> {
    let cached_session = GENERIC_CACHE_STORE
        .lock()
        .await
        .get(SESSION_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?
        .ok_or(SessionError::SessionError)?;

    let stored_session: StoredSession = cached_session.try_into()?;

    if stored_session.expires_at < Utc::now() {
        tracing::debug!("Session expired at {}", stored_session.expires_at);
        delete_session_from_store_by_session_id(session_id).await?;
        return Err(SessionError::SessionExpiredError);
    }

    Ok(stored_session)
}

/// Retrieves the user information from the session
///
/// Fails with `SessionError::SessionError` when the session is unknown or the
/// user it points at no longer exists.
pub async fn get_user_from_session(session_id: &str) -> Result<SessionUser, SessionError> {
    let (user, _) = get_user_and_csrf_token_from_session(session_id).await?;
    Ok(user)
}

pub async fn get_user_and_csrf_token_from_session(
    session_id: &str,
) -> Result<(SessionUser, CsrfToken), SessionError> {
    let stored_session = get_stored_session(session_id).await?;

    let user = UserStore::get_user_by(UserSearchField::Id(stored_session.user_id))
        .await
        .map_err(|e| {
            tracing::error!("Error checking user existence: {}", e);
            SessionError::from(e)
        })?
        .ok_or(SessionError::SessionError)?;

    Ok((
        SessionUser::from(user),
        CsrfToken::new(stored_session.csrf_token),
    ))
}

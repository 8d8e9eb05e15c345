use http::HeaderMap;

use crate::session::{create_session_with_uid, delete_session_from_store_by_session_id};
use crate::userdb::{User, UserSearchField, UserStore, normalize_email, verify_password};

use super::errors::CoordinationError;

const INVALID_CREDENTIALS: &str = "Invalid email/password combination.";

/// Sign in with email and password
///
/// Any session the browser already carries is discarded and a fresh one is
/// issued. Returns the user and the headers carrying the new session cookie.
pub async fn sign_in(
    email: &str,
    password: &str,
    previous_session_id: Option<&str>,
) -> Result<(User, HeaderMap), CoordinationError> {
    let user = UserStore::get_user_by(UserSearchField::Email(normalize_email(email)))
        .await
        .map_err(|e| CoordinationError::Database(e.to_string()))?;

    let user = match user {
        Some(user) if verify_password(password, &user.password_digest) => user,
        _ => {
            return Err(CoordinationError::Authentication(INVALID_CREDENTIALS.to_string()).log());
        }
    };

    if let Some(session_id) = previous_session_id {
        delete_session_from_store_by_session_id(session_id).await?;
    }

    let headers = create_session_with_uid(user.id).await?;

    tracing::info!("User {} signed in", user.id);
    Ok((user, headers))
}

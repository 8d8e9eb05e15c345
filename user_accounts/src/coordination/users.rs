use http::HeaderMap;

use crate::config::USERS_PER_PAGE;
use crate::pagination::Pagination;
use crate::session::{
    User as SessionUser, create_session_with_uid, delete_session_from_store_by_session_id,
};
use crate::userdb::{
    EMAIL_TAKEN_MESSAGE, NewUser, User, UserError, UserParams, UserSearchField, UserStore,
    ValidationErrors, hash_password, normalize_email, validate_user_params,
};

use super::errors::CoordinationError;

/// One page of the user listing
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

pub async fn count_users() -> Result<i64, CoordinationError> {
    UserStore::count_users()
        .await
        .map_err(|e| CoordinationError::Database(e.to_string()))
}

/// Users ordered by id for the requested page, clamped into range
pub async fn list_users_page(requested_page: Option<u32>) -> Result<UserPage, CoordinationError> {
    let total = count_users().await?;
    let pagination = Pagination::new(requested_page, *USERS_PER_PAGE, total.max(0) as u64);

    let users = UserStore::get_users_page(pagination.per_page as i64, pagination.offset() as i64)
        .await
        .map_err(|e| CoordinationError::Database(e.to_string()))?;

    tracing::debug!(
        page = pagination.current_page,
        total_pages = pagination.total_pages,
        "Listing {} users",
        users.len()
    );

    Ok(UserPage { users, pagination })
}

pub async fn get_user(user_id: i64) -> Result<User, CoordinationError> {
    UserStore::get_user_by(UserSearchField::Id(user_id))
        .await
        .map_err(|e| CoordinationError::Database(e.to_string()))?
        .ok_or_else(|| CoordinationError::user_not_found(user_id).log())
}

/// Whether `email` belongs to an account other than `except_id`
async fn email_taken(email: &str, except_id: Option<i64>) -> Result<bool, CoordinationError> {
    if email.is_empty() {
        return Ok(false);
    }

    let existing = UserStore::get_user_by(UserSearchField::Email(email.to_string()))
        .await
        .map_err(|e| CoordinationError::Database(e.to_string()))?;

    Ok(existing.is_some_and(|user| Some(user.id) != except_id))
}

fn taken_error() -> CoordinationError {
    let mut errors = ValidationErrors::default();
    errors.add("email", EMAIL_TAKEN_MESSAGE);
    CoordinationError::Validation(errors)
}

/// Validate the form and store a new account
pub async fn register_user(
    params: &UserParams,
    is_admin: bool,
) -> Result<User, CoordinationError> {
    let email = normalize_email(&params.email);
    let taken = email_taken(&email, None).await?;

    validate_user_params(params, taken)
        .map_err(|errors| CoordinationError::Validation(errors).log())?;

    let password_digest = hash_password(&params.password)?;

    let user = UserStore::insert_user(NewUser {
        name: params.name.trim().to_string(),
        email,
        password_digest,
        is_admin,
    })
    .await
    .map_err(|e| match e {
        UserError::EmailTaken => taken_error().log(),
        e => CoordinationError::from(e),
    })?;

    Ok(user)
}

/// Sign up: create the account and sign the new user in
///
/// Like sign-in, any session the browser already carries is discarded.
/// Returns the new user and the headers carrying the session cookie.
pub async fn create_user(
    params: &UserParams,
    previous_session_id: Option<&str>,
) -> Result<(User, HeaderMap), CoordinationError> {
    let user = register_user(params, false).await?;

    if let Some(session_id) = previous_session_id {
        delete_session_from_store_by_session_id(session_id).await?;
    }

    let headers = create_session_with_uid(user.id).await?;

    tracing::info!("User {} signed up", user.id);
    Ok((user, headers))
}

/// Load the account `user_id` if `actor` may edit it
///
/// The rights check happens before the lookup, so callers without rights
/// cannot learn whether the id exists.
pub async fn authorize_user_edit(
    actor: &SessionUser,
    user_id: i64,
) -> Result<User, CoordinationError> {
    if !(actor.is_admin || actor.id == user_id) {
        tracing::debug!("User {} may not edit user {}", actor.id, user_id);
        return Err(CoordinationError::Unauthorized.log());
    }

    get_user(user_id).await
}

/// Update name, email and password of an account
pub async fn update_user(
    actor: &SessionUser,
    user_id: i64,
    params: &UserParams,
) -> Result<User, CoordinationError> {
    let mut user = authorize_user_edit(actor, user_id).await?;

    let email = normalize_email(&params.email);
    let taken = email_taken(&email, Some(user_id)).await?;

    validate_user_params(params, taken)
        .map_err(|errors| CoordinationError::Validation(errors).log())?;

    user.name = params.name.trim().to_string();
    user.email = email;
    user.password_digest = hash_password(&params.password)?;

    let updated = UserStore::update_user(user).await.map_err(|e| match e {
        UserError::EmailTaken => taken_error().log(),
        UserError::NotFound => CoordinationError::user_not_found(user_id).log(),
        e => CoordinationError::from(e),
    })?;

    tracing::info!("User {} updated by {}", updated.id, actor.id);
    Ok(updated)
}

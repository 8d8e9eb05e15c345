//! user_accounts - Core library for a session-based user account application
//!
//! This crate provides user storage, password credentials, cookie sessions,
//! flash messages, pagination and the coordination functions that implement
//! the account actions (list, show, sign up, edit, update, destroy, sign in).

mod config;
mod coordination;
mod gravatar;
mod pagination;
mod session;
mod storage;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{APP_NAME, USERS_PER_PAGE};

pub use coordination::{
    CoordinationError, UserPage, authorize_user_edit, count_users, create_user, delete_user,
    get_user, list_users_page, register_user, sign_in, update_user,
};

pub use gravatar::{GRAVATAR_EMAILS_URL, gravatar_url};

pub use pagination::{PageItem, Pagination};

pub use session::{
    CsrfToken, FlashKind, FlashMessage, RETURN_TO_COOKIE_NAME, SESSION_COOKIE_NAME, SessionError,
    User as SessionUser, get_user_and_csrf_token_from_session, get_user_from_session,
    prepare_flash_cookie, prepare_logout_response, prepare_return_to_cookie,
    take_flash_from_headers, take_return_to_from_headers,
};

pub use userdb::{FieldError, User as DbUser, UserError, UserParams, ValidationErrors};

pub use utils::{UtilError, cookie_value_from_headers, expire_cookie_header};

/// Initialize the stores used by the account layer
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    userdb::init().await?;
    Ok(())
}

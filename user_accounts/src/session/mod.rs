mod config;
mod errors;
mod main;
mod types;

pub use config::{RETURN_TO_COOKIE_NAME, SESSION_COOKIE_NAME};
pub use errors::SessionError;
pub use main::{
    get_user_and_csrf_token_from_session, get_user_from_session, prepare_flash_cookie,
    prepare_logout_response, prepare_return_to_cookie, take_flash_from_headers,
    take_return_to_from_headers,
};
pub use types::{CsrfToken, FlashKind, FlashMessage, User};

pub(crate) use main::{create_session_with_uid, delete_session_from_store_by_session_id};

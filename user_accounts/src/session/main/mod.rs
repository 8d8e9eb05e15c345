mod flash;
mod one_shot;
mod return_to;
mod session;

pub use flash::{prepare_flash_cookie, take_flash_from_headers};
pub use return_to::{prepare_return_to_cookie, take_return_to_from_headers};
pub use session::{
    get_user_and_csrf_token_from_session, get_user_from_session, prepare_logout_response,
};

pub(crate) use session::{create_session_with_uid, delete_session_from_store_by_session_id};

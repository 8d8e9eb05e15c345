mod errors;
mod password;
mod storage;
mod types;
mod validation;

pub use errors::UserError;
pub(crate) use password::{hash_password, verify_password};
pub(crate) use storage::UserStore;
pub use types::User;
pub(crate) use types::{NewUser, UserSearchField};
pub use validation::{FieldError, UserParams, ValidationErrors};
pub(crate) use validation::{EMAIL_TAKEN_MESSAGE, normalize_email, validate_user_params};

pub(crate) async fn init() -> Result<(), UserError> {
    UserStore::init().await
}

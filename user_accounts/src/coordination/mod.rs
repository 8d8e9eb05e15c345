//! Account actions
//!
//! Functions here combine the user store, password credentials and sessions
//! into the operations the web layer exposes. Authorization decisions are made
//! here, before any target record is loaded for a caller without rights.
//!
//! - `users`: listing, lookup, sign-up and profile updates
//! - `admin`: administrator-only operations
//! - `sessions`: email/password sign-in

mod admin;
mod errors;
mod sessions;
mod users;

pub use admin::delete_user;
pub use errors::CoordinationError;
pub use sessions::sign_in;
pub use users::{
    UserPage, authorize_user_edit, count_users, create_user, get_user, list_users_page,
    register_user, update_user,
};

//! user_accounts_axum - Axum integration for the user_accounts library
//!
//! Provides the page handlers, askama templates, the [`AuthUser`] extractor,
//! the [`require_sign_in`] guard and a ready-made router for the account
//! application.
//!
//! # Example
//!
//! ```no_run
//! use user_accounts_axum::app_router;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! user_accounts_axum::init().await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app_router()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod middleware;
mod pages;
mod router;
mod session;
mod static_files;

pub use config::{CSRF_PROTECTION, DISPLAY_TIMEZONE, ROOT_PATH, SIGNIN_PATH, USERS_PATH};
pub use error::IntoResponseError;
pub use middleware::require_sign_in;
pub use router::{app_router, app_router_no_trace};
pub use session::{AuthRejection, AuthUser};

pub use user_accounts::init;

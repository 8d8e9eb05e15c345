mod layout;
mod sessions;
mod static_pages;
mod users;

use axum::response::{IntoResponse, Redirect, Response};
use http::{HeaderMap, StatusCode};

use crate::error::IntoResponseError;
use crate::session::append_headers;
use user_accounts::{FlashMessage, prepare_flash_cookie};

pub(crate) use layout::PageContext;
pub(crate) use sessions::{sign_in, sign_in_form, sign_out, sign_out_delete};
pub(crate) use static_pages::{about, contact, fallback, help, home};
pub(crate) use users::{
    create_user, destroy_user, edit_user, list_users, new_user, show_user, update_user,
    user_method_override,
};

/// Redirect carrying a flash message for the next page
pub(super) async fn redirect_with_flash(
    mut headers: HeaderMap,
    location: &str,
    message: FlashMessage,
) -> Result<Response, (StatusCode, String)> {
    let flash_headers = prepare_flash_cookie(vec![message])
        .await
        .into_response_error()?;
    append_headers(&mut headers, flash_headers);
    Ok((headers, Redirect::to(location)).into_response())
}

/// Plain redirect that still expires a flash cookie consumed by this request
pub(super) fn redirect_to(page: PageContext, location: &str) -> Response {
    let mut headers = HeaderMap::new();
    page.attach(&mut headers);
    (headers, Redirect::to(location)).into_response()
}

/// Numeric ids only; anything else is treated as an unknown page
pub(super) fn parse_user_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

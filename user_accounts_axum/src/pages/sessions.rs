use askama::Template;
use axum::{
    Form,
    extract::rejection::FormRejection,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{TypedHeader, headers};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;

use super::layout::{LayoutContext, PageContext};
use super::redirect_to;
use crate::config::{ROOT_PATH, user_path};
use crate::error::IntoResponseError;
use crate::session::{AuthUser, append_headers};
use user_accounts::{
    CoordinationError, FlashMessage, SESSION_COOKIE_NAME, cookie_value_from_headers,
    prepare_logout_response, take_return_to_from_headers,
};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SignInForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SignOutForm {
    #[serde(default)]
    authenticity_token: Option<String>,
}

#[derive(Template)]
#[template(path = "sessions_new.j2", escape = "html")]
struct SignInTemplate {
    layout: LayoutContext,
    email: String,
}

/// Sign-in form; signed in users go to their profile instead
pub(crate) async fn sign_in_form(mut page: PageContext) -> Result<Response, (StatusCode, String)> {
    if let Some(user) = &page.user {
        let location = user_path(user.id);
        return Ok(redirect_to(page, &location));
    }

    let template = SignInTemplate {
        layout: page.layout("Sign in"),
        email: String::new(),
    };
    page.render(StatusCode::OK, template)
}

pub(crate) async fn sign_in(
    mut page: PageContext,
    request_headers: HeaderMap,
    Form(form): Form<SignInForm>,
) -> Result<Response, (StatusCode, String)> {
    let previous_session_id = cookie_value_from_headers(&request_headers, SESSION_COOKIE_NAME.as_str())
        .ok()
        .flatten();

    match user_accounts::sign_in(&form.email, &form.password, previous_session_id).await {
        Ok((user, mut headers)) => {
            let (return_to, return_to_headers) = take_return_to_from_headers(&request_headers)
                .await
                .into_response_error()?;
            append_headers(&mut headers, return_to_headers);
            page.attach(&mut headers);

            let location = return_to.unwrap_or_else(|| user_path(user.id));
            tracing::debug!("Signed in user {} continues to {}", user.id, location);
            Ok((headers, Redirect::to(&location)).into_response())
        }
        Err(CoordinationError::Authentication(message)) => {
            // The session user, if any, is unchanged by a failed attempt
            page.flash_now(FlashMessage::error(message));
            let template = SignInTemplate {
                layout: page.layout("Sign in"),
                email: form.email,
            };
            page.render(StatusCode::OK, template)
        }
        Err(e) => Err(e).into_response_error(),
    }
}

async fn sign_out_response(
    page: PageContext,
    cookies: Option<TypedHeader<headers::Cookie>>,
) -> Result<Response, (StatusCode, String)> {
    let mut headers = match cookies {
        Some(TypedHeader(cookies)) => prepare_logout_response(cookies)
            .await
            .into_response_error()?,
        None => HeaderMap::new(),
    };
    page.attach(&mut headers);

    Ok((headers, Redirect::to(ROOT_PATH)).into_response())
}

/// GET `/signout`
pub(crate) async fn sign_out(
    page: PageContext,
    cookies: Option<TypedHeader<headers::Cookie>>,
) -> Result<Response, (StatusCode, String)> {
    sign_out_response(page, cookies).await
}

/// DELETE `/sessions`; a signed in user must prove the request is theirs
pub(crate) async fn sign_out_delete(
    auth_user: Option<AuthUser>,
    page: PageContext,
    cookies: Option<TypedHeader<headers::Cookie>>,
    form: Result<Form<SignOutForm>, FormRejection>,
) -> Result<Response, (StatusCode, String)> {
    if let Some(auth_user) = auth_user {
        let token = form.ok().and_then(|Form(form)| form.authenticity_token);
        auth_user.verify_form_token(token.as_deref())?;
    }

    sign_out_response(page, cookies).await
}

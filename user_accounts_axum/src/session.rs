use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, StatusCode, Uri, request::Parts};
use subtle::ConstantTimeEq;

use super::config::{CSRF_PROTECTION, SIGN_IN_NOTICE, SIGNIN_PATH};
use user_accounts::{
    FlashMessage, SESSION_COOKIE_NAME, SessionError, SessionUser, cookie_value_from_headers,
    get_user_and_csrf_token_from_session, prepare_flash_cookie, prepare_return_to_cookie,
};

/// Authenticated user information, available as an Axum extractor
///
/// Extraction looks for a user already placed in the request extensions by
/// [`require_sign_in`](crate::require_sign_in) and otherwise resolves the
/// session cookie itself. For state-changing methods the `X-CSRF-Token`
/// header is verified when present; form submissions carry the token in the
/// body instead and are checked by the handler with
/// [`AuthUser::verify_form_token`].
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use user_accounts_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.name)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// Database id of the user
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// CSRF token associated with the user's session
    pub csrf_token: String,
    /// Whether CSRF token was verified via header
    pub csrf_via_header_verified: bool,
}

impl From<&AuthUser> for SessionUser {
    fn from(auth_user: &AuthUser) -> Self {
        SessionUser {
            id: auth_user.id,
            name: auth_user.name.clone(),
            email: auth_user.email.clone(),
            is_admin: auth_user.is_admin,
            created_at: auth_user.created_at,
            updated_at: auth_user.updated_at,
        }
    }
}

impl From<SessionUser> for AuthUser {
    fn from(session_user: SessionUser) -> Self {
        AuthUser {
            id: session_user.id,
            name: session_user.name,
            email: session_user.email,
            is_admin: session_user.is_admin,
            created_at: session_user.created_at,
            updated_at: session_user.updated_at,
            csrf_token: String::new(),
            csrf_via_header_verified: false,
        }
    }
}

impl AuthUser {
    /// Check the `authenticity_token` submitted in a form body
    ///
    /// Passes when the header check already succeeded or protection is off.
    pub fn verify_form_token(&self, token: Option<&str>) -> Result<(), (StatusCode, String)> {
        if !*CSRF_PROTECTION || self.csrf_via_header_verified {
            return Ok(());
        }

        match token {
            Some(token) if bool::from(token.as_bytes().ct_eq(self.csrf_token.as_bytes())) => {
                tracing::trace!("CSRF token via form body verified.");
                Ok(())
            }
            _ => {
                tracing::warn!("CSRF token missing or mismatched in form submission for user {}", self.id);
                Err((
                    StatusCode::FORBIDDEN,
                    "Invalid authenticity token".to_string(),
                ))
            }
        }
    }
}

/// Why a request could not be tied to a signed in user
#[derive(Debug)]
pub(crate) enum AuthFailure {
    NotSignedIn,
    CsrfMismatch,
    Internal(String),
}

impl From<SessionError> for AuthFailure {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::SessionError
            | SessionError::SessionExpiredError
            | SessionError::Cookie(_)
            | SessionError::Utils(_) => Self::NotSignedIn,
            e => {
                tracing::error!("Failed to resolve session: {}", e);
                Self::Internal(e.to_string())
            }
        }
    }
}

fn is_state_changing(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::DELETE
        || method == Method::PATCH
}

fn is_form_like(headers: &HeaderMap) -> bool {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| {
            ct.starts_with("application/x-www-form-urlencoded")
                || ct.starts_with("multipart/form-data")
        })
}

/// Resolve the session user and run the header part of the CSRF check
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    method: &Method,
) -> Result<AuthUser, AuthFailure> {
    let session_id = cookie_value_from_headers(headers, SESSION_COOKIE_NAME.as_str())
        .map_err(|e| {
            tracing::debug!("Unreadable cookie header: {}", e);
            AuthFailure::NotSignedIn
        })?
        .ok_or(AuthFailure::NotSignedIn)?;

    let (session_user, csrf_token) = get_user_and_csrf_token_from_session(session_id).await?;

    let mut auth_user = AuthUser::from(session_user);
    auth_user.csrf_token = csrf_token.as_str().to_string();

    if !*CSRF_PROTECTION || !is_state_changing(method) {
        return Ok(auth_user);
    }

    if let Some(header_token) = headers.get("X-CSRF-Token").and_then(|h| h.to_str().ok()) {
        if header_token
            .as_bytes()
            .ct_eq(auth_user.csrf_token.as_bytes())
            .into()
        {
            auth_user.csrf_via_header_verified = true;
            tracing::trace!("CSRF token via X-CSRF-Token header verified.");
        } else {
            tracing::warn!("CSRF token mismatch (X-CSRF-Token) for user {}", auth_user.id);
            return Err(AuthFailure::CsrfMismatch);
        }
    } else if is_form_like(headers) {
        tracing::trace!("X-CSRF-Token header not found, form body must carry the token");
    } else {
        tracing::warn!(
            "CSRF protection: X-CSRF-Token header missing for state-changing request with non-form Content-Type. Rejecting."
        );
        return Err(AuthFailure::CsrfMismatch);
    }

    Ok(auth_user)
}

/// Current user for page rendering, without any CSRF requirement
pub(crate) async fn current_user(headers: &HeaderMap) -> Result<Option<AuthUser>, AuthFailure> {
    match authenticate(headers, &Method::GET).await {
        Ok(user) => Ok(Some(user)),
        Err(AuthFailure::NotSignedIn) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Append every header of `extra` to `headers`, keeping repeated Set-Cookie lines
pub(crate) fn append_headers(headers: &mut HeaderMap, extra: HeaderMap) {
    let mut last_name = None;
    for (name, value) in extra {
        if let Some(name) = name {
            last_name = Some(name);
        }
        if let Some(name) = &last_name {
            headers.append(name.clone(), value);
        }
    }
}

/// Redirect to the sign-in page with a notice, remembering GET targets
pub(crate) async fn sign_in_redirect(method: &Method, uri: &Uri) -> Response {
    let mut headers = HeaderMap::new();

    match prepare_flash_cookie(vec![FlashMessage::notice(SIGN_IN_NOTICE)]).await {
        Ok(flash_headers) => append_headers(&mut headers, flash_headers),
        Err(e) => tracing::error!("Failed to set sign-in notice: {}", e),
    }

    if method == Method::GET {
        if let Some(path_and_query) = uri.path_and_query() {
            match prepare_return_to_cookie(path_and_query.as_str()).await {
                Ok(return_to_headers) => append_headers(&mut headers, return_to_headers),
                Err(e) => tracing::warn!("Not remembering {}: {}", path_and_query, e),
            }
        }
    }

    tracing::debug!("Redirecting {} {} to {}", method, uri, SIGNIN_PATH);
    (headers, Redirect::to(SIGNIN_PATH)).into_response()
}

pub(crate) async fn failure_response(failure: AuthFailure, method: &Method, uri: &Uri) -> Response {
    match failure {
        AuthFailure::NotSignedIn => sign_in_redirect(method, uri).await,
        AuthFailure::CsrfMismatch => {
            (StatusCode::FORBIDDEN, "Invalid authenticity token").into_response()
        }
        AuthFailure::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
    }
}

/// Rejection of the [`AuthUser`] extractor, already turned into a response
pub struct AuthRejection(Response);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        match authenticate(&parts.headers, &parts.method).await {
            Ok(user) => Ok(user),
            Err(failure) => Err(AuthRejection(
                failure_response(failure, &parts.method, &parts.uri).await,
            )),
        }
    }
}

/// `Option<AuthUser>`: `None` for visitors, a rejection only for forged or
/// failing requests
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(Some(user.clone()));
        }

        match authenticate(&parts.headers, &parts.method).await {
            Ok(user) => Ok(Some(user)),
            Err(AuthFailure::NotSignedIn) => Ok(None),
            Err(failure) => Err(AuthRejection(
                failure_response(failure, &parts.method, &parts.uri).await,
            )),
        }
    }
}

use askama::Template;
use axum::{
    extract::FromRequestParts,
    response::{Html, IntoResponse, Response},
};
use http::{HeaderMap, StatusCode, request::Parts};

use crate::config::{edit_user_path, user_path};
use crate::error::IntoResponseError;
use crate::session::{AuthFailure, AuthUser, append_headers, current_user};
use user_accounts::{APP_NAME, FlashMessage, take_flash_from_headers};

/// Navigation entry for the signed in user
#[derive(Debug, Clone)]
pub(crate) struct NavUser {
    pub(crate) profile_path: String,
    pub(crate) settings_path: String,
}

/// Values every page hands to `layout.j2`
#[derive(Debug, Clone)]
pub(crate) struct LayoutContext {
    pub(crate) full_title: String,
    pub(crate) current_user: Option<NavUser>,
    pub(crate) flash: Vec<FlashMessage>,
    pub(crate) csrf_token: String,
}

pub(crate) fn full_title(title: &str) -> String {
    if title.is_empty() {
        APP_NAME.to_string()
    } else {
        format!("{} | {}", *APP_NAME, title)
    }
}

/// Request-scoped page state: the optional user and the flash taken for display
///
/// Taking the flash consumes it; the expiring cookie is sent back with
/// whatever response the handler produces through [`PageContext::render`] or
/// [`PageContext::attach`].
pub(crate) struct PageContext {
    pub(crate) user: Option<AuthUser>,
    flash: Vec<FlashMessage>,
    headers: HeaderMap,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<AuthUser>() {
            Some(user) => Some(user.clone()),
            None => current_user(&parts.headers).await.map_err(|e| match e {
                AuthFailure::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
                other => (StatusCode::INTERNAL_SERVER_ERROR, format!("{other:?}")),
            })?,
        };

        let (flash, headers) = match take_flash_from_headers(&parts.headers).await {
            Ok(taken) => taken,
            Err(e) => {
                tracing::error!("Failed to read flash messages: {}", e);
                (Vec::new(), HeaderMap::new())
            }
        };

        Ok(Self {
            user,
            flash,
            headers,
        })
    }
}

impl PageContext {
    /// Show a message on the page being rendered, without a redirect
    pub(crate) fn flash_now(&mut self, message: FlashMessage) {
        self.flash.push(message);
    }

    /// Build the layout values, moving the pending flash into them
    pub(crate) fn layout(&mut self, title: &str) -> LayoutContext {
        LayoutContext {
            full_title: full_title(title),
            current_user: self.user.as_ref().map(|user| NavUser {
                profile_path: user_path(user.id),
                settings_path: edit_user_path(user.id),
            }),
            flash: std::mem::take(&mut self.flash),
            csrf_token: self
                .user
                .as_ref()
                .map(|user| user.csrf_token.clone())
                .unwrap_or_default(),
        }
    }

    /// Render a template with the given status, expiring a consumed flash cookie
    pub(crate) fn render<T: Template>(
        self,
        status: StatusCode,
        template: T,
    ) -> Result<Response, (StatusCode, String)> {
        let html = template.render().into_response_error()?;
        Ok((status, self.headers, Html(html)).into_response())
    }

    /// Add the flash cookie expiry to headers of a response built elsewhere
    pub(crate) fn attach(self, headers: &mut HeaderMap) {
        append_headers(headers, self.headers);
    }
}

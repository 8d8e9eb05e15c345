use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;

use super::layout::{LayoutContext, PageContext};
use super::static_pages::not_found_page;
use super::{parse_user_id, redirect_to, redirect_with_flash};
use crate::config::{
    DISPLAY_TIMEZONE, GRAVATAR_SIZE_LIST, GRAVATAR_SIZE_PROFILE, ROOT_PATH, USERS_PATH, user_path,
};
use crate::error::IntoResponseError;
use crate::session::AuthUser;
use user_accounts::{
    APP_NAME, CoordinationError, DbUser, FlashMessage, GRAVATAR_EMAILS_URL, Pagination,
    SESSION_COOKIE_NAME, SessionUser, UserParams, ValidationErrors, authorize_user_edit,
    cookie_value_from_headers, delete_user, get_user, gravatar_url, list_users_page,
};

/// Fields of the sign-up and profile forms
///
/// `_method` carries the override used by browsers for PUT and DELETE.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserForm {
    #[serde(rename = "_method", default)]
    method: Option<String>,
    #[serde(default)]
    authenticity_token: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    password_confirmation: String,
}

impl UserForm {
    fn params(&self) -> UserParams {
        UserParams {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        }
    }
}

/// Values put back into a re-rendered form; passwords never are
#[derive(Debug, Default)]
struct FormValues {
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<String>,
}

struct UserEntry {
    name: String,
    path: String,
    gravatar: String,
    deletable: bool,
}

struct PageLink {
    label: String,
    href: String,
    current: bool,
    gap: bool,
}

struct PaginationView {
    previous_href: Option<String>,
    next_href: Option<String>,
    links: Vec<PageLink>,
}

fn page_href(page: u32) -> String {
    format!("{USERS_PATH}?page={page}")
}

impl PaginationView {
    fn build(pagination: &Pagination) -> Option<Self> {
        if !pagination.needs_links() {
            return None;
        }

        let links = pagination
            .page_items()
            .into_iter()
            .map(|item| match item.number() {
                Some(n) => PageLink {
                    label: n.to_string(),
                    href: page_href(n),
                    current: n == pagination.current_page,
                    gap: false,
                },
                None => PageLink {
                    label: String::new(),
                    href: String::new(),
                    current: false,
                    gap: true,
                },
            })
            .collect();

        Some(Self {
            previous_href: pagination.previous_page().map(page_href),
            next_href: pagination.next_page().map(page_href),
            links,
        })
    }
}

#[derive(Template)]
#[template(path = "users_index.j2", escape = "html")]
struct IndexTemplate {
    layout: LayoutContext,
    entries: Vec<UserEntry>,
    pagination: Option<PaginationView>,
}

#[derive(Template)]
#[template(path = "users_show.j2", escape = "html")]
struct ShowTemplate {
    layout: LayoutContext,
    name: String,
    gravatar: String,
    member_since: String,
}

#[derive(Template)]
#[template(path = "users_new.j2", escape = "html")]
struct NewTemplate {
    layout: LayoutContext,
    form: FormValues,
    errors: ValidationErrors,
}

#[derive(Template)]
#[template(path = "users_edit.j2", escape = "html")]
struct EditTemplate {
    layout: LayoutContext,
    user_id: i64,
    form_action: String,
    form: FormValues,
    errors: ValidationErrors,
    gravatar: String,
    gravatar_emails_url: &'static str,
}

fn member_since(created_at: DateTime<Utc>) -> String {
    created_at
        .with_timezone(&*DISPLAY_TIMEZONE)
        .format("%B %-d, %Y")
        .to_string()
}

/// Form body of a state-changing request; DELETE requests may have none
fn form_or_default(form: Result<Form<UserForm>, FormRejection>) -> UserForm {
    match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!("No usable form body: {}", e);
            UserForm::default()
        }
    }
}

pub(crate) async fn list_users(
    auth_user: AuthUser,
    mut page: PageContext,
    Query(query): Query<PageQuery>,
) -> Result<Response, (StatusCode, String)> {
    let requested = query.page.as_deref().and_then(|p| p.parse::<u32>().ok());
    let user_page = list_users_page(requested).await.into_response_error()?;

    let entries = user_page
        .users
        .iter()
        .map(|user| UserEntry {
            name: user.name.clone(),
            path: user_path(user.id),
            gravatar: gravatar_url(&user.email, GRAVATAR_SIZE_LIST),
            deletable: auth_user.is_admin && user.id != auth_user.id,
        })
        .collect();

    let template = IndexTemplate {
        layout: page.layout("All users"),
        entries,
        pagination: PaginationView::build(&user_page.pagination),
    };
    page.render(StatusCode::OK, template)
}

pub(crate) async fn show_user(
    mut page: PageContext,
    Path(raw_id): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let Some(user_id) = parse_user_id(&raw_id) else {
        return not_found_page(page);
    };

    let user = match get_user(user_id).await {
        Ok(user) => user,
        Err(CoordinationError::ResourceNotFound { .. }) => return not_found_page(page),
        Err(e) => return Err(e).into_response_error(),
    };

    let template = ShowTemplate {
        layout: page.layout(&user.name),
        gravatar: gravatar_url(&user.email, GRAVATAR_SIZE_PROFILE),
        member_since: member_since(user.created_at),
        name: user.name,
    };
    page.render(StatusCode::OK, template)
}

pub(crate) async fn new_user(mut page: PageContext) -> Result<Response, (StatusCode, String)> {
    let template = NewTemplate {
        layout: page.layout("Sign up"),
        form: FormValues::default(),
        errors: ValidationErrors::default(),
    };
    page.render(StatusCode::OK, template)
}

pub(crate) async fn create_user(
    mut page: PageContext,
    request_headers: HeaderMap,
    Form(form): Form<UserForm>,
) -> Result<Response, (StatusCode, String)> {
    let previous_session_id = cookie_value_from_headers(&request_headers, SESSION_COOKIE_NAME.as_str())
        .ok()
        .flatten();

    match user_accounts::create_user(&form.params(), previous_session_id).await {
        Ok((user, session_headers)) => {
            redirect_with_flash(
                session_headers,
                &user_path(user.id),
                FlashMessage::success(format!("Welcome to the {}!", *APP_NAME)),
            )
            .await
        }
        Err(CoordinationError::Validation(errors)) => {
            let template = NewTemplate {
                layout: page.layout("Sign up"),
                form: FormValues {
                    name: form.name,
                    email: form.email,
                },
                errors,
            };
            page.render(StatusCode::OK, template)
        }
        Err(e) => Err(e).into_response_error(),
    }
}

fn edit_template(
    page: &mut PageContext,
    user_id: i64,
    form: FormValues,
    errors: ValidationErrors,
) -> EditTemplate {
    EditTemplate {
        layout: page.layout("Edit user"),
        user_id,
        form_action: user_path(user_id),
        gravatar: gravatar_url(&form.email, GRAVATAR_SIZE_PROFILE),
        form,
        errors,
        gravatar_emails_url: GRAVATAR_EMAILS_URL,
    }
}

pub(crate) async fn edit_user(
    auth_user: AuthUser,
    mut page: PageContext,
    Path(raw_id): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let Some(user_id) = parse_user_id(&raw_id) else {
        return not_found_page(page);
    };

    let user: DbUser = match authorize_user_edit(&SessionUser::from(&auth_user), user_id).await {
        Ok(user) => user,
        Err(CoordinationError::Unauthorized) => return Ok(redirect_to(page, ROOT_PATH)),
        Err(CoordinationError::ResourceNotFound { .. }) => return not_found_page(page),
        Err(e) => return Err(e).into_response_error(),
    };

    let form = FormValues {
        name: user.name,
        email: user.email,
    };
    let template = edit_template(&mut page, user_id, form, ValidationErrors::default());
    page.render(StatusCode::OK, template)
}

async fn apply_update(
    auth_user: AuthUser,
    mut page: PageContext,
    raw_id: &str,
    form: UserForm,
) -> Result<Response, (StatusCode, String)> {
    auth_user.verify_form_token(form.authenticity_token.as_deref())?;

    let Some(user_id) = parse_user_id(raw_id) else {
        return not_found_page(page);
    };

    let actor = SessionUser::from(&auth_user);
    match user_accounts::update_user(&actor, user_id, &form.params()).await {
        Ok(user) => {
            redirect_with_flash(
                HeaderMap::new(),
                &user_path(user.id),
                FlashMessage::success("Profile updated."),
            )
            .await
        }
        Err(CoordinationError::Validation(errors)) => {
            let values = FormValues {
                name: form.name,
                email: form.email,
            };
            let template = edit_template(&mut page, user_id, values, errors);
            page.render(StatusCode::OK, template)
        }
        Err(CoordinationError::Unauthorized) => Ok(redirect_to(page, ROOT_PATH)),
        Err(CoordinationError::ResourceNotFound { .. }) => not_found_page(page),
        Err(e) => Err(e).into_response_error(),
    }
}

async fn apply_destroy(
    auth_user: AuthUser,
    page: PageContext,
    raw_id: &str,
    form: UserForm,
) -> Result<Response, (StatusCode, String)> {
    auth_user.verify_form_token(form.authenticity_token.as_deref())?;

    let Some(user_id) = parse_user_id(raw_id) else {
        return not_found_page(page);
    };

    match delete_user(&SessionUser::from(&auth_user), user_id).await {
        Ok(()) => {
            redirect_with_flash(
                HeaderMap::new(),
                USERS_PATH,
                FlashMessage::success("User destroyed."),
            )
            .await
        }
        Err(CoordinationError::Unauthorized) => Ok(redirect_to(page, ROOT_PATH)),
        Err(CoordinationError::SelfDeletion) => {
            redirect_with_flash(
                HeaderMap::new(),
                USERS_PATH,
                FlashMessage::error("Administrators cannot delete themselves."),
            )
            .await
        }
        Err(CoordinationError::ResourceNotFound { .. }) => not_found_page(page),
        Err(e) => Err(e).into_response_error(),
    }
}

pub(crate) async fn update_user(
    auth_user: AuthUser,
    page: PageContext,
    Path(raw_id): Path<String>,
    form: Result<Form<UserForm>, FormRejection>,
) -> Result<Response, (StatusCode, String)> {
    apply_update(auth_user, page, &raw_id, form_or_default(form)).await
}

pub(crate) async fn destroy_user(
    auth_user: AuthUser,
    page: PageContext,
    Path(raw_id): Path<String>,
    form: Result<Form<UserForm>, FormRejection>,
) -> Result<Response, (StatusCode, String)> {
    apply_destroy(auth_user, page, &raw_id, form_or_default(form)).await
}

/// POST with `_method=put|patch|delete`, as sent by the HTML forms
pub(crate) async fn user_method_override(
    auth_user: AuthUser,
    page: PageContext,
    Path(raw_id): Path<String>,
    form: Result<Form<UserForm>, FormRejection>,
) -> Result<Response, (StatusCode, String)> {
    let form = form_or_default(form);
    let method = form.method.as_deref().map(str::to_ascii_lowercase);

    match method.as_deref() {
        Some("put") | Some("patch") => apply_update(auth_user, page, &raw_id, form).await,
        Some("delete") => apply_destroy(auth_user, page, &raw_id, form).await,
        other => {
            tracing::debug!("Unsupported method override {:?} for user {}", other, raw_id);
            let mut headers = HeaderMap::new();
            page.attach(&mut headers);
            Ok((
                StatusCode::METHOD_NOT_ALLOWED,
                headers,
                "Method not allowed".to_string(),
            )
                .into_response())
        }
    }
}

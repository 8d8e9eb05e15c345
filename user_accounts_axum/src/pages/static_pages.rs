use askama::Template;
use axum::response::Response;
use http::StatusCode;

use super::layout::{LayoutContext, PageContext};
use user_accounts::APP_NAME;

#[derive(Template)]
#[template(path = "home.j2", escape = "html")]
struct HomeTemplate {
    layout: LayoutContext,
    app_name: String,
}

#[derive(Template)]
#[template(path = "static_page.j2", escape = "html")]
struct StaticPageTemplate {
    layout: LayoutContext,
    heading: &'static str,
    paragraphs: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "not_found.j2", escape = "html")]
struct NotFoundTemplate {
    layout: LayoutContext,
}

pub(crate) async fn home(mut page: PageContext) -> Result<Response, (StatusCode, String)> {
    let template = HomeTemplate {
        layout: page.layout("Home"),
        app_name: APP_NAME.to_string(),
    };
    page.render(StatusCode::OK, template)
}

fn static_page(
    mut page: PageContext,
    title: &str,
    heading: &'static str,
    paragraphs: Vec<&'static str>,
) -> Result<Response, (StatusCode, String)> {
    let template = StaticPageTemplate {
        layout: page.layout(title),
        heading,
        paragraphs,
    };
    page.render(StatusCode::OK, template)
}

pub(crate) async fn help(page: PageContext) -> Result<Response, (StatusCode, String)> {
    static_page(
        page,
        "Help",
        "Help",
        vec![
            "Sign up to get an account, then sign in with your email and password.",
            "Your profile picture comes from Gravatar and follows the email address on your account.",
        ],
    )
}

pub(crate) async fn about(page: PageContext) -> Result<Response, (StatusCode, String)> {
    static_page(
        page,
        "About",
        "About Us",
        vec!["A sample application showing user sign up, sign in and account management."],
    )
}

pub(crate) async fn contact(page: PageContext) -> Result<Response, (StatusCode, String)> {
    static_page(
        page,
        "Contact",
        "Contact",
        vec!["Contact the site administrator with questions about your account."],
    )
}

/// 404 page inside the regular layout
pub(crate) fn not_found_page(mut page: PageContext) -> Result<Response, (StatusCode, String)> {
    let template = NotFoundTemplate {
        layout: page.layout("Not found"),
    };
    page.render(StatusCode::NOT_FOUND, template)
}

pub(crate) async fn fallback(page: PageContext) -> Result<Response, (StatusCode, String)> {
    not_found_page(page)
}

use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::Response,
};

use crate::error::IntoResponseError;

const APP_CSS: &str = include_str!("../static/app.css");

pub(crate) async fn serve_app_css() -> Result<Response, (StatusCode, String)> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/css")
        .body(APP_CSS.to_string().into())
        .into_response_error()
}

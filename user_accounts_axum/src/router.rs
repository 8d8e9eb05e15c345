//! Router for every page of the application

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::middleware::require_sign_in;
use super::pages;
use super::static_files::serve_app_css;

/// Create the application router with HTTP request tracing
///
/// Routes:
/// - `/`, `/contact`, `/about`, `/help`: static pages
/// - `/signup`, `/users/new`: sign-up form, `POST /users` creates the account
/// - `/users` (sign-in required), `/users/{id}`, `/users/{id}/edit`
/// - `/signin`, `POST /sessions`, `/signout`, `DELETE /sessions`
/// - `/assets/app.css`
///
/// Protected method routes are guarded by [`require_sign_in`]; methods added
/// after the guard's `route_layer` stay public.
pub fn app_router() -> Router {
    app_router_no_trace().layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(true),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`app_router`] without the HTTP tracing middleware
pub fn app_router_no_trace() -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/contact", get(pages::contact))
        .route("/about", get(pages::about))
        .route("/help", get(pages::help))
        .route("/signup", get(pages::new_user))
        .route("/signin", get(pages::sign_in_form))
        .route("/signout", get(pages::sign_out))
        .route(
            "/sessions",
            post(pages::sign_in).delete(pages::sign_out_delete),
        )
        .route(
            "/users",
            get(pages::list_users)
                .route_layer(from_fn(require_sign_in))
                .post(pages::create_user),
        )
        .route("/users/new", get(pages::new_user))
        .route(
            "/users/{id}",
            post(pages::user_method_override)
                .put(pages::update_user)
                .patch(pages::update_user)
                .delete(pages::destroy_user)
                .route_layer(from_fn(require_sign_in))
                .get(pages::show_user),
        )
        .route(
            "/users/{id}/edit",
            get(pages::edit_user).route_layer(from_fn(require_sign_in)),
        )
        .route("/assets/app.css", get(serve_app_css))
        .fallback(pages::fallback)
}

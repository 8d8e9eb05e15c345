use axum::{extract::Request, middleware::Next, response::Response};

use super::session::{authenticate, failure_response};

/// Guard for pages that require a signed in user
///
/// Visitors are redirected to the sign-in page with a notice, and GET
/// targets are remembered for forwarding after sign-in. A forged
/// state-changing request gets 403. On success the [`AuthUser`](crate::AuthUser)
/// is stored in the request extensions, where the extractor picks it up.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, middleware::from_fn, routing::get};
/// use user_accounts_axum::{AuthUser, require_sign_in};
///
/// async fn dashboard(user: AuthUser) -> String {
///     format!("Hello, {}!", user.name)
/// }
///
/// let app: Router = Router::new()
///     .route("/dashboard", get(dashboard).route_layer(from_fn(require_sign_in)));
/// ```
pub async fn require_sign_in(mut req: Request, next: Next) -> Response {
    match authenticate(req.headers(), req.method()).await {
        Ok(user) => {
            tracing::trace!("User {} passed the sign-in guard", user.id);
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(failure) => failure_response(failure, req.method(), req.uri()).await,
    }
}

//! Handlers of all OAuth2 functions.

use std::sync::Arc;

use axum::{Extension, Router, response::IntoResponse, routing};
use tera::Tera;

use super::State;

mod api;
pub mod middleware;
pub(crate) mod request;
pub(crate) mod response;
mod template;

/// The scope identifiers this authorization server recognizes.
pub const SUPPORTED_SCOPES: &'static [&'static str] =
    &["profile", "email", "symbolic_name", "tokens", "reputation"];

/// To register all OAuth2 relative URIs.
pub fn new_service(state: &State) -> Router {
    let mut tera = Tera::default();
    match state.templates.get("login") {
        None => match tera.add_raw_template(api::TMPL_LOGIN, template::LOGIN) {
            Err(e) => panic!("login default template error: {}", e),
            Ok(_) => (),
        },
        Some(template) => match tera.add_template_file(template.as_str(), Some(api::TMPL_LOGIN)) {
            Err(e) => panic!("login template file {} error: {}", template.as_str(), e),
            Ok(_) => (),
        },
    }
    match state.templates.get("grant") {
        None => match tera.add_raw_template(api::TMPL_GRANT, template::GRANT) {
            Err(e) => panic!("grant default template error: {}", e),
            Ok(_) => (),
        },
        Some(template) => match tera.add_template_file(template.as_str(), Some(api::TMPL_GRANT)) {
            Err(e) => panic!("grant template file {} error: {}", template.as_str(), e),
            Ok(_) => (),
        },
    }

    Router::new()
        .route("/auth", routing::get(api::get_auth))
        .route("/login", routing::get(api::get_login).post(api::post_login))
        .route(
            "/authorize",
            routing::get(api::authorize).post(api::authorize),
        )
        .route("/token", routing::post(api::post_token))
        .route("/refresh", routing::post(api::post_refresh))
        .route("/userinfo", routing::get(api::get_userinfo))
        .route("/revoke", routing::post(api::post_revoke))
        .route("/redirect", routing::get(redirect))
        .layer(Extension(Arc::new(tera)))
        .with_state(state.clone())
}

/// The built-in redirect path for getting authorization codes.
async fn redirect() -> impl IntoResponse {}

use std::collections::HashMap;

use axum::{Router, http::Method, routing};

use super::super::{
    State,
    oauth2::middleware::{ApiScopeType, AuthService},
};

mod api;
mod response;

pub fn new_service(scope_path: &str, state: &State) -> Router {
    let mut scopes_tokeninfo: HashMap<Method, ApiScopeType> = HashMap::new();
    let mut scopes_logout: HashMap<Method, ApiScopeType> = HashMap::new();

    match state.api_scopes.get("auth.tokeninfo.get") {
        None => {
            scopes_tokeninfo.insert(Method::GET, vec![]);
        }
        Some(scopes) => {
            scopes_tokeninfo.insert(Method::GET, scopes.clone());
        }
    }
    match state.api_scopes.get("auth.logout.post") {
        None => {
            scopes_logout.insert(Method::POST, vec![]);
        }
        Some(scopes) => {
            scopes_logout.insert(Method::POST, scopes.clone());
        }
    }

    Router::new().nest(
        scope_path,
        Router::new()
            .route(
                "/tokeninfo",
                routing::get(api::get_tokeninfo)
                    .layer(AuthService::new(&state.model, scopes_tokeninfo)),
            )
            .route(
                "/logout",
                routing::post(api::post_logout)
                    .layer(AuthService::new(&state.model, scopes_logout)),
            )
            .with_state(state.clone()),
    )
}

use std::collections::HashMap;

use axum::{Router, http::Method, routing};

use super::super::{
    State,
    oauth2::middleware::{ApiScopeType, AuthService},
};

mod api;
mod request;
mod response;

pub fn new_service(scope_path: &str, state: &State) -> Router {
    let mut scopes_list: HashMap<Method, ApiScopeType> = HashMap::new();
    let mut scopes_param: HashMap<Method, ApiScopeType> = HashMap::new();

    match state.api_scopes.get("app.get") {
        None => {
            scopes_list.insert(Method::GET, vec![]);
        }
        Some(scopes) => {
            scopes_list.insert(Method::GET, scopes.clone());
        }
    }
    match state.api_scopes.get("app.delete") {
        None => {
            scopes_param.insert(Method::DELETE, vec![]);
        }
        Some(scopes) => {
            scopes_param.insert(Method::DELETE, scopes.clone());
        }
    }

    Router::new().nest(
        scope_path,
        Router::new()
            .route(
                "/list",
                routing::get(api::get_app_list).layer(AuthService::new(&state.model, scopes_list)),
            )
            .route(
                "/{client_id}",
                routing::delete(api::delete_app)
                    .layer(AuthService::new(&state.model, scopes_param)),
            )
            .with_state(state.clone()),
    )
}

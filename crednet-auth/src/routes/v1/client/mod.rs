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
    let mut scopes_root: HashMap<Method, ApiScopeType> = HashMap::new();
    let mut scopes_count: HashMap<Method, ApiScopeType> = HashMap::new();
    let mut scopes_list: HashMap<Method, ApiScopeType> = HashMap::new();
    let mut scopes_param: HashMap<Method, ApiScopeType> = HashMap::new();

    match state.api_scopes.get("client.post") {
        None => {
            scopes_root.insert(Method::POST, vec![]);
        }
        Some(scopes) => {
            scopes_root.insert(Method::POST, scopes.clone());
        }
    }
    match state.api_scopes.get("client.get") {
        None => {
            scopes_count.insert(Method::GET, vec![]);
            scopes_list.insert(Method::GET, vec![]);
            scopes_param.insert(Method::GET, vec![]);
        }
        Some(scopes) => {
            scopes_count.insert(Method::GET, scopes.clone());
            scopes_list.insert(Method::GET, scopes.clone());
            scopes_param.insert(Method::GET, scopes.clone());
        }
    }
    match state.api_scopes.get("client.delete") {
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
                "/",
                routing::post(api::post_client).layer(AuthService::new(&state.model, scopes_root)),
            )
            .route(
                "/count",
                routing::get(api::get_client_count)
                    .layer(AuthService::new(&state.model, scopes_count)),
            )
            .route(
                "/list",
                routing::get(api::get_client_list)
                    .layer(AuthService::new(&state.model, scopes_list)),
            )
            .route(
                "/{client_id}",
                routing::get(api::get_client)
                    .delete(api::delete_client)
                    .layer(AuthService::new(&state.model, scopes_param)),
            )
            .with_state(state.clone()),
    )
}

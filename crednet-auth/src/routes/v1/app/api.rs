use std::collections::HashMap;

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use log::error;

use crednet_corelib::{err::ErrResp, http::Json, strings::time_str};

use super::{super::super::State as AppState, request, response};
use crate::models::{
    access_token::{ListQueryCond, QueryCond as TokenQueryCond, Updates as TokenUpdates},
    client::{Client, QueryCond as ClientQueryCond},
    user::User,
};

/// `GET /{base}/api/v1/app/list`
///
/// Enumerates the user's non-revoked grants, joined with the client display metadata.
pub async fn get_app_list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    const FN_NAME: &'static str = "get_app_list";

    let cond = ListQueryCond {
        user_id: Some(user.user_id.as_str()),
        revoked: Some(false),
        ..Default::default()
    };
    let grants = match state.model.access_token().list(&cond).await {
        Err(e) => {
            error!("[{}] list grants error: {}", FN_NAME, e);
            return Err(ErrResp::ErrDb(Some(e.to_string())));
        }
        Ok(grants) => grants,
    };

    let mut clients: HashMap<String, Client> = HashMap::new();
    let mut data = vec![];
    for grant in grants.iter() {
        if !clients.contains_key(grant.client_id.as_str()) {
            let cond = ClientQueryCond {
                client_id: Some(grant.client_id.as_str()),
                ..Default::default()
            };
            let client = match state.model.client().get(&cond).await {
                Err(e) => {
                    error!("[{}] get client error: {}", FN_NAME, e);
                    return Err(ErrResp::ErrDb(Some(e.to_string())));
                }
                Ok(client) => match client {
                    None => continue,
                    Some(client) => client,
                },
            };
            clients.insert(grant.client_id.clone(), client);
        }
        let client = clients.get(grant.client_id.as_str()).unwrap();
        data.push(response::GetAppData {
            client_id: grant.client_id.clone(),
            client_name: client.name.clone(),
            client_image: client.image_url.clone(),
            scopes: grant
                .scope
                .split_whitespace()
                .map(|s| s.to_string())
                .collect(),
            authorized_at: time_str(&grant.created_at),
        });
    }

    Ok(Json(response::GetAppList { data }))
}

/// `DELETE /{base}/api/v1/app/{clientId}`
///
/// Revokes all of the user's grants for the client.
pub async fn delete_app(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(param): Path<request::ClientIdPath>,
) -> impl IntoResponse {
    const FN_NAME: &'static str = "delete_app";

    let cond = ClientQueryCond {
        client_id: Some(param.client_id.as_str()),
        ..Default::default()
    };
    match state.model.client().get(&cond).await {
        Err(e) => {
            error!("[{}] get client error: {}", FN_NAME, e);
            return Err(ErrResp::ErrDb(Some(e.to_string())));
        }
        Ok(client) => match client {
            None => return Err(ErrResp::ErrNotFound(None)),
            Some(_) => (),
        },
    }

    let cond = TokenQueryCond {
        user_id: Some(user.user_id.as_str()),
        client_id: Some(param.client_id.as_str()),
        ..Default::default()
    };
    let updates = TokenUpdates {
        revoked: Some(true),
        ..Default::default()
    };
    if let Err(e) = state.model.access_token().update(&cond, &updates).await {
        error!("[{}] revoke grants error: {}", FN_NAME, e);
        return Err(ErrResp::ErrDb(Some(e.to_string())));
    }

    Ok(StatusCode::NO_CONTENT)
}

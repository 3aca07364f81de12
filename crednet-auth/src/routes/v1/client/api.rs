use std::error::Error as StdError;

use axum::{
    Extension,
    body::{Body, Bytes},
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use log::{error, warn};

use crednet_corelib::{
    err::ErrResp,
    http::{Json, Query},
    strings::{self, time_str},
};

use super::{super::super::State as AppState, request, response};
use crate::{
    models::{
        client::{
            Client, ListOptions, ListQueryCond, QueryCond, SortCond, SortKey, Updates,
        },
        user::User,
    },
    routes::oauth2::{SUPPORTED_SCOPES, middleware::TokenInfo},
};

const LIST_LIMIT_DEFAULT: u64 = 100;
const LIST_CURSOR_MAX: u64 = 100;
const ID_RAND_LEN: usize = 8;
const SECRET_LEN: usize = 24;

/// The scopes a client is allowed to request when registration does not specify any.
const DEF_SCOPES: &'static [&'static str] = &["profile", "email", "symbolic_name"];

/// `POST /{base}/api/v1/client`
///
/// Registers a client for the authenticated owner. The response carries the client secret
/// exactly once.
pub async fn post_client(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(mut body): Json<request::PostClientBody>,
) -> impl IntoResponse {
    const FN_NAME: &'static str = "post_client";

    body.data.redirect_uris.sort();
    body.data.redirect_uris.dedup();
    if body.data.redirect_uris.len() == 0 {
        return Err(ErrResp::ErrParam(Some(
            "`redirectUris` must not be empty".to_string(),
        )));
    }
    for v in body.data.redirect_uris.iter() {
        if !strings::is_uri(v.as_str()) {
            return Err(ErrResp::ErrParam(Some(
                "`redirectUris` with invalid item(s)".to_string(),
            )));
        }
    }
    let mut scopes = match body.data.scopes {
        None => DEF_SCOPES.iter().map(|s| s.to_string()).collect(),
        Some(scopes) => match scopes.len() {
            0 => DEF_SCOPES.iter().map(|s| s.to_string()).collect(),
            _ => scopes,
        },
    };
    scopes.sort();
    scopes.dedup();
    for v in scopes.iter() {
        if !SUPPORTED_SCOPES.contains(&v.as_str()) {
            return Err(ErrResp::ErrParam(Some(
                "`scopes` with unsupported item(s)".to_string(),
            )));
        }
    }

    let now = Utc::now();
    let client_id = strings::random_id(&now, ID_RAND_LEN);
    let client_secret = strings::randomstring(SECRET_LEN);
    let client = Client {
        client_id: client_id.clone(),
        created_at: now,
        modified_at: now,
        client_secret: client_secret.clone(),
        redirect_uris: body.data.redirect_uris,
        scopes,
        user_id: user.user_id,
        name: body.data.name,
        image_url: body.data.image,
        active: true,
    };
    if let Err(e) = state.model.client().add(&client).await {
        error!("[{}] add error: {}", FN_NAME, e);
        return Err(ErrResp::ErrDb(Some(e.to_string())));
    }
    Ok(Json(response::PostClient {
        data: response::PostClientData {
            client_id,
            client_secret,
        },
    }))
}

/// `GET /{base}/api/v1/client/count`
pub async fn get_client_count(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    const FN_NAME: &'static str = "get_client_count";

    let cond = ListQueryCond {
        user_id: Some(user.user_id.as_str()),
        ..Default::default()
    };
    match state.model.client().count(&cond).await {
        Err(e) => {
            error!("[{}] count error: {}", FN_NAME, e);
            Err(ErrResp::ErrDb(Some(e.to_string())))
        }
        Ok(count) => Ok(Json(response::GetClientCount {
            data: response::GetCountData { count },
        })),
    }
}

/// `GET /{base}/api/v1/client/list`
pub async fn get_client_list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<request::GetClientListQuery>,
) -> impl IntoResponse {
    const FN_NAME: &'static str = "get_client_list";

    let user_id = user.user_id;
    let cond = ListQueryCond {
        user_id: Some(user_id.as_str()),
        ..Default::default()
    };
    let sort_cond = match get_sort_cond(&query.sort) {
        Err(e) => return Err(e),
        Ok(cond) => cond,
    };
    let opts = ListOptions {
        cond: &cond,
        offset: query.offset,
        limit: match query.limit {
            None => Some(LIST_LIMIT_DEFAULT),
            Some(limit) => match limit {
                0 => None,
                _ => Some(limit),
            },
        },
        sort: Some(sort_cond.as_slice()),
        cursor_max: Some(LIST_CURSOR_MAX),
    };

    let (list, cursor) = match state.model.client().list(&opts, None).await {
        Err(e) => {
            error!("[{}] list error: {}", FN_NAME, e);
            return Err(ErrResp::ErrDb(Some(e.to_string())));
        }
        Ok((list, cursor)) => match cursor {
            None => match query.format {
                Some(request::ListFormat::Array) => {
                    return Ok(Json(client_list_transform(&list)).into_response());
                }
                _ => {
                    return Ok(Json(response::GetClientList {
                        data: client_list_transform(&list),
                    })
                    .into_response());
                }
            },
            Some(_) => (list, cursor),
        },
    };

    let stream = async_stream::stream! {
        let cond = ListQueryCond {
            user_id: Some(user_id.as_str()),
            ..Default::default()
        };
        let opts = ListOptions {
            cond: &cond,
            offset: query.offset,
            limit: match query.limit {
                None => Some(LIST_LIMIT_DEFAULT),
                Some(limit) => match limit {
                    0 => None,
                    _ => Some(limit),
                },
            },
            sort: Some(sort_cond.as_slice()),
            cursor_max: Some(LIST_CURSOR_MAX),
        };

        let mut list = list;
        let mut cursor = cursor;
        let mut is_first = true;
        loop {
            yield client_list_transform_bytes(
                &list,
                is_first,
                cursor.is_none(),
                query.format.as_ref(),
            );
            is_first = false;
            if cursor.is_none() {
                break;
            }
            let (_list, _cursor) = match state.model.client().list(&opts, cursor).await {
                Err(_) => break,
                Ok((list, cursor)) => (list, cursor),
            };
            list = _list;
            cursor = _cursor;
        }
    };
    Ok(Body::from_stream(stream).into_response())
}

/// `GET /{base}/api/v1/client/{clientId}`
pub async fn get_client(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(param): Path<request::ClientIdPath>,
) -> impl IntoResponse {
    const FN_NAME: &'static str = "get_client";

    let cond = QueryCond {
        user_id: Some(user.user_id.as_str()),
        client_id: Some(param.client_id.as_str()),
    };
    match state.model.client().get(&cond).await {
        Err(e) => {
            error!("[{}] get error: {}", FN_NAME, e);
            Err(ErrResp::ErrDb(Some(e.to_string())))
        }
        Ok(client) => match client {
            None => Err(ErrResp::ErrNotFound(None)),
            Some(client) => Ok(Json(response::GetClient {
                data: client_transform(&client),
            })),
        },
    }
}

/// `DELETE /{base}/api/v1/client/{clientId}`
///
/// Deactivates the client. Records are never deleted, so the operation is idempotent.
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(token): Extension<TokenInfo>,
    Path(param): Path<request::ClientIdPath>,
) -> impl IntoResponse {
    const FN_NAME: &'static str = "delete_client";

    if token.token.client_id.as_str().eq(param.client_id.as_str()) {
        return Err(ErrResp::ErrPerm(Some(
            "cannot deactivate the client itself".to_string(),
        )));
    }

    let cond = QueryCond {
        user_id: Some(user.user_id.as_str()),
        client_id: Some(param.client_id.as_str()),
    };
    match state.model.client().get(&cond).await {
        Err(e) => {
            error!("[{}] get error: {}", FN_NAME, e);
            return Err(ErrResp::ErrDb(Some(e.to_string())));
        }
        Ok(client) => match client {
            None => {
                warn!(
                    "[{}] {} tries to deactivate a client of others",
                    FN_NAME,
                    user.user_id.as_str()
                );
                return Err(ErrResp::ErrNotFound(None));
            }
            Some(_) => (),
        },
    }

    let updates = Updates {
        modified_at: Some(Utc::now()),
        active: Some(false),
    };
    match state.model.client().update(&cond, &updates).await {
        Err(e) => {
            error!("[{}] update error: {}", FN_NAME, e);
            Err(ErrResp::ErrDb(Some(e.to_string())))
        }
        Ok(_) => Ok(StatusCode::NO_CONTENT),
    }
}

fn get_sort_cond(sort_args: &Option<String>) -> Result<Vec<SortCond>, ErrResp> {
    match sort_args.as_ref() {
        None => Ok(vec![SortCond {
            key: SortKey::Name,
            asc: true,
        }]),
        Some(args) => {
            let mut args = args.split(",");
            let mut sort_cond = vec![];
            while let Some(arg) = args.next() {
                let mut cond = arg.split(":");
                let key = match cond.next() {
                    None => return Err(ErrResp::ErrParam(Some("wrong sort argument".to_string()))),
                    Some(field) => match field {
                        "created" => SortKey::CreatedAt,
                        "modified" => SortKey::ModifiedAt,
                        "name" => SortKey::Name,
                        _ => {
                            return Err(ErrResp::ErrParam(Some(format!(
                                "invalid sort key {}",
                                field
                            ))));
                        }
                    },
                };
                let asc = match cond.next() {
                    None => return Err(ErrResp::ErrParam(Some("wrong sort argument".to_string()))),
                    Some(asc) => match asc {
                        "asc" => true,
                        "desc" => false,
                        _ => {
                            return Err(ErrResp::ErrParam(Some(format!(
                                "invalid sort asc {}",
                                asc
                            ))));
                        }
                    },
                };
                if cond.next().is_some() {
                    return Err(ErrResp::ErrParam(Some(
                        "invalid sort condition".to_string(),
                    )));
                }
                sort_cond.push(SortCond { key, asc });
            }
            Ok(sort_cond)
        }
    }
}

fn client_list_transform(list: &Vec<Client>) -> Vec<response::GetClientData> {
    let mut ret = vec![];
    for client in list.iter() {
        ret.push(client_transform(&client));
    }
    ret
}

fn client_list_transform_bytes(
    list: &Vec<Client>,
    with_start: bool,
    with_end: bool,
    format: Option<&request::ListFormat>,
) -> Result<Bytes, Box<dyn StdError + Send + Sync>> {
    let mut build_str = match with_start {
        false => "".to_string(),
        true => match format {
            Some(request::ListFormat::Array) => "[".to_string(),
            _ => "{\"data\":[".to_string(),
        },
    };
    let mut is_first = with_start;

    for item in list {
        if is_first {
            is_first = false;
        } else {
            build_str.push(',');
        }
        let json_str = match serde_json::to_string(&client_transform(item)) {
            Err(e) => return Err(Box::new(e)),
            Ok(str) => str,
        };
        build_str += json_str.as_str();
    }

    if with_end {
        build_str += match format {
            Some(request::ListFormat::Array) => "]",
            _ => "]}",
        }
    }
    Ok(Bytes::copy_from_slice(build_str.as_str().as_bytes()))
}

/// The client secret is never part of any read projection.
fn client_transform(client: &Client) -> response::GetClientData {
    response::GetClientData {
        client_id: client.client_id.clone(),
        created_at: time_str(&client.created_at),
        modified_at: time_str(&client.modified_at),
        redirect_uris: client.redirect_uris.clone(),
        scopes: client.scopes.clone(),
        name: client.name.clone(),
        image: match client.image_url.as_ref() {
            None => None,
            Some(image) => Some(image.clone()),
        },
        active: client.active,
    }
}

use axum::{
    Extension,
    extract::{Request, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::headers::authorization::{Bearer, Credentials};
use log::error;

use crednet_corelib::{err::ErrResp, http::Json, strings::time_str};

use super::{super::super::State as AppState, response};
use crate::{
    models::access_token::{QueryCond as TokenQueryCond, Updates as TokenUpdates},
    routes::oauth2::middleware::TokenInfo,
};

/// `GET /{base}/api/v1/auth/tokeninfo`
///
/// Token introspection for the presented access token.
pub async fn get_tokeninfo(Extension(token): Extension<TokenInfo>) -> impl IntoResponse {
    let token = token.token;
    Json(response::GetTokenInfo {
        data: response::GetTokenInfoData {
            user_id: token.user_id,
            client_id: token.client_id,
            scopes: token.scope.split_whitespace().map(|s| s.to_string()).collect(),
            expires_at: time_str(&token.expires_at),
        },
    })
}

/// `POST /{base}/api/v1/auth/logout`
///
/// Revokes the presented access token.
pub async fn post_logout(state: State<AppState>, req: Request) -> impl IntoResponse {
    const FN_NAME: &'static str = "post_logout";

    let token = match req.headers().get(header::AUTHORIZATION) {
        None => {
            return Err(ErrResp::ErrUnknown(Some(
                "no Authorization header".to_string(),
            )));
        }
        Some(auth) => match Bearer::decode(auth) {
            None => return Err(ErrResp::ErrUnknown(Some("no Bearer token".to_string()))),
            Some(token) => token.token().to_string(),
        },
    };

    let cond = TokenQueryCond {
        access_token: Some(token.as_str()),
        ..Default::default()
    };
    let updates = TokenUpdates {
        revoked: Some(true),
        ..Default::default()
    };
    if let Err(e) = state.model.access_token().update(&cond, &updates).await {
        error!("[{}] revoke access token error: {}", FN_NAME, e);
        let e = ErrResp::ErrDb(Some(format!("revoke access token error: {}", e)));
        return Err(e);
    }

    Ok(StatusCode::NO_CONTENT)
}

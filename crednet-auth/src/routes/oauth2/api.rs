use std::{collections::HashSet, error::Error as StdError, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::headers::authorization::{Bearer, Credentials};
use chrono::{TimeDelta, Utc};
use log::{error, warn};
use serde_urlencoded;
use subtle::ConstantTimeEq;
use tera::{Context, Tera};

use crednet_corelib::strings;

use super::{
    super::State as AppState,
    request::{
        self, AccessTokenRequest, AuthorizationRequest, GetAuthRequest, GetLoginRequest,
        PostLoginRequest, RefreshTokenRequest, RevokeRequest,
    },
    response::{self, AccessTokenResponse, OAuth2Error, UserInfo},
};
use crate::models::{
    Model,
    access_token::{self, AccessToken, QueryCond as TokenQueryCond, Updates as TokenUpdates},
    authorization_code::{self, AuthorizationCode},
    client::{Client, QueryCond as ClientQueryCond},
    user::{QueryCond as UserQueryCond, User},
};

pub const TMPL_LOGIN: &'static str = "login";
pub const TMPL_GRANT: &'static str = "grant";

const GRANT_TYPE_AUTHORIZATION_CODE: &'static str = "authorization_code";
const GRANT_TYPE_REFRESH_TOKEN: &'static str = "refresh_token";

/// Random length before hashing. 24 alphanumeric characters carry more than 128 bits of entropy.
const TOKEN_RAND_LEN: usize = 24;

/// `GET /{base}/oauth2/auth`
///
/// Authenticate client and redirect to the login page.
pub async fn get_auth(State(state): State<AppState>, req: GetAuthRequest) -> Response {
    const FN_NAME: &'static str = "get_auth";

    if let Err(resp) = check_auth_params(FN_NAME, &req, &state.model).await {
        return resp;
    }

    let login_state: String = match serde_urlencoded::to_string(&req) {
        Err(e) => {
            let err_str = e.to_string();
            error!(
                "[{}] encode authorize state error: {}",
                FN_NAME,
                err_str.as_str()
            );
            return redirect_server_error(
                FN_NAME,
                req.redirect_uri.as_str(),
                req.state.as_deref(),
                Some(err_str.as_str()),
            );
        }
        Ok(str) => match serde_urlencoded::to_string(GetLoginRequest { state: str }) {
            Err(e) => {
                let err_str = e.to_string();
                error!(
                    "[{}] encode login state error: {}",
                    FN_NAME,
                    err_str.as_str()
                );
                return redirect_server_error(
                    FN_NAME,
                    req.redirect_uri.as_str(),
                    req.state.as_deref(),
                    Some(err_str.as_str()),
                );
            }
            Ok(str) => str,
        },
    };
    resp_found(format!("{}/oauth2/login?{}", state.scope_path, login_state).as_str())
}

/// `GET /{base}/oauth2/login`
///
/// To render the login page.
pub async fn get_login(
    State(state): State<AppState>,
    tera: axum::Extension<Arc<Tera>>,
    req: GetLoginRequest,
) -> Response {
    const FN_NAME: &'static str = "get_login";

    if req.state.as_str().len() == 0 {
        warn!("[{}] empty state content", FN_NAME);
        return resp_invalid_request(Some("invalid state content".to_string()));
    }
    match serde_urlencoded::from_str::<GetAuthRequest>(req.state.as_str()) {
        Err(e) => {
            warn!(
                "[{}] parse state error: {}, content: {}",
                FN_NAME,
                e,
                req.state.as_str()
            );
            return resp_invalid_request(Some("invalid state content".to_string()));
        }
        Ok(inner_req) => {
            if let Err(resp) = check_auth_params(FN_NAME, &inner_req, &state.model).await {
                return resp;
            }
        }
    }

    let mut context = Context::new();
    context.insert("scope_path", &state.scope_path);
    context.insert("state", &req.state);
    let page = match tera.render(TMPL_LOGIN, &context) {
        Err(e) => {
            let err_str = e.to_string();
            error!(
                "[{}] render login template error: {}",
                FN_NAME,
                err_str.as_str()
            );
            return resp_temporary_unavailable(Some(err_str));
        }
        Ok(page) => page,
    };

    resp_html(page)
}

/// `POST /{base}/oauth2/login`
///
/// Do the login process.
pub async fn post_login(State(state): State<AppState>, req: PostLoginRequest) -> Response {
    const FN_NAME: &'static str = "post_login";

    if req.state.as_str().len() == 0 {
        warn!("[{}] empty state content", FN_NAME);
        return resp_invalid_request(Some("invalid state content".to_string()));
    }
    match serde_urlencoded::from_str::<GetAuthRequest>(req.state.as_str()) {
        Err(e) => {
            warn!(
                "[{}] parse state error: {}, content: {}",
                FN_NAME,
                e,
                req.state.as_str()
            );
            return resp_invalid_request(Some("invalid state content".to_string()));
        }
        Ok(inner_req) => {
            if let Err(resp) = check_auth_params(FN_NAME, &inner_req, &state.model).await {
                return resp;
            }
        }
    }

    let user_cond = UserQueryCond {
        user_id: None,
        account: Some(req.account.as_str()),
    };
    let user_id = match state.model.user().get(&user_cond).await {
        Err(e) => {
            let err_str = e.to_string();
            error!("[{}] get user DB error: {}", FN_NAME, err_str.as_str());
            return resp_temporary_unavailable(Some(err_str));
        }
        Ok(user) => match user {
            None => {
                return resp_invalid_auth(None);
            }
            Some(user) => {
                let hash = strings::password_hash(req.password.as_str(), user.salt.as_str());
                if user.password != hash {
                    return resp_invalid_auth(None);
                }
                user.user_id
            }
        },
    };

    resp_found(
        format!(
            "{}/oauth2/authorize?{}&user_id={}",
            state.scope_path, req.state, user_id
        )
        .as_str(),
    )
}

/// `GET /{base}/oauth2/authorize` and `POST /{base}/oauth2/authorize`
///
/// To render the OAuth2 grant page or to authorize the client and grant.
pub async fn authorize(
    State(state): State<AppState>,
    tera: axum::Extension<Arc<Tera>>,
    req: AuthorizationRequest,
) -> Response {
    const FN_NAME: &'static str = "authorize";

    let auth_req = GetAuthRequest {
        response_type: req.response_type.clone(),
        client_id: req.client_id.clone(),
        redirect_uri: req.redirect_uri.clone(),
        scope: req.scope.clone(),
        state: req.state.clone(),
    };
    if let Err(resp) = check_auth_params(FN_NAME, &auth_req, &state.model).await {
        return resp;
    }

    let user_cond = UserQueryCond {
        user_id: Some(req.user_id.as_str()),
        account: None,
    };
    match state.model.user().get(&user_cond).await {
        Err(e) => {
            let err_str = e.to_string();
            error!("[{}] get user DB error: {}", FN_NAME, err_str.as_str());
            return resp_temporary_unavailable(Some(err_str));
        }
        Ok(user) => match user {
            None => {
                return resp_invalid_request(Some("invalid user".to_string()));
            }
            Some(_) => (),
        },
    }

    if let Some(allowed) = req.allowed() {
        match allowed {
            false => {
                return redirect_access_denied(req.redirect_uri.as_str(), req.state.as_deref());
            }
            true => {
                let now = Utc::now();
                let code = AuthorizationCode {
                    code: strings::random_id_sha(&now, TOKEN_RAND_LEN),
                    created_at: now,
                    expires_at: now + TimeDelta::seconds(authorization_code::EXPIRES),
                    redirect_uri: req.redirect_uri.clone(),
                    scope: normalize_scope(req.scope.as_deref()),
                    client_id: req.client_id.clone(),
                    user_id: req.user_id.clone(),
                    used: false,
                };
                if let Err(e) = state.model.authorization_code().add(&code).await {
                    error!("[{}] add authorization code error: {}", FN_NAME, e);
                    return resp_temporary_unavailable(None);
                }
                return redirect_code(
                    req.redirect_uri.as_str(),
                    code.code.as_str(),
                    req.state.as_deref(),
                );
            }
        }
    }

    let client_cond = ClientQueryCond {
        user_id: None,
        client_id: Some(req.client_id.as_str()),
    };
    let client_name = match state.model.client().get(&client_cond).await {
        Err(e) => {
            let err_str = e.to_string();
            error!("[{}] get client DB error: {}", FN_NAME, err_str.as_str());
            return resp_temporary_unavailable(Some(err_str));
        }
        Ok(client) => match client {
            None => {
                return resp_invalid_request(Some("invalid client".to_string()));
            }
            Some(client) => client.name,
        },
    };

    let mut context = Context::new();
    context.insert("scope_path", &state.scope_path);
    context.insert("client_name", &client_name);
    context.insert("user_id", req.user_id.as_str());
    context.insert("client_id", req.client_id.as_str());
    context.insert("response_type", req.response_type.as_str());
    context.insert("redirect_uri", req.redirect_uri.as_str());
    context.insert("allow_value", request::ALLOW_VALUE);
    if let Some(scope) = req.scope.as_ref() {
        context.insert("scope", scope);
    }
    if let Some(state) = req.state.as_ref() {
        context.insert("state", state);
    }
    let page = match tera.render(TMPL_GRANT, &context) {
        Err(e) => {
            let err_str = e.to_string();
            error!(
                "[{}] render grant template error: {}",
                FN_NAME,
                err_str.as_str()
            );
            return resp_temporary_unavailable(Some(err_str));
        }
        Ok(page) => page,
    };
    resp_html(page)
}

/// `POST /{base}/oauth2/token`
///
/// To exchange an authorization code for an access/refresh token pair.
pub async fn post_token(State(state): State<AppState>, req: AccessTokenRequest) -> Response {
    const FN_NAME: &'static str = "post_token";

    if req.grant_type.as_str() != GRANT_TYPE_AUTHORIZATION_CODE {
        return OAuth2Error::new(response::UNSUPPORTED_GRANT_TYPE, None).into_response();
    }
    let code = match req.code.as_deref() {
        None => return resp_invalid_request(Some("missing code".to_string())),
        Some(code) => code,
    };
    let redirect_uri = match req.redirect_uri.as_deref() {
        None => return resp_invalid_request(Some("missing redirect_uri".to_string())),
        Some(uri) => uri,
    };
    let (client_id, client_secret) = match req.credentials() {
        None => return resp_invalid_client(None),
        Some(credentials) => credentials,
    };

    let code_item = match state.model.authorization_code().get(code).await {
        Err(e) => {
            error!("[{}] get authorization code error: {}", FN_NAME, e);
            return resp_temporary_unavailable(None);
        }
        Ok(item) => match item {
            None => return resp_invalid_grant(None),
            Some(item) => item,
        },
    };
    if code_item.used {
        warn!(
            "[{}] code of client {} replayed",
            FN_NAME,
            code_item.client_id.as_str()
        );
        return resp_invalid_grant(Some("code already used".to_string()));
    } else if code_item.expires_at < Utc::now() {
        return resp_invalid_grant(Some("code expired".to_string()));
    }

    let client = match get_active_client(&state.model, client_id).await {
        Err(e) => {
            error!("[{}] get client error: {}", FN_NAME, e);
            return resp_temporary_unavailable(None);
        }
        Ok(client) => match client {
            None => return resp_invalid_client(None),
            Some(client) => client,
        },
    };
    if client.client_id != code_item.client_id || !secret_eq(&client, client_secret) {
        return resp_invalid_client(None);
    }
    if code_item.redirect_uri.as_str() != redirect_uri {
        return resp_invalid_grant(Some("redirect_uri mismatch".to_string()));
    }

    // The atomic transition that guarantees single-use under concurrent redemptions.
    match state.model.authorization_code().mark_used(code).await {
        Err(e) => {
            error!("[{}] mark code used error: {}", FN_NAME, e);
            return resp_temporary_unavailable(None);
        }
        Ok(marked) => match marked {
            false => return resp_invalid_grant(Some("code already used".to_string())),
            true => (),
        },
    }

    let now = Utc::now();
    let token = AccessToken {
        access_token: strings::random_id_sha(&now, TOKEN_RAND_LEN),
        refresh_token: strings::random_id_sha(&now, TOKEN_RAND_LEN),
        created_at: now,
        expires_at: now + TimeDelta::seconds(access_token::EXPIRES),
        revoked: false,
        scope: code_item.scope.clone(),
        client_id: code_item.client_id,
        redirect_uri: code_item.redirect_uri,
        user_id: code_item.user_id,
    };
    if let Err(e) = state.model.access_token().add(&token).await {
        error!("[{}] add access token error: {}", FN_NAME, e);
        return resp_temporary_unavailable(None);
    }

    resp_token(AccessTokenResponse {
        access_token: token.access_token,
        token_type: response::TOKEN_TYPE_BEARER.to_string(),
        expires_in: access_token::EXPIRES,
        refresh_token: Some(token.refresh_token),
        scope: token.scope,
    })
}

/// `POST /{base}/oauth2/refresh`
///
/// To refresh an access token. The refresh token and the grant's scope stay unchanged.
pub async fn post_refresh(State(state): State<AppState>, req: RefreshTokenRequest) -> Response {
    const FN_NAME: &'static str = "post_refresh";

    if req.grant_type.as_str() != GRANT_TYPE_REFRESH_TOKEN {
        return OAuth2Error::new(response::UNSUPPORTED_GRANT_TYPE, None).into_response();
    }
    let (client_id, client_secret) = match req.credentials() {
        None => return resp_invalid_client(None),
        Some(credentials) => credentials,
    };

    let token = match state
        .model
        .access_token()
        .get_by_refresh(req.refresh_token.as_str())
        .await
    {
        Err(e) => {
            error!("[{}] get refresh token error: {}", FN_NAME, e);
            return resp_temporary_unavailable(None);
        }
        Ok(token) => match token {
            None => return resp_invalid_grant(None),
            Some(token) => token,
        },
    };
    if token.revoked {
        return resp_invalid_grant(Some("grant revoked".to_string()));
    }
    if token.client_id.as_str() != client_id {
        return resp_invalid_client(None);
    }
    let client = match get_active_client(&state.model, client_id).await {
        Err(e) => {
            error!("[{}] get client error: {}", FN_NAME, e);
            return resp_temporary_unavailable(None);
        }
        Ok(client) => match client {
            None => return resp_invalid_client(None),
            Some(client) => client,
        },
    };
    if !secret_eq(&client, client_secret) {
        return resp_invalid_client(None);
    }

    let now = Utc::now();
    let new_access_token = strings::random_id_sha(&now, TOKEN_RAND_LEN);
    let cond = TokenQueryCond {
        refresh_token: Some(req.refresh_token.as_str()),
        ..Default::default()
    };
    let updates = TokenUpdates {
        access_token: Some(new_access_token.as_str()),
        expires_at: Some(now + TimeDelta::seconds(access_token::EXPIRES)),
        ..Default::default()
    };
    if let Err(e) = state.model.access_token().update(&cond, &updates).await {
        error!("[{}] rotate access token error: {}", FN_NAME, e);
        return resp_temporary_unavailable(None);
    }

    resp_token(AccessTokenResponse {
        access_token: new_access_token,
        token_type: response::TOKEN_TYPE_BEARER.to_string(),
        expires_in: access_token::EXPIRES,
        refresh_token: None,
        scope: token.scope,
    })
}

/// `GET /{base}/oauth2/userinfo`
///
/// Returns the user information projection gated by the token's granted scopes.
pub async fn get_userinfo(State(state): State<AppState>, req: Request) -> Response {
    const FN_NAME: &'static str = "get_userinfo";

    let token = match req.headers().get(header::AUTHORIZATION) {
        None => return resp_invalid_token(Some("no Authorization header".to_string())),
        Some(auth) => match Bearer::decode(auth) {
            None => return resp_invalid_token(Some("no Bearer token".to_string())),
            Some(token) => token.token().to_string(),
        },
    };

    let token = match state.model.access_token().get(token.as_str()).await {
        Err(e) => {
            error!("[{}] get access token error: {}", FN_NAME, e);
            return resp_temporary_unavailable(None);
        }
        Ok(token) => match token {
            None => return resp_invalid_token(None),
            Some(token) => token,
        },
    };
    if token.revoked {
        return resp_invalid_token(Some("token revoked".to_string()));
    } else if token.expires_at < Utc::now() {
        return resp_invalid_token(Some("token expired".to_string()));
    }

    let user_cond = UserQueryCond {
        user_id: Some(token.user_id.as_str()),
        account: None,
    };
    let user = match state.model.user().get(&user_cond).await {
        Err(e) => {
            error!("[{}] get user error: {}", FN_NAME, e);
            return resp_temporary_unavailable(None);
        }
        Ok(user) => match user {
            None => return resp_invalid_token(Some("user not exist".to_string())),
            Some(user) => user,
        },
    };

    let info = scoped_user_info(&token, &user);
    axum::Json(info).into_response()
}

/// `POST /{base}/oauth2/revoke`
///
/// To revoke an access token. Idempotent: revoking twice or revoking an unknown token
/// succeeds as well.
pub async fn post_revoke(State(state): State<AppState>, req: RevokeRequest) -> Response {
    const FN_NAME: &'static str = "post_revoke";

    let cond = TokenQueryCond {
        access_token: Some(req.token.as_str()),
        ..Default::default()
    };
    let updates = TokenUpdates {
        revoked: Some(true),
        ..Default::default()
    };
    if let Err(e) = state.model.access_token().update(&cond, &updates).await {
        error!("[{}] revoke access token error: {}", FN_NAME, e);
        return resp_temporary_unavailable(None);
    }
    StatusCode::OK.into_response()
}

/// Builds the user-info projection. `sub` is always present; every other field requires its
/// governing scope in the token's granted scope set.
pub fn scoped_user_info(token: &AccessToken, user: &User) -> UserInfo {
    let scopes: HashSet<&str> = token.scope.split_whitespace().collect();

    let mut info = UserInfo {
        sub: user.user_id.clone(),
        ..Default::default()
    };
    if scopes.contains("profile") {
        info.name = Some(user.name.clone());
        info.picture = user.photo_url.clone();
    }
    if scopes.contains("email") {
        info.email = Some(user.account.clone());
        info.email_verified = Some(user.verified_at.is_some());
    }
    if scopes.contains("symbolic_name") {
        let symbolic = match user.symbolic_name.as_ref() {
            None => strings::format_symbolic_name(user.name.as_str()),
            Some(name) => name.clone(),
        };
        info.symbolic_name_plain = Some(strings::symbolic_name_plain(symbolic.as_str()));
        info.symbolic_name = Some(symbolic);
    }
    if scopes.contains("tokens") {
        info.token_balance = Some(user.token_balance);
    }
    if scopes.contains("reputation") {
        info.reputation = Some(user.reputation.clone());
        info.breadcrumb_score = Some(user.breadcrumb_score);
    }
    info
}

/// To get a client that is able to authorize. Inactive clients behave as not-found.
async fn get_active_client(
    model: &Arc<dyn Model>,
    client_id: &str,
) -> Result<Option<Client>, Box<dyn StdError>> {
    let cond = ClientQueryCond {
        user_id: None,
        client_id: Some(client_id),
    };
    match model.client().get(&cond).await? {
        None => Ok(None),
        Some(client) => match client.active {
            false => Ok(None),
            true => Ok(Some(client)),
        },
    }
}

/// Constant-time client secret comparison.
fn secret_eq(client: &Client, client_secret: &str) -> bool {
    client
        .client_secret
        .as_bytes()
        .ct_eq(client_secret.as_bytes())
        .into()
}

fn normalize_scope(scope: Option<&str>) -> String {
    match scope {
        None => "".to_string(),
        Some(scope) => scope.split_whitespace().collect::<Vec<&str>>().join(" "),
    }
}

/// To check the authorization grant flow parameters.
async fn check_auth_params(
    fn_name: &str,
    req: &GetAuthRequest,
    model: &Arc<dyn Model>,
) -> Result<(), Response> {
    if req.response_type != "code" {
        return Err(resp_invalid_request(Some(
            "unsupport response_type".to_string(),
        )));
    }

    let client = match get_active_client(model, req.client_id.as_str()).await {
        Err(e) => {
            error!("[{}] get client DB error: {}", fn_name, e);
            return Err(resp_temporary_unavailable(Some(e.to_string())));
        }
        Ok(client) => match client {
            None => {
                return Err(resp_invalid_request(Some("invalid client".to_string())));
            }
            Some(client) => client,
        },
    };
    // Exact match only. Prefix or same-origin variants must be rejected to prevent
    // open-redirect abuse.
    if !client.redirect_uris.contains(&req.redirect_uri) {
        return Err(resp_invalid_request(Some(
            "invalid redirect_uri".to_string(),
        )));
    }
    if client.scopes.len() > 0 {
        let req_scope = match req.scope.as_ref() {
            None => {
                return Err(redirect_invalid_scope(
                    req.redirect_uri.as_str(),
                    req.state.as_deref(),
                ));
            }
            Some(scope) => scope,
        };
        let req_scopes: Vec<&str> = req_scope.split_whitespace().collect();
        if req_scopes.len() == 0 {
            return Err(redirect_invalid_scope(
                req.redirect_uri.as_str(),
                req.state.as_deref(),
            ));
        }
        let client_scopes: HashSet<&str> = client.scopes.iter().map(|s| s.as_str()).collect();
        for scope in req_scopes {
            if !strings::is_scope(scope) || !client_scopes.contains(scope) {
                return Err(redirect_invalid_scope(
                    req.redirect_uri.as_str(),
                    req.state.as_deref(),
                ));
            }
        }
    }
    Ok(())
}

fn redirect_code(redirect_uri: &str, code: &str, state: Option<&str>) -> Response {
    redirect_params(redirect_uri, &[("code", code)], state)
}

fn redirect_access_denied(redirect_uri: &str, state: Option<&str>) -> Response {
    redirect_params(
        redirect_uri,
        &[
            ("error", response::ACCESS_DENIED),
            ("error_description", "User denied authorization"),
        ],
        state,
    )
}

fn redirect_invalid_scope(redirect_uri: &str, state: Option<&str>) -> Response {
    redirect_params(redirect_uri, &[("error", response::INVALID_SCOPE)], state)
}

fn redirect_server_error(
    fn_name: &str,
    redirect_uri: &str,
    state: Option<&str>,
    description: Option<&str>,
) -> Response {
    let mut params: Vec<(&str, &str)> = vec![("error", response::SERVER_ERROR)];
    if let Some(desc) = description {
        params.push(("error_description", desc));
    }
    let resp = redirect_params(redirect_uri, params.as_slice(), state);
    warn!("[{}] redirect with server_error", fn_name);
    resp
}

/// Redirect to the client's redirect URI with the specified query parameters. The caller
/// supplied `state` is echoed verbatim, never interpreted.
fn redirect_params(redirect_uri: &str, params: &[(&str, &str)], state: Option<&str>) -> Response {
    let mut params: Vec<(&str, &str)> = params.to_vec();
    if let Some(state) = state {
        params.push(("state", state));
    }
    let location = match serde_urlencoded::to_string(params.as_slice()) {
        Err(_) => redirect_uri.to_string(),
        Ok(qs) => format!("{}?{}", redirect_uri, qs),
    };
    resp_found(location.as_str())
}

fn resp_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn resp_html(page: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        page,
    )
        .into_response()
}

fn resp_token(token: AccessTokenResponse) -> Response {
    axum::Json(token).into_response()
}

fn resp_invalid_auth(description: Option<String>) -> Response {
    OAuth2Error::new(response::INVALID_AUTH, description).into_response()
}

fn resp_invalid_client(description: Option<String>) -> Response {
    OAuth2Error::new(response::INVALID_CLIENT, description).into_response()
}

fn resp_invalid_grant(description: Option<String>) -> Response {
    OAuth2Error::new(response::INVALID_GRANT, description).into_response()
}

fn resp_invalid_request(description: Option<String>) -> Response {
    OAuth2Error::new_request(description).into_response()
}

fn resp_invalid_token(description: Option<String>) -> Response {
    OAuth2Error::new(response::INVALID_TOKEN, description).into_response()
}

fn resp_temporary_unavailable(description: Option<String>) -> Response {
    OAuth2Error::new(response::TEMPORARILY_UNAVAILABLE, description).into_response()
}

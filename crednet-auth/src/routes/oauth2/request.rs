use std::str;

use axum::{
    body::Bytes,
    extract::{Form, FromRequest, Query, Request},
    http::{Method, header},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose};
use serde::{Deserialize, Serialize};

use super::response::OAuth2Error;

#[derive(Deserialize, Serialize)]
pub struct GetAuthRequest {
    pub response_type: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: Option<String>,
    pub state: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct GetLoginRequest {
    pub state: String,
}

#[derive(Deserialize)]
pub struct PostLoginRequest {
    pub account: String,
    pub password: String,
    pub state: String,
}

#[derive(Deserialize, Serialize)]
pub struct AuthorizationRequest {
    pub response_type: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub user_id: String,
    pub allow: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct AccessTokenRequest {
    #[serde(skip)]
    pub authorization: Option<(String, String)>,
    pub grant_type: String,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct RefreshTokenRequest {
    #[serde(skip)]
    pub authorization: Option<(String, String)>,
    pub grant_type: String,
    pub refresh_token: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct RevokeRequest {
    pub token: String,
}

pub const ALLOW_VALUE: &'static str = "yes";

impl AuthorizationRequest {
    pub fn allowed(&self) -> Option<bool> {
        if let Some(allow_str) = self.allow.as_deref() {
            return Some(allow_str == ALLOW_VALUE);
        }
        None
    }
}

impl AccessTokenRequest {
    /// The client credentials, preferring the Basic Authorization header over body fields.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        credentials(
            self.authorization.as_ref(),
            self.client_id.as_deref(),
            self.client_secret.as_deref(),
        )
    }
}

impl RefreshTokenRequest {
    /// The client credentials, preferring the Basic Authorization header over body fields.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        credentials(
            self.authorization.as_ref(),
            self.client_id.as_deref(),
            self.client_secret.as_deref(),
        )
    }
}

impl<S> FromRequest<S> for GetAuthRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<GetAuthRequest>::from_request(req, state).await {
            Err(e) => Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
            Ok(request) => Ok(request.0),
        }
    }
}

impl<S> FromRequest<S> for GetLoginRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<GetLoginRequest>::from_request(req, state).await {
            Err(e) => Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
            Ok(request) => Ok(request.0),
        }
    }
}

impl<S> FromRequest<S> for PostLoginRequest
where
    Bytes: FromRequest<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<PostLoginRequest>::from_request(req, state).await {
            Err(e) => Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
            Ok(body) => Ok(body.0),
        }
    }
}

impl<S> FromRequest<S> for AuthorizationRequest
where
    Bytes: FromRequest<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match *req.method() {
            Method::GET => match Query::<AuthorizationRequest>::from_request(req, state).await {
                Err(e) => Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
                Ok(request) => Ok(request.0),
            },
            Method::POST => match Form::<AuthorizationRequest>::from_request(req, state).await {
                Err(e) => Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
                Ok(request) => Ok(request.0),
            },
            _ => Err(OAuth2Error::new_request(Some("invalid method".to_string())).into_response()),
        }
    }
}

impl<S> FromRequest<S> for AccessTokenRequest
where
    Bytes: FromRequest<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let authorization = match parse_basic_auth(&req) {
            Err(e) => return Err(e.into_response()),
            Ok(auth) => auth,
        };
        let mut request = match Form::<AccessTokenRequest>::from_request(req, state).await {
            Err(e) => return Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
            Ok(request) => request.0,
        };
        request.authorization = authorization;
        Ok(request)
    }
}

impl<S> FromRequest<S> for RefreshTokenRequest
where
    Bytes: FromRequest<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let authorization = match parse_basic_auth(&req) {
            Err(e) => return Err(e.into_response()),
            Ok(auth) => auth,
        };
        let mut request = match Form::<RefreshTokenRequest>::from_request(req, state).await {
            Err(e) => return Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
            Ok(request) => request.0,
        };
        request.authorization = authorization;
        Ok(request)
    }
}

impl<S> FromRequest<S> for RevokeRequest
where
    Bytes: FromRequest<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<RevokeRequest>::from_request(req, state).await {
            Err(e) => Err(OAuth2Error::new_request(Some(e.to_string())).into_response()),
            Ok(body) => Ok(body.0),
        }
    }
}

fn credentials<'a>(
    authorization: Option<&'a (String, String)>,
    client_id: Option<&'a str>,
    client_secret: Option<&'a str>,
) -> Option<(&'a str, &'a str)> {
    if let Some((id, secret)) = authorization {
        return Some((id.as_str(), secret.as_str()));
    }
    match (client_id, client_secret) {
        (Some(id), Some(secret)) => Some((id, secret)),
        _ => None,
    }
}

fn parse_basic_auth(req: &Request) -> Result<Option<(String, String)>, OAuth2Error> {
    let mut auth_all = req.headers().get_all(header::AUTHORIZATION).iter();
    let auth = match auth_all.next() {
        None => return Ok(None),
        Some(auth) => match auth.to_str() {
            Err(e) => return Err(OAuth2Error::new_request(Some(e.to_string()))),
            Ok(auth) => auth,
        },
    };
    if auth_all.next() != None {
        return Err(OAuth2Error::new_request(Some(
            "invalid multiple Authorization header".to_string(),
        )));
    } else if !auth.starts_with("Basic ") || auth.len() < 7 {
        return Err(OAuth2Error::new_request(Some(
            "not a Basic header".to_string(),
        )));
    }
    let auth = match general_purpose::STANDARD.decode(&auth[6..]) {
        Err(e) => match general_purpose::STANDARD_NO_PAD.decode(&auth[6..]) {
            Err(_) => {
                return Err(OAuth2Error::new_request(Some(format!(
                    "invalid Basic content: {}",
                    e
                ))));
            }
            Ok(auth) => auth,
        },
        Ok(auth) => auth,
    };
    let auth = match str::from_utf8(auth.as_slice()) {
        Err(e) => {
            return Err(OAuth2Error::new_request(Some(format!(
                "invalid Basic content: {}",
                e
            ))));
        }
        Ok(auth) => auth,
    };
    let mut split = auth.splitn(2, ':');
    let user = match split.next() {
        None => {
            return Err(OAuth2Error::new_request(Some(
                "invalid Basic content".to_string(),
            )));
        }
        Some(user) => user,
    };
    let pass = match split.next() {
        None => {
            return Err(OAuth2Error::new_request(Some(
                "invalid Basic content".to_string(),
            )));
        }
        Some(pass) => pass,
    };
    Ok(Some((user.to_string(), pass.to_string())))
}

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json;

/// The `{error, error_description}` body of OAuth2 error responses.
#[derive(Debug, Deserialize, Serialize)]
pub struct OAuth2Error {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// The token endpoint success body.
#[derive(Deserialize, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub scope: String,
}

/// The user-info body. Fields are gated strictly by the token's granted scopes.
#[derive(Default, Deserialize, Serialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbolic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbolic_name_plain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reputation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumb_score: Option<i64>,
}

pub const ACCESS_DENIED: &'static str = "access_denied";
pub const INVALID_AUTH: &'static str = "invalid_auth";
pub const INVALID_CLIENT: &'static str = "invalid_client";
pub const INVALID_GRANT: &'static str = "invalid_grant";
pub const INVALID_REQUEST: &'static str = "invalid_request";
pub const INVALID_SCOPE: &'static str = "invalid_scope";
pub const INVALID_TOKEN: &'static str = "invalid_token";
pub const SERVER_ERROR: &'static str = "server_error";
pub const TEMPORARILY_UNAVAILABLE: &'static str = "temporarily_unavailable";
pub const UNSUPPORTED_GRANT_TYPE: &'static str = "unsupported_grant_type";

pub const TOKEN_TYPE_BEARER: &'static str = "Bearer";

impl OAuth2Error {
    pub fn new(error: &str, description: Option<String>) -> Self {
        OAuth2Error {
            error: error.to_string(),
            error_description: description,
        }
    }

    pub fn new_request(description: Option<String>) -> Self {
        OAuth2Error {
            error: INVALID_REQUEST.to_string(),
            error_description: description,
        }
    }
}

impl fmt::Display for OAuth2Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap())
    }
}

impl IntoResponse for OAuth2Error {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            INVALID_CLIENT | INVALID_TOKEN => StatusCode::UNAUTHORIZED,
            TEMPORARILY_UNAVAILABLE => StatusCode::SERVICE_UNAVAILABLE,
            SERVER_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(&self)).into_response()
    }
}

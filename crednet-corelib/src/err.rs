//! To generate HTTP error response.
//!
//! ```
//! use crednet_corelib::err::ErrResp;
//! // To generate HTTP request body format error.
//! if format_error(body) {
//!     return Err(ErrResp::ErrParam(Some("input format error".to_string())));
//! }
//! ```

use std::{error::Error, fmt};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json;

/// The standard error definitions.
#[derive(Debug)]
pub enum ErrResp {
    ErrAuth(Option<String>),
    ErrDb(Option<String>),
    ErrNotFound(Option<String>),
    ErrParam(Option<String>),
    ErrPerm(Option<String>),
    ErrUnknown(Option<String>),
    Custom(u16, &'static str, Option<String>),
}

/// Used for generating HTTP body for errors.
#[derive(Serialize)]
struct RespJson<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

/// 401, no authenticated user or invalid token.
pub const E_AUTH: &'static str = "err_auth";
/// 503, database (store) error.
pub const E_DB: &'static str = "err_db";
/// 404, resource (in path) not found.
pub const E_NOT_FOUND: &'static str = "err_not_found";
/// 400, request (body) format error.
pub const E_PARAM: &'static str = "err_param";
/// 403, invalid permission.
pub const E_PERM: &'static str = "err_perm";
/// 500, unknown error.
pub const E_UNKNOWN: &'static str = "err_unknown";

/// To generate error JSON string for HTTP body.
pub fn to_json(code: &str, message: Option<&str>) -> String {
    serde_json::to_string(&RespJson { code, message }).unwrap()
}

impl ErrResp {
    fn parts(&'_ self) -> (StatusCode, RespJson<'_>) {
        let (status, code, message) = match self {
            ErrResp::ErrAuth(desc) => (StatusCode::UNAUTHORIZED, E_AUTH, desc),
            ErrResp::ErrDb(desc) => (StatusCode::SERVICE_UNAVAILABLE, E_DB, desc),
            ErrResp::ErrNotFound(desc) => (StatusCode::NOT_FOUND, E_NOT_FOUND, desc),
            ErrResp::ErrParam(desc) => (StatusCode::BAD_REQUEST, E_PARAM, desc),
            ErrResp::ErrPerm(desc) => (StatusCode::FORBIDDEN, E_PERM, desc),
            ErrResp::ErrUnknown(desc) => (StatusCode::INTERNAL_SERVER_ERROR, E_UNKNOWN, desc),
            ErrResp::Custom(status, code, desc) => (
                match StatusCode::from_u16(*status) {
                    Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    Ok(status) => status,
                },
                *code,
                desc,
            ),
        };
        (
            status,
            RespJson {
                code,
                message: message.as_deref(),
            },
        )
    }
}

impl fmt::Display for ErrResp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(&self.parts().1).unwrap())
    }
}

impl Error for ErrResp {}

impl IntoResponse for ErrResp {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(&body)).into_response()
    }
}

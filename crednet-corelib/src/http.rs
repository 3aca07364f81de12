//! HTTP helpers: request extractors that report errors as [`ErrResp`], and
//! `Authorization` header parsing.

use axum::{
    extract::{FromRequest, FromRequestParts, Query as AxumQuery, Request},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::err::ErrResp;

/// Like [`axum::extract::Json`], with [`ErrResp::ErrParam`] rejections.
pub struct Json<T>(pub T);

/// Like [`axum::extract::Query`], with [`ErrResp::ErrParam`] rejections.
pub struct Query<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrResp;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Bytes::from_request(req, state).await {
            Err(e) => return Err(ErrResp::ErrParam(Some(e.to_string()))),
            Ok(body) => body,
        };
        match serde_json::from_slice::<T>(&body) {
            Err(e) => Err(ErrResp::ErrParam(Some(e.to_string()))),
            Ok(value) => Ok(Json(value)),
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrResp;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Err(e) => Err(ErrResp::ErrParam(Some(e.to_string()))),
            Ok(query) => Ok(Query(query.0)),
        }
    }
}

/// Parse Authorization header content. Returns `None` means no Authorization header.
pub fn parse_header_auth<B>(req: &axum::http::Request<B>) -> Result<Option<String>, ErrResp> {
    let mut auth_all = req.headers().get_all(header::AUTHORIZATION).iter();
    let auth = match auth_all.next() {
        None => return Ok(None),
        Some(auth) => match auth.to_str() {
            Err(e) => return Err(ErrResp::ErrParam(Some(e.to_string()))),
            Ok(auth) => auth,
        },
    };
    if auth_all.next() != None {
        return Err(ErrResp::ErrParam(Some(
            "invalid multiple Authorization header".to_string(),
        )));
    }
    Ok(Some(auth.to_string()))
}

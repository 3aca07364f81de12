use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    http::Method,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures::future::BoxFuture;
use tower::{Layer, Service};

use crednet_corelib::{err::ErrResp, http::parse_header_auth};

use crate::models::{
    Model, access_token::AccessToken, client::QueryCond as ClientQueryCond,
    user::QueryCond as UserQueryCond,
};

pub type ApiScopeType = Vec<String>;

/// The layer that protects management APIs with access tokens of this authorization server.
#[derive(Clone)]
pub struct AuthService {
    model: Arc<dyn Model>,
    api_scopes: HashMap<Method, ApiScopeType>,
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    model: Arc<dyn Model>,
    api_scopes: HashMap<Method, HashSet<String>>,
    service: S,
}

/// The validated token grant of the request, stored in the request extensions.
#[derive(Clone)]
pub struct TokenInfo {
    pub token: AccessToken,
}

impl AuthService {
    pub fn new(model: &Arc<dyn Model>, api_scopes: HashMap<Method, ApiScopeType>) -> Self {
        AuthService {
            model: model.clone(),
            api_scopes,
        }
    }
}

impl<S> Layer<S> for AuthService {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        let mut api_scopes: HashMap<Method, HashSet<String>> = HashMap::new();
        for (k, v) in self.api_scopes.iter() {
            api_scopes.insert(k.clone(), v.iter().map(|s| s.clone()).collect());
        }
        AuthMiddleware {
            model: self.model.clone(),
            api_scopes,
            service: inner,
        }
    }
}

impl<S> Service<Request> for AuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let mut svc = self.service.clone();
        let model = self.model.clone();
        let api_scopes = self.api_scopes.clone();

        Box::pin(async move {
            let token = match parse_header_auth(&req) {
                Err(e) => return Ok(e.into_response()),
                Ok(auth) => match auth {
                    None => {
                        let e = ErrResp::ErrParam(Some("missing token".to_string()));
                        return Ok(e.into_response());
                    }
                    Some(auth) => match auth.strip_prefix("Bearer ") {
                        None => {
                            let e = ErrResp::ErrParam(Some("not a Bearer token".to_string()));
                            return Ok(e.into_response());
                        }
                        Some(token) => token.to_string(),
                    },
                },
            };

            let token = match model.access_token().get(token.as_str()).await {
                Err(e) => {
                    return Ok(ErrResp::ErrDb(Some(e.to_string())).into_response());
                }
                Ok(token) => match token {
                    None => return Ok(ErrResp::ErrAuth(None).into_response()),
                    Some(token) => token,
                },
            };
            if token.revoked {
                return Ok(ErrResp::ErrAuth(Some("token revoked".to_string())).into_response());
            } else if token.expires_at < Utc::now() {
                return Ok(ErrResp::ErrAuth(Some("token expired".to_string())).into_response());
            }

            if let Some(scopes) = api_scopes.get(req.method()) {
                if scopes.len() > 0 {
                    let token_scopes: HashSet<&str> = token.scope.split_whitespace().collect();
                    let api_scopes: HashSet<&str> = scopes.iter().map(|s| s.as_str()).collect();
                    if api_scopes.is_disjoint(&token_scopes) {
                        let e = ErrResp::ErrPerm(Some("invalid scope".to_string()));
                        return Ok(e.into_response());
                    }
                }
            }

            let cond = UserQueryCond {
                user_id: Some(token.user_id.as_str()),
                account: None,
            };
            let user = match model.user().get(&cond).await {
                Err(e) => {
                    return Ok(ErrResp::ErrDb(Some(e.to_string())).into_response());
                }
                Ok(user) => match user {
                    None => {
                        let e = ErrResp::ErrPerm(Some("user not exist".to_string()));
                        return Ok(e.into_response());
                    }
                    Some(user) => user,
                },
            };
            req.extensions_mut().insert(user);

            let cond = ClientQueryCond {
                client_id: Some(token.client_id.as_str()),
                ..Default::default()
            };
            let client = match model.client().get(&cond).await {
                Err(e) => {
                    return Ok(ErrResp::ErrDb(Some(e.to_string())).into_response());
                }
                Ok(client) => match client {
                    None => {
                        let e = ErrResp::ErrPerm(Some("client not exist".to_string()));
                        return Ok(e.into_response());
                    }
                    Some(client) => client,
                },
            };
            req.extensions_mut().insert(client);
            req.extensions_mut().insert(TokenInfo { token });

            let res = svc.call(req).await?;
            Ok(res)
        })
    }
}

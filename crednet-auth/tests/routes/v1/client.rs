use axum::http::StatusCode;
use axum_test::TestServer;
use laboratory::{SpecContext, expect};
use serde_json::{Value, json};

use crednet_auth::routes;

use super::{SESSION_TOKEN, STATE, super::oauth2::request::GetAuthRequest};
use crate::TestState;

pub fn post_client(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let routes_state = state.routes_state.as_ref().unwrap();

    runtime.block_on(async {
        let server = new_server(routes_state)?;

        let body = json!({"data": {
            "redirectUris": ["http://localhost/cb"],
            "name": "My App",
        }});
        let resp = server.post("/auth/api/v1/client").json(&body).await;
        expect(resp.status_code()).to_equal(StatusCode::BAD_REQUEST)?;

        // At least one valid redirect URI is required.
        let body = json!({"data": {
            "redirectUris": [],
            "name": "My App",
        }});
        let resp = server
            .post("/auth/api/v1/client")
            .authorization_bearer(SESSION_TOKEN)
            .json(&body)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::BAD_REQUEST)?;

        let body = json!({"data": {
            "redirectUris": [":://"],
            "name": "My App",
        }});
        let resp = server
            .post("/auth/api/v1/client")
            .authorization_bearer(SESSION_TOKEN)
            .json(&body)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::BAD_REQUEST)?;

        let body = json!({"data": {
            "redirectUris": ["http://localhost/cb"],
            "scopes": ["profile", "everything"],
            "name": "My App",
        }});
        let resp = server
            .post("/auth/api/v1/client")
            .authorization_bearer(SESSION_TOKEN)
            .json(&body)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::BAD_REQUEST)?;

        let body = json!({"data": {
            "redirectUris": ["http://localhost/cb"],
            "scopes": ["profile", "email"],
            "name": "My App",
            "image": "http://localhost/app.png",
        }});
        let resp = server
            .post("/auth/api/v1/client")
            .authorization_bearer(SESSION_TOKEN)
            .json(&body)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        let client_id = match data["data"]["clientId"].as_str() {
            None => return Err("no clientId".to_string()),
            Some(client_id) => client_id.to_string(),
        };
        let client_secret = match data["data"]["clientSecret"].as_str() {
            None => return Err("no clientSecret".to_string()),
            Some(secret) => secret.to_string(),
        };
        expect(client_secret.len() >= 24).to_equal(true)?;

        // The registration response is the only place the secret ever appears.
        let resp = server
            .get(format!("/auth/api/v1/client/{}", client_id).as_str())
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        expect(data["data"].get("clientSecret").is_none()).to_equal(true)?;
        expect(data["data"]["name"].as_str()).to_equal(Some("My App"))?;
        expect(data["data"]["active"].as_bool()).to_equal(Some(true))
    })
}

pub fn get_client_count(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let routes_state = state.routes_state.as_ref().unwrap();

    runtime.block_on(async {
        let server = new_server(routes_state)?;

        let resp = server.get("/auth/api/v1/client/count").await;
        expect(resp.status_code()).to_equal(StatusCode::BAD_REQUEST)?;

        // client1, client2 and the one registered by the POST test. client3 belongs to user2.
        let resp = server
            .get("/auth/api/v1/client/count")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        expect(data["data"]["count"].as_u64()).to_equal(Some(3))
    })
}

pub fn get_client_list(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let routes_state = state.routes_state.as_ref().unwrap();

    runtime.block_on(async {
        let server = new_server(routes_state)?;

        let resp = server
            .get("/auth/api/v1/client/list")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        let list = match data["data"].as_array() {
            None => return Err("data is not an array".to_string()),
            Some(list) => list,
        };
        expect(list.len()).to_equal(3)?;
        for item in list.iter() {
            if item.get("clientSecret").is_some() {
                return Err("list leaks the client secret".to_string());
            }
        }

        let resp = server
            .get("/auth/api/v1/client/list")
            .add_query_param("format", "array")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        let list = match data.as_array() {
            None => return Err("data is not an array".to_string()),
            Some(list) => list,
        };
        expect(list.len()).to_equal(3)?;

        let resp = server
            .get("/auth/api/v1/client/list")
            .add_query_param("sort", "name:desc")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        let list = match data["data"].as_array() {
            None => return Err("data is not an array".to_string()),
            Some(list) => list,
        };
        expect(list[0]["name"].as_str()).to_equal(Some("client2"))?;

        let resp = server
            .get("/auth/api/v1/client/list")
            .add_query_param("sort", "name:bad")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::BAD_REQUEST)
    })
}

pub fn get_client(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let routes_state = state.routes_state.as_ref().unwrap();

    runtime.block_on(async {
        let server = new_server(routes_state)?;

        let resp = server
            .get("/auth/api/v1/client/client1")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        expect(data["data"]["clientId"].as_str()).to_equal(Some("client1"))?;

        // Clients of other users are not visible.
        let resp = server
            .get("/auth/api/v1/client/client3")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::NOT_FOUND)?;

        let resp = server
            .get("/auth/api/v1/client/client_not_exist")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::NOT_FOUND)
    })
}

pub fn delete_client(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let routes_state = state.routes_state.as_ref().unwrap();

    runtime.block_on(async {
        let server = new_server(routes_state)?;

        // The client of the session itself cannot be deactivated.
        let resp = server
            .delete("/auth/api/v1/client/client1")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::FORBIDDEN)?;

        let resp = server
            .delete("/auth/api/v1/client/client3")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::NOT_FOUND)?;

        let resp = server
            .delete("/auth/api/v1/client/client2")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::NO_CONTENT)?;

        // Soft-disabled only, and idempotent.
        let resp = server
            .get("/auth/api/v1/client/client2")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::OK)?;
        let data = resp.json::<Value>();
        expect(data["data"]["active"].as_bool()).to_equal(Some(false))?;
        let resp = server
            .delete("/auth/api/v1/client/client2")
            .authorization_bearer(SESSION_TOKEN)
            .await;
        expect(resp.status_code()).to_equal(StatusCode::NO_CONTENT)?;

        // A deactivated client behaves as not-found for the authorization flow.
        let params = GetAuthRequest {
            response_type: "code".to_string(),
            client_id: "client2".to_string(),
            redirect_uri: crate::TEST_REDIRECT_URI.to_string(),
            scope: Some("profile".to_string()),
            ..Default::default()
        };
        let resp = server.get("/auth/oauth2/auth").add_query_params(&params).await;
        expect(resp.status_code()).to_equal(StatusCode::BAD_REQUEST)
    })
}

fn new_server(state: &routes::State) -> Result<TestServer, String> {
    match TestServer::new(routes::new_service(state)) {
        Err(e) => Err(format!("new server error: {}", e)),
        Ok(server) => Ok(server),
    }
}

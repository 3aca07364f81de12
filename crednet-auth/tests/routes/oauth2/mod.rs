use std::collections::HashMap;

use chrono::Utc;
use laboratory::{Suite, describe};
use tokio::runtime::Runtime;

use crednet_auth::models::{
    Model,
    mongodb_conn::{self, Options as MongoDbOptions},
};

use super::{
    libs::{create_client, create_user, new_state},
    remove_sqlite,
};
use crate::TestState;


pub const STATE: &'static str = "routes/oauth2";

pub fn suite(db_engine: &'static str) -> Suite<TestState> {
    describe(format!("routes.oauth2 - {}", db_engine), move |context| {
        context.it("GET /oauth2/auth", api::get_auth);
        context.it("GET /oauth2/login", api::get_login);
        context.it("POST /oauth2/login", api::post_login);
        context.it("GET /oauth2/authorize", api::get_authorize);
        context.it("POST /oauth2/authorize", api::post_authorize);
        context.it("POST /oauth2/token", api::post_token);
        context.it("POST /oauth2/refresh", api::post_refresh);
        context.it("GET /oauth2/userinfo", api::get_userinfo);
        context.it("GET /oauth2/userinfo scope subsets", api::userinfo_scopes);
        context.it("POST /oauth2/revoke", api::post_revoke);

        context
            .before_all(move |state| {
                state.insert(STATE, new_state(Some(db_engine)));
                let state = state.get(STATE).unwrap();
                let runtime = state.runtime.as_ref().unwrap();
                let model = state.routes_state.as_ref().unwrap().model.as_ref();
                before_all_dataset(runtime, model);
            })
            .after_all(after_all_fn);
    })
}

pub fn before_all_dataset(runtime: &Runtime, model: &dyn Model) {
    runtime.block_on(async {
        let now = Utc::now();
        if let Err(e) = model.user().add(&create_user("user", now)).await {
            println!("add user user error: {}", e);
        }

        let client = create_client("client1", "user", "secret1", &["profile", "email"]);
        if let Err(e) = model.client().add(&client).await {
            println!("add client client1 error: {}", e);
        }

        let client = create_client(
            "client-all",
            "user",
            "secret-all",
            &["profile", "email", "symbolic_name", "tokens", "reputation"],
        );
        if let Err(e) = model.client().add(&client).await {
            println!("add client client-all error: {}", e);
        }

        let mut client = create_client("inactive", "user", "secret-inactive", &["profile"]);
        client.active = false;
        if let Err(e) = model.client().add(&client).await {
            println!("add client inactive error: {}", e);
        }
    });
}

pub fn after_all_fn(state: &mut HashMap<&'static str, TestState>) -> () {
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    if state.mongodb.is_some() {
        runtime.block_on(async {
            let opts = MongoDbOptions {
                url: crate::TEST_MONGODB_URL.to_string(),
                db: crate::TEST_MONGODB_DB.to_string(),
                pool_size: None,
            };
            let conn = match mongodb_conn::connect(&opts).await {
                Err(_) => return (),
                Ok(conn) => conn,
            };
            if let Err(e) = conn.drop().await {
                println!("remove database error: {}", e);
            }
        });
    }
    remove_sqlite();
}

use std::collections::HashMap;

use chrono::Utc;
use laboratory::{Suite, describe};
use tokio::runtime::Runtime;

use crednet_auth::models::{
    Model,
    mongodb_conn::{self, Options as MongoDbOptions},
};

use super::{
    libs::{create_client, create_token, create_user, new_state},
    remove_sqlite,
};
use crate::TestState;

mod client;

pub const STATE: &'static str = "routes/v1";

/// The Bearer token used by the management API tests.
pub const SESSION_TOKEN: &'static str = "session-token";

pub fn suite(db_engine: &'static str) -> Suite<TestState> {
    describe(format!("routes.v1 - {}", db_engine), move |context| {
        context.it("GET /auth/tokeninfo", auth::get_tokeninfo);
        context.it("POST /auth/logout", auth::post_logout);
        context.it("POST /client", client::post_client);
        context.it("GET /client/count", client::get_client_count);
        context.it("GET /client/list", client::get_client_list);
        context.it("GET /client/{clientId}", client::get_client);
        context.it("DELETE /client/{clientId}", client::delete_client);
        context.it("GET /app/list", app::get_app_list);
        context.it("DELETE /app/{clientId}", app::delete_app);

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

fn before_all_dataset(runtime: &Runtime, model: &dyn Model) {
    runtime.block_on(async {
        let now = Utc::now();
        for name in ["user", "user2"] {
            if let Err(e) = model.user().add(&create_user(name, now)).await {
                println!("add user {} error: {}", name, e);
            }
        }

        let client = create_client("client1", "user", "secret1", &["profile", "email"]);
        if let Err(e) = model.client().add(&client).await {
            println!("add client client1 error: {}", e);
        }
        let client = create_client("client2", "user", "secret2", &["profile"]);
        if let Err(e) = model.client().add(&client).await {
            println!("add client client2 error: {}", e);
        }
        let client = create_client("client3", "user2", "secret3", &["profile"]);
        if let Err(e) = model.client().add(&client).await {
            println!("add client client3 error: {}", e);
        }

        let token = create_token(SESSION_TOKEN, "user", "client1", "profile email");
        if let Err(e) = model.access_token().add(&token).await {
            println!("add session token error: {}", e);
        }
    });
}

fn after_all_fn(state: &mut HashMap<&'static str, TestState>) -> () {
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

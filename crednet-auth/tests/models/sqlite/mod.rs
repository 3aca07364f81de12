use std::collections::HashMap;

use laboratory::{Suite, describe};
use tokio::runtime::Runtime;

use crednet_auth::models::{SqliteModel, SqliteOptions};

use crate::TestState;

mod access_token;
mod authorization_code;
mod client;
mod user;

pub const STATE: &'static str = "models/sqlite";

pub fn suite() -> Suite<TestState> {
    describe("models.sqlite", |context| {
        context.describe("conn", |context| {
            context.it("connect", conn::conn);
            context.it("models::new()", conn::models_new);
        });

        context.describe_import(describe("tables", |context| {
            context.describe("access_token", |context| {
                context.it("get()/add()", access_token::add);
                context.it("add() with duplicate token", access_token::add_dup);
                context.it("get_by_refresh()", access_token::get_by_refresh);
                context.it("list()", access_token::list);
                context.it("update() rotate", access_token::update_rotate);
                context.it("update() revoke", access_token::update_revoke);
                context.it("del() by access token", access_token::del_by_access_token);
                context.it("del() twice", access_token::del_twice);

                context.after_each(access_token::after_each_fn);
            });

            context.describe("authorization_code", |context| {
                context.it("get()/add()", authorization_code::add);
                context.it("add() with duplicate code", authorization_code::add_dup);
                context.it("mark_used()", authorization_code::mark_used);
                context.it(
                    "mark_used() not exist",
                    authorization_code::mark_used_not_exist,
                );
                context.it("del() by code", authorization_code::del_by_code);
                context.it("del() twice", authorization_code::del_twice);
                context.it("del() by user_id", authorization_code::del_by_user_id);
                context.it(
                    "del() by user and client",
                    authorization_code::del_by_user_client,
                );

                context.after_each(authorization_code::after_each_fn);
            });

            context.describe("client", |context| {
                context.it("get() by client_id", client::get_by_client_id);
                context.it("get() by user and client", client::get_by_user_client);
                context.it("add()", client::add);
                context.it("add() with duplicate ID", client::add_dup);
                context.it("update()", client::update);
                context.it("update() not exist", client::update_not_exist);
                context.it("count()", client::count);
                context.it("list()", client::list);
                context.it("list() sort", client::list_sort);
                context.it("list() offset limit", client::list_offset_limit);
                context.it("list() cursor", client::list_cursor);

                context.after_each(client::after_each_fn);
            });

            context.describe("user", |context| {
                context.it("get() by user_id / add()", user::add);
                context.it("add() with duplicate ID and account", user::add_dup);
                context.it("get() by account", user::get_by_account);
                context.it("del()", user::del);
                context.it("del() twice", user::del_twice);
                context.it("update()", user::update);

                context.after_each(user::after_each_fn);
            });

            context
                .before_all(|state| {
                    state.insert(STATE, new_state(true));
                })
                .after_all(tables_after_all);
        }));

        context
            .before_all(|state| {
                state.insert(STATE, new_state(false));
            })
            .after_all(|state| {
                let state = state.get_mut(STATE).unwrap();
                let runtime = state.runtime.as_ref().unwrap();
                if let Some(model) = state.sqlite.as_ref() {
                    runtime.block_on(async { model.get_connection().close().await });
                }
                remove_sqlite();
            });
    })
}

fn tables_after_all(state: &mut HashMap<&'static str, TestState>) -> () {
    let state = state.get_mut(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    if let Some(model) = state.sqlite.as_ref() {
        runtime.block_on(async { model.get_connection().close().await });
    }
    remove_sqlite();
}

fn remove_sqlite() {
    for suffix in ["", "-shm", "-wal"] {
        let file = format!("{}{}", crate::TEST_SQLITE_PATH, suffix);
        let mut path = std::env::temp_dir();
        path.push(file.as_str());
        if let Err(e) = std::fs::remove_file(path.as_path()) {
            println!("remove file {} error: {}", file.as_str(), e);
        }
    }
}

fn new_state(with_pool: bool) -> TestState {
    let runtime = match Runtime::new() {
        Err(e) => panic!("create runtime error: {}", e),
        Ok(runtime) => runtime,
    };

    if !with_pool {
        return TestState {
            runtime: Some(runtime),
            ..Default::default()
        };
    }
    let model = match runtime.block_on(async {
        let mut path = std::env::temp_dir();
        path.push(crate::TEST_SQLITE_PATH);
        SqliteModel::new(&SqliteOptions {
            path: path.to_str().unwrap().to_string(),
        })
        .await
    }) {
        Err(e) => panic!("create model error: {}", e),
        Ok(model) => Some(model),
    };
    TestState {
        runtime: Some(runtime),
        sqlite: model,
        ..Default::default()
    }
}

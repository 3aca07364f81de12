use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sql_builder::{SqlBuilder, quote};
use sqlx::SqlitePool;

use super::super::user::{QueryCond, Updates, User, UserModel};

/// Model instance.
pub struct Model {
    /// The associated database connection.
    conn: Arc<SqlitePool>,
}

/// SQLite schema.
#[derive(sqlx::FromRow)]
struct Schema {
    user_id: String,
    account: String,
    /// i64 as time tick from Epoch in milliseconds.
    created_at: i64,
    /// i64 as time tick from Epoch in milliseconds.
    modified_at: i64,
    /// i64 as time tick from Epoch in milliseconds. 0 means not verified.
    verified_at: i64,
    password: String,
    salt: String,
    name: String,
    photo_url: Option<String>,
    symbolic_name: Option<String>,
    token_balance: i64,
    reputation: String,
    breadcrumb_score: i64,
}

const TABLE_NAME: &'static str = "user";
const FIELDS: &'static [&'static str] = &[
    "user_id",
    "account",
    "created_at",
    "modified_at",
    "verified_at",
    "password",
    "salt",
    "name",
    "photo_url",
    "symbolic_name",
    "token_balance",
    "reputation",
    "breadcrumb_score",
];
const TABLE_INIT_SQL: &'static str = "\
    CREATE TABLE IF NOT EXISTS user (\
    user_id TEXT NOT NULL UNIQUE,\
    account TEXT NOT NULL UNIQUE,\
    created_at INTEGER NOT NULL,\
    modified_at INTEGER NOT NULL,\
    verified_at INTEGER NOT NULL,\
    password TEXT NOT NULL,\
    salt TEXT NOT NULL,\
    name TEXT NOT NULL,\
    photo_url TEXT,\
    symbolic_name TEXT,\
    token_balance INTEGER NOT NULL,\
    reputation TEXT NOT NULL,\
    breadcrumb_score INTEGER NOT NULL,\
    PRIMARY KEY (user_id))";

impl Model {
    /// To create the model instance with a database connection.
    pub async fn new(conn: Arc<SqlitePool>) -> Result<Self, Box<dyn StdError>> {
        let model = Model { conn };
        model.init().await?;
        Ok(model)
    }
}

#[async_trait]
impl UserModel for Model {
    async fn init(&self) -> Result<(), Box<dyn StdError>> {
        let _ = sqlx::query(TABLE_INIT_SQL)
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }

    async fn get(&self, cond: &QueryCond) -> Result<Option<User>, Box<dyn StdError>> {
        let sql = build_where(SqlBuilder::select_from(TABLE_NAME).fields(FIELDS), cond).sql()?;

        let result: Result<Schema, sqlx::Error> = sqlx::query_as(sql.as_str())
            .fetch_one(self.conn.as_ref())
            .await;

        let row = match result {
            Err(e) => match e {
                sqlx::Error::RowNotFound => return Ok(None),
                _ => return Err(Box::new(e)),
            },
            Ok(row) => row,
        };
        Ok(Some(User {
            user_id: row.user_id,
            account: row.account,
            created_at: Utc.timestamp_nanos(row.created_at * 1000000),
            modified_at: Utc.timestamp_nanos(row.modified_at * 1000000),
            verified_at: match row.verified_at {
                0 => None,
                _ => Some(Utc.timestamp_nanos(row.verified_at * 1000000)),
            },
            password: row.password,
            salt: row.salt,
            name: row.name,
            photo_url: row.photo_url,
            symbolic_name: row.symbolic_name,
            token_balance: row.token_balance,
            reputation: row.reputation,
            breadcrumb_score: row.breadcrumb_score,
        }))
    }

    async fn add(&self, user: &User) -> Result<(), Box<dyn StdError>> {
        let photo_url = match user.photo_url.as_deref() {
            None => "NULL".to_string(),
            Some(value) => quote(value),
        };
        let symbolic_name = match user.symbolic_name.as_deref() {
            None => "NULL".to_string(),
            Some(value) => quote(value),
        };
        let values = vec![
            quote(user.user_id.as_str()),
            quote(user.account.as_str()),
            user.created_at.timestamp_millis().to_string(),
            user.modified_at.timestamp_millis().to_string(),
            match user.verified_at.as_ref() {
                None => "0".to_string(),
                Some(value) => value.timestamp_millis().to_string(),
            },
            quote(user.password.as_str()),
            quote(user.salt.as_str()),
            quote(user.name.as_str()),
            photo_url,
            symbolic_name,
            user.token_balance.to_string(),
            quote(user.reputation.as_str()),
            user.breadcrumb_score.to_string(),
        ];
        let sql = SqlBuilder::insert_into(TABLE_NAME)
            .fields(FIELDS)
            .values(&values)
            .sql()?;
        let _ = sqlx::query(sql.as_str())
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }

    async fn del(&self, user_id: &str) -> Result<(), Box<dyn StdError>> {
        let sql = SqlBuilder::delete_from(TABLE_NAME)
            .and_where_eq("user_id", quote(user_id))
            .sql()?;
        let _ = sqlx::query(sql.as_str())
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }

    async fn update(&self, user_id: &str, updates: &Updates) -> Result<(), Box<dyn StdError>> {
        let sql = match build_update(&mut SqlBuilder::update_table(TABLE_NAME), user_id, updates) {
            None => return Ok(()),
            Some(builder) => builder.sql()?,
        };
        let _ = sqlx::query(sql.as_str())
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }
}

/// Transforms query conditions to the SQL builder.
fn build_where<'a>(builder: &'a mut SqlBuilder, cond: &QueryCond<'a>) -> &'a mut SqlBuilder {
    if let Some(value) = cond.user_id {
        builder.and_where_eq("user_id", quote(value));
    }
    if let Some(value) = cond.account {
        builder.and_where_eq("account", quote(value));
    }
    builder
}

/// Transforms the model object to the SQL builder.
fn build_update<'a>(
    builder: &'a mut SqlBuilder,
    user_id: &str,
    updates: &Updates,
) -> Option<&'a mut SqlBuilder> {
    let mut count = 0;
    if let Some(value) = updates.modified_at.as_ref() {
        builder.set("modified_at", value.timestamp_millis());
        count += 1;
    }
    if let Some(value) = updates.verified_at.as_ref() {
        builder.set("verified_at", value.timestamp_millis());
        count += 1;
    }
    if let Some(value) = updates.password.as_ref() {
        builder.set("password", quote(value));
        count += 1;
    }
    if let Some(value) = updates.salt.as_ref() {
        builder.set("salt", quote(value));
        count += 1;
    }
    if let Some(value) = updates.name {
        builder.set("name", quote(value));
        count += 1;
    }
    if let Some(value) = updates.photo_url.as_ref() {
        match value {
            None => {
                builder.set("photo_url", "NULL");
            }
            Some(value) => {
                builder.set("photo_url", quote(value));
            }
        }
        count += 1;
    }
    if let Some(value) = updates.symbolic_name.as_ref() {
        match value {
            None => {
                builder.set("symbolic_name", "NULL");
            }
            Some(value) => {
                builder.set("symbolic_name", quote(value));
            }
        }
        count += 1;
    }
    if let Some(value) = updates.token_balance {
        builder.set("token_balance", value);
        count += 1;
    }
    if let Some(value) = updates.reputation {
        builder.set("reputation", quote(value));
        count += 1;
    }
    if let Some(value) = updates.breadcrumb_score {
        builder.set("breadcrumb_score", value);
        count += 1;
    }
    if count == 0 {
        return None;
    }

    builder.and_where_eq("user_id", quote(user_id));
    Some(builder)
}

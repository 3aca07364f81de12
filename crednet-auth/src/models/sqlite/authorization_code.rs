use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sql_builder::{SqlBuilder, quote};
use sqlx::SqlitePool;

use super::super::authorization_code::{AuthorizationCode, AuthorizationCodeModel, QueryCond};

/// Model instance.
pub struct Model {
    /// The associated database connection.
    conn: Arc<SqlitePool>,
}

/// SQLite schema.
#[derive(sqlx::FromRow)]
struct Schema {
    code: String,
    /// i64 as time tick from Epoch in milliseconds.
    created_at: i64,
    /// i64 as time tick from Epoch in milliseconds.
    expires_at: i64,
    redirect_uri: String,
    scope: String,
    client_id: String,
    user_id: String,
    used: i64,
}

const TABLE_NAME: &'static str = "authorization_code";
const FIELDS: &'static [&'static str] = &[
    "code",
    "created_at",
    "expires_at",
    "redirect_uri",
    "scope",
    "client_id",
    "user_id",
    "used",
];
const TABLE_INIT_SQL: &'static str = "\
    CREATE TABLE IF NOT EXISTS authorization_code (\
    code TEXT NOT NULL UNIQUE,\
    created_at INTEGER NOT NULL,\
    expires_at INTEGER NOT NULL,\
    redirect_uri TEXT NOT NULL,\
    scope TEXT NOT NULL,\
    client_id TEXT NOT NULL,\
    user_id TEXT NOT NULL,\
    used INTEGER NOT NULL,\
    PRIMARY KEY (code))";

impl Model {
    /// To create the model instance with a database connection.
    pub async fn new(conn: Arc<SqlitePool>) -> Result<Self, Box<dyn StdError>> {
        let model = Model { conn };
        model.init().await?;
        Ok(model)
    }
}

#[async_trait]
impl AuthorizationCodeModel for Model {
    async fn init(&self) -> Result<(), Box<dyn StdError>> {
        let _ = sqlx::query(TABLE_INIT_SQL)
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<AuthorizationCode>, Box<dyn StdError>> {
        let sql = SqlBuilder::select_from(TABLE_NAME)
            .fields(FIELDS)
            .and_where_eq("code", quote(code))
            .sql()?;

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
        Ok(Some(AuthorizationCode {
            code: row.code,
            created_at: Utc.timestamp_nanos(row.created_at * 1000000),
            expires_at: Utc.timestamp_nanos(row.expires_at * 1000000),
            redirect_uri: row.redirect_uri,
            scope: row.scope,
            client_id: row.client_id,
            user_id: row.user_id,
            used: row.used != 0,
        }))
    }

    async fn add(&self, code: &AuthorizationCode) -> Result<(), Box<dyn StdError>> {
        let values = vec![
            quote(code.code.as_str()),
            code.created_at.timestamp_millis().to_string(),
            code.expires_at.timestamp_millis().to_string(),
            quote(code.redirect_uri.as_str()),
            quote(code.scope.as_str()),
            quote(code.client_id.as_str()),
            quote(code.user_id.as_str()),
            match code.used {
                false => "0".to_string(),
                true => "1".to_string(),
            },
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

    async fn mark_used(&self, code: &str) -> Result<bool, Box<dyn StdError>> {
        // The conditional UPDATE is the single atomic step that makes codes single-use under
        // concurrent redemptions.
        let sql = SqlBuilder::update_table(TABLE_NAME)
            .set("used", 1)
            .and_where_eq("code", quote(code))
            .and_where_eq("used", 0)
            .sql()?;
        let result = sqlx::query(sql.as_str())
            .execute(self.conn.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn del(&self, cond: &QueryCond) -> Result<(), Box<dyn StdError>> {
        let sql = build_where(&mut SqlBuilder::delete_from(TABLE_NAME), cond).sql()?;
        let _ = sqlx::query(sql.as_str())
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }
}

/// Transforms query conditions to the SQL builder.
fn build_where<'a>(builder: &'a mut SqlBuilder, cond: &QueryCond<'a>) -> &'a mut SqlBuilder {
    if let Some(value) = cond.code {
        builder.and_where_eq("code", quote(value));
    }
    if let Some(value) = cond.client_id {
        builder.and_where_eq("client_id", quote(value));
    }
    if let Some(value) = cond.user_id {
        builder.and_where_eq("user_id", quote(value));
    }
    builder
}

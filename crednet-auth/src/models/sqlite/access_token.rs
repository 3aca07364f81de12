use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::TryStreamExt;
use sql_builder::{SqlBuilder, quote};
use sqlx::SqlitePool;

use super::super::access_token::{
    AccessToken, AccessTokenModel, ListQueryCond, QueryCond, Updates,
};

/// Model instance.
pub struct Model {
    /// The associated database connection.
    conn: Arc<SqlitePool>,
}

/// SQLite schema.
#[derive(sqlx::FromRow)]
struct Schema {
    access_token: String,
    refresh_token: String,
    /// i64 as time tick from Epoch in milliseconds.
    created_at: i64,
    /// i64 as time tick from Epoch in milliseconds.
    expires_at: i64,
    revoked: i64,
    scope: String,
    client_id: String,
    redirect_uri: String,
    user_id: String,
}

const TABLE_NAME: &'static str = "access_token";
const FIELDS: &'static [&'static str] = &[
    "access_token",
    "refresh_token",
    "created_at",
    "expires_at",
    "revoked",
    "scope",
    "client_id",
    "redirect_uri",
    "user_id",
];
const TABLE_INIT_SQL: &'static str = "\
    CREATE TABLE IF NOT EXISTS access_token (\
    access_token TEXT NOT NULL UNIQUE,\
    refresh_token TEXT NOT NULL UNIQUE,\
    created_at INTEGER NOT NULL,\
    expires_at INTEGER NOT NULL,\
    revoked INTEGER NOT NULL,\
    scope TEXT NOT NULL,\
    client_id TEXT NOT NULL,\
    redirect_uri TEXT NOT NULL,\
    user_id TEXT NOT NULL,\
    PRIMARY KEY (access_token))";

impl Model {
    /// To create the model instance with a database connection.
    pub async fn new(conn: Arc<SqlitePool>) -> Result<Self, Box<dyn StdError>> {
        let model = Model { conn };
        model.init().await?;
        Ok(model)
    }

    async fn get_one(&self, sql: &str) -> Result<Option<AccessToken>, Box<dyn StdError>> {
        let result: Result<Schema, sqlx::Error> =
            sqlx::query_as(sql).fetch_one(self.conn.as_ref()).await;

        match result {
            Err(e) => match e {
                sqlx::Error::RowNotFound => Ok(None),
                _ => Err(Box::new(e)),
            },
            Ok(row) => Ok(Some(schema_to_token(row))),
        }
    }
}

#[async_trait]
impl AccessTokenModel for Model {
    async fn init(&self) -> Result<(), Box<dyn StdError>> {
        let _ = sqlx::query(TABLE_INIT_SQL)
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }

    async fn get(&self, access_token: &str) -> Result<Option<AccessToken>, Box<dyn StdError>> {
        let sql = SqlBuilder::select_from(TABLE_NAME)
            .fields(FIELDS)
            .and_where_eq("access_token", quote(access_token))
            .sql()?;
        self.get_one(sql.as_str()).await
    }

    async fn get_by_refresh(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, Box<dyn StdError>> {
        let sql = SqlBuilder::select_from(TABLE_NAME)
            .fields(FIELDS)
            .and_where_eq("refresh_token", quote(refresh_token))
            .sql()?;
        self.get_one(sql.as_str()).await
    }

    async fn list(&self, cond: &ListQueryCond) -> Result<Vec<AccessToken>, Box<dyn StdError>> {
        let sql = build_list_where(
            SqlBuilder::select_from(TABLE_NAME)
                .fields(FIELDS)
                .order_desc("created_at"),
            cond,
        )
        .sql()?;

        let mut rows = sqlx::query_as::<_, Schema>(sql.as_str()).fetch(self.conn.as_ref());
        let mut list = vec![];
        while let Some(row) = rows.try_next().await? {
            list.push(schema_to_token(row));
        }
        Ok(list)
    }

    async fn add(&self, token: &AccessToken) -> Result<(), Box<dyn StdError>> {
        let values = vec![
            quote(token.access_token.as_str()),
            quote(token.refresh_token.as_str()),
            token.created_at.timestamp_millis().to_string(),
            token.expires_at.timestamp_millis().to_string(),
            match token.revoked {
                false => "0".to_string(),
                true => "1".to_string(),
            },
            quote(token.scope.as_str()),
            quote(token.client_id.as_str()),
            quote(token.redirect_uri.as_str()),
            quote(token.user_id.as_str()),
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

    async fn update(
        &self,
        cond: &QueryCond,
        updates: &Updates,
    ) -> Result<(), Box<dyn StdError>> {
        let sql = match build_update_where(&mut SqlBuilder::update_table(TABLE_NAME), cond, updates)
        {
            None => return Ok(()),
            Some(builder) => builder.sql()?,
        };
        let _ = sqlx::query(sql.as_str())
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }

    async fn del(&self, cond: &QueryCond) -> Result<(), Box<dyn StdError>> {
        let sql = build_where(&mut SqlBuilder::delete_from(TABLE_NAME), cond).sql()?;
        let _ = sqlx::query(sql.as_str())
            .execute(self.conn.as_ref())
            .await?;
        Ok(())
    }
}

/// Transforms the schema row to the model object.
fn schema_to_token(row: Schema) -> AccessToken {
    AccessToken {
        access_token: row.access_token,
        refresh_token: row.refresh_token,
        created_at: Utc.timestamp_nanos(row.created_at * 1000000),
        expires_at: Utc.timestamp_nanos(row.expires_at * 1000000),
        revoked: row.revoked != 0,
        scope: row.scope,
        client_id: row.client_id,
        redirect_uri: row.redirect_uri,
        user_id: row.user_id,
    }
}

/// Transforms query conditions to the SQL builder.
fn build_where<'a>(builder: &'a mut SqlBuilder, cond: &QueryCond<'a>) -> &'a mut SqlBuilder {
    if let Some(value) = cond.access_token {
        builder.and_where_eq("access_token", quote(value));
    }
    if let Some(value) = cond.refresh_token {
        builder.and_where_eq("refresh_token", quote(value));
    }
    if let Some(value) = cond.client_id {
        builder.and_where_eq("client_id", quote(value));
    }
    if let Some(value) = cond.user_id {
        builder.and_where_eq("user_id", quote(value));
    }
    builder
}

/// Transforms query conditions to the SQL builder.
fn build_list_where<'a>(
    builder: &'a mut SqlBuilder,
    cond: &ListQueryCond<'a>,
) -> &'a mut SqlBuilder {
    if let Some(value) = cond.user_id {
        builder.and_where_eq("user_id", quote(value));
    }
    if let Some(value) = cond.client_id {
        builder.and_where_eq("client_id", quote(value));
    }
    if let Some(value) = cond.revoked {
        builder.and_where_eq(
            "revoked",
            match value {
                false => 0,
                true => 1,
            },
        );
    }
    builder
}

/// Transforms query conditions and the model object to the SQL builder.
fn build_update_where<'a>(
    builder: &'a mut SqlBuilder,
    cond: &QueryCond<'a>,
    updates: &Updates,
) -> Option<&'a mut SqlBuilder> {
    let mut count = 0;
    if let Some(value) = updates.access_token {
        builder.set("access_token", quote(value));
        count += 1;
    }
    if let Some(value) = updates.expires_at.as_ref() {
        builder.set("expires_at", value.timestamp_millis());
        count += 1;
    }
    if let Some(value) = updates.revoked {
        builder.set(
            "revoked",
            match value {
                false => 0,
                true => 1,
            },
        );
        count += 1;
    }
    if count == 0 {
        return None;
    }

    if let Some(value) = cond.access_token {
        builder.and_where_eq("access_token", quote(value));
    }
    if let Some(value) = cond.refresh_token {
        builder.and_where_eq("refresh_token", quote(value));
    }
    if let Some(value) = cond.client_id {
        builder.and_where_eq("client_id", quote(value));
    }
    if let Some(value) = cond.user_id {
        builder.and_where_eq("user_id", quote(value));
    }
    Some(builder)
}

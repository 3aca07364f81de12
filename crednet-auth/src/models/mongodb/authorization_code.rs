use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Database,
    bson::{DateTime, Document, doc},
};
use serde::{Deserialize, Serialize};

use super::super::authorization_code::{AuthorizationCode, AuthorizationCodeModel, QueryCond};

/// Model instance.
pub struct Model {
    /// The associated database connection.
    conn: Arc<Database>,
}

/// MongoDB schema.
#[derive(Deserialize, Serialize)]
struct Schema {
    code: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime,
    #[serde(rename = "expiresAt")]
    expires_at: DateTime,
    #[serde(rename = "redirectUri")]
    redirect_uri: String,
    scope: String,
    #[serde(rename = "clientId")]
    client_id: String,
    #[serde(rename = "userId")]
    user_id: String,
    used: bool,
}

const COL_NAME: &'static str = "authorizationCode";

impl Model {
    /// To create the model instance with a database connection.
    pub async fn new(conn: Arc<Database>) -> Result<Self, Box<dyn StdError>> {
        let model = Model { conn };
        model.init().await?;
        Ok(model)
    }
}

#[async_trait]
impl AuthorizationCodeModel for Model {
    async fn init(&self) -> Result<(), Box<dyn StdError>> {
        let indexes = vec![
            doc! {"name": "code_1", "key": {"code": 1}, "unique": true},
            doc! {"name": "clientId_1", "key": {"clientId": 1}},
            doc! {"name": "userId_1", "key": {"userId": 1}},
        ];
        let command = doc! {
            "createIndexes": COL_NAME,
            "indexes": indexes,
        };
        self.conn.run_command(command).await?;
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<AuthorizationCode>, Box<dyn StdError>> {
        let mut cursor = self
            .conn
            .collection::<Schema>(COL_NAME)
            .find(doc! {"code": code})
            .await?;
        if let Some(item) = cursor.try_next().await? {
            return Ok(Some(AuthorizationCode {
                code: item.code,
                created_at: item.created_at.into(),
                expires_at: item.expires_at.into(),
                redirect_uri: item.redirect_uri,
                scope: item.scope,
                client_id: item.client_id,
                user_id: item.user_id,
                used: item.used,
            }));
        }
        Ok(None)
    }

    async fn add(&self, code: &AuthorizationCode) -> Result<(), Box<dyn StdError>> {
        let item = Schema {
            code: code.code.clone(),
            created_at: code.created_at.into(),
            expires_at: code.expires_at.into(),
            redirect_uri: code.redirect_uri.clone(),
            scope: code.scope.clone(),
            client_id: code.client_id.clone(),
            user_id: code.user_id.clone(),
            used: code.used,
        };
        self.conn
            .collection::<Schema>(COL_NAME)
            .insert_one(item)
            .await?;
        Ok(())
    }

    async fn mark_used(&self, code: &str) -> Result<bool, Box<dyn StdError>> {
        // The filtered update is the single atomic step that makes codes single-use under
        // concurrent redemptions.
        let result = self
            .conn
            .collection::<Schema>(COL_NAME)
            .update_one(
                doc! {"code": code, "used": false},
                doc! {"$set": {"used": true}},
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn del(&self, cond: &QueryCond) -> Result<(), Box<dyn StdError>> {
        let filter = get_query_filter(cond);
        self.conn
            .collection::<Schema>(COL_NAME)
            .delete_many(filter)
            .await?;
        Ok(())
    }
}

/// Transforms query conditions to the MongoDB document.
fn get_query_filter(cond: &QueryCond) -> Document {
    let mut filter = Document::new();
    if let Some(value) = cond.code {
        filter.insert("code", value);
    }
    if let Some(value) = cond.client_id {
        filter.insert("clientId", value);
    }
    if let Some(value) = cond.user_id {
        filter.insert("userId", value);
    }
    filter
}

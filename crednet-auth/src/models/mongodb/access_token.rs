use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Database,
    bson::{DateTime, Document, doc},
};
use serde::{Deserialize, Serialize};

use super::super::access_token::{
    AccessToken, AccessTokenModel, ListQueryCond, QueryCond, Updates,
};

/// Model instance.
pub struct Model {
    /// The associated database connection.
    conn: Arc<Database>,
}

/// MongoDB schema.
#[derive(Deserialize, Serialize)]
struct Schema {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime,
    #[serde(rename = "expiresAt")]
    expires_at: DateTime,
    revoked: bool,
    scope: String,
    #[serde(rename = "clientId")]
    client_id: String,
    #[serde(rename = "redirectUri")]
    redirect_uri: String,
    #[serde(rename = "userId")]
    user_id: String,
}

const COL_NAME: &'static str = "accessToken";

impl Model {
    /// To create the model instance with a database connection.
    pub async fn new(conn: Arc<Database>) -> Result<Self, Box<dyn StdError>> {
        let model = Model { conn };
        model.init().await?;
        Ok(model)
    }

    async fn get_one(&self, filter: Document) -> Result<Option<AccessToken>, Box<dyn StdError>> {
        let mut cursor = self
            .conn
            .collection::<Schema>(COL_NAME)
            .find(filter)
            .await?;
        if let Some(item) = cursor.try_next().await? {
            return Ok(Some(schema_to_token(item)));
        }
        Ok(None)
    }
}

#[async_trait]
impl AccessTokenModel for Model {
    async fn init(&self) -> Result<(), Box<dyn StdError>> {
        let indexes = vec![
            doc! {"name": "accessToken_1", "key": {"accessToken": 1}, "unique": true},
            doc! {"name": "refreshToken_1", "key": {"refreshToken": 1}, "unique": true},
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

    async fn get(&self, access_token: &str) -> Result<Option<AccessToken>, Box<dyn StdError>> {
        self.get_one(doc! {"accessToken": access_token}).await
    }

    async fn get_by_refresh(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, Box<dyn StdError>> {
        self.get_one(doc! {"refreshToken": refresh_token}).await
    }

    async fn list(&self, cond: &ListQueryCond) -> Result<Vec<AccessToken>, Box<dyn StdError>> {
        let filter = get_list_query_filter(cond);
        let mut cursor = self
            .conn
            .collection::<Schema>(COL_NAME)
            .find(filter)
            .sort(doc! {"createdAt": -1})
            .await?;
        let mut list = Vec::new();
        while let Some(item) = cursor.try_next().await? {
            list.push(schema_to_token(item));
        }
        Ok(list)
    }

    async fn add(&self, token: &AccessToken) -> Result<(), Box<dyn StdError>> {
        let item = Schema {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            created_at: token.created_at.into(),
            expires_at: token.expires_at.into(),
            revoked: token.revoked,
            scope: token.scope.clone(),
            client_id: token.client_id.clone(),
            redirect_uri: token.redirect_uri.clone(),
            user_id: token.user_id.clone(),
        };
        self.conn
            .collection::<Schema>(COL_NAME)
            .insert_one(item)
            .await?;
        Ok(())
    }

    async fn update(
        &self,
        cond: &QueryCond,
        updates: &Updates,
    ) -> Result<(), Box<dyn StdError>> {
        let filter = get_query_filter(cond);
        if let Some(updates) = get_update_doc(updates) {
            self.conn
                .collection::<Schema>(COL_NAME)
                .update_many(filter, updates)
                .await?;
        }
        Ok(())
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

/// Transforms the schema item to the model object.
fn schema_to_token(item: Schema) -> AccessToken {
    AccessToken {
        access_token: item.access_token,
        refresh_token: item.refresh_token,
        created_at: item.created_at.into(),
        expires_at: item.expires_at.into(),
        revoked: item.revoked,
        scope: item.scope,
        client_id: item.client_id,
        redirect_uri: item.redirect_uri,
        user_id: item.user_id,
    }
}

/// Transforms query conditions to the MongoDB document.
fn get_query_filter(cond: &QueryCond) -> Document {
    let mut filter = Document::new();
    if let Some(value) = cond.access_token {
        filter.insert("accessToken", value);
    }
    if let Some(value) = cond.refresh_token {
        filter.insert("refreshToken", value);
    }
    if let Some(value) = cond.client_id {
        filter.insert("clientId", value);
    }
    if let Some(value) = cond.user_id {
        filter.insert("userId", value);
    }
    filter
}

/// Transforms query conditions to the MongoDB document.
fn get_list_query_filter(cond: &ListQueryCond) -> Document {
    let mut filter = Document::new();
    if let Some(value) = cond.user_id {
        filter.insert("userId", value);
    }
    if let Some(value) = cond.client_id {
        filter.insert("clientId", value);
    }
    if let Some(value) = cond.revoked {
        filter.insert("revoked", value);
    }
    filter
}

/// Transforms the model object to the MongoDB document.
fn get_update_doc(updates: &Updates) -> Option<Document> {
    let mut count = 0;
    let mut document = Document::new();
    if let Some(value) = updates.access_token {
        document.insert("accessToken", value);
        count += 1;
    }
    if let Some(value) = updates.expires_at.as_ref() {
        document.insert("expiresAt", DateTime::from_millis(value.timestamp_millis()));
        count += 1;
    }
    if let Some(value) = updates.revoked {
        document.insert("revoked", value);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(doc! {"$set": document})
}

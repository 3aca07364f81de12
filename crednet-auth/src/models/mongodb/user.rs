use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Database,
    bson::{Bson, DateTime, Document, doc},
};
use serde::{Deserialize, Serialize};

use super::super::user::{QueryCond, Updates, User, UserModel};

/// Model instance.
pub struct Model {
    /// The associated database connection.
    conn: Arc<Database>,
}

/// MongoDB schema.
#[derive(Deserialize, Serialize)]
struct Schema {
    #[serde(rename = "userId")]
    user_id: String,
    account: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime,
    #[serde(rename = "modifiedAt")]
    modified_at: DateTime,
    #[serde(rename = "verifiedAt")]
    verified_at: Option<DateTime>,
    password: String,
    salt: String,
    name: String,
    #[serde(rename = "photoUrl")]
    photo_url: Option<String>,
    #[serde(rename = "symbolicName")]
    symbolic_name: Option<String>,
    #[serde(rename = "tokenBalance")]
    token_balance: i64,
    reputation: String,
    #[serde(rename = "breadcrumbScore")]
    breadcrumb_score: i64,
}

const COL_NAME: &'static str = "user";

impl Model {
    /// To create the model instance with a database connection.
    pub async fn new(conn: Arc<Database>) -> Result<Self, Box<dyn StdError>> {
        let model = Model { conn };
        model.init().await?;
        Ok(model)
    }
}

#[async_trait]
impl UserModel for Model {
    async fn init(&self) -> Result<(), Box<dyn StdError>> {
        let indexes = vec![
            doc! {"name": "userId_1", "key": {"userId": 1}, "unique": true},
            doc! {"name": "account_1", "key": {"account": 1}, "unique": true},
        ];
        let command = doc! {
            "createIndexes": COL_NAME,
            "indexes": indexes,
        };
        self.conn.run_command(command).await?;
        Ok(())
    }

    async fn get(&self, cond: &QueryCond) -> Result<Option<User>, Box<dyn StdError>> {
        let filter = get_query_filter(cond);
        let mut cursor = self
            .conn
            .collection::<Schema>(COL_NAME)
            .find(filter)
            .await?;
        if let Some(item) = cursor.try_next().await? {
            return Ok(Some(User {
                user_id: item.user_id,
                account: item.account,
                created_at: item.created_at.into(),
                modified_at: item.modified_at.into(),
                verified_at: match item.verified_at {
                    None => None,
                    Some(value) => Some(value.into()),
                },
                password: item.password,
                salt: item.salt,
                name: item.name,
                photo_url: item.photo_url,
                symbolic_name: item.symbolic_name,
                token_balance: item.token_balance,
                reputation: item.reputation,
                breadcrumb_score: item.breadcrumb_score,
            }));
        }
        Ok(None)
    }

    async fn add(&self, user: &User) -> Result<(), Box<dyn StdError>> {
        let item = Schema {
            user_id: user.user_id.clone(),
            account: user.account.clone(),
            created_at: user.created_at.into(),
            modified_at: user.modified_at.into(),
            verified_at: match user.verified_at.as_ref() {
                None => None,
                Some(value) => Some((*value).into()),
            },
            password: user.password.clone(),
            salt: user.salt.clone(),
            name: user.name.clone(),
            photo_url: user.photo_url.clone(),
            symbolic_name: user.symbolic_name.clone(),
            token_balance: user.token_balance,
            reputation: user.reputation.clone(),
            breadcrumb_score: user.breadcrumb_score,
        };
        self.conn
            .collection::<Schema>(COL_NAME)
            .insert_one(item)
            .await?;
        Ok(())
    }

    async fn del(&self, user_id: &str) -> Result<(), Box<dyn StdError>> {
        self.conn
            .collection::<Schema>(COL_NAME)
            .delete_many(doc! {"userId": user_id})
            .await?;
        Ok(())
    }

    async fn update(&self, user_id: &str, updates: &Updates) -> Result<(), Box<dyn StdError>> {
        if let Some(updates) = get_update_doc(updates) {
            self.conn
                .collection::<Schema>(COL_NAME)
                .update_one(doc! {"userId": user_id}, updates)
                .await?;
        }
        Ok(())
    }
}

/// Transforms query conditions to the MongoDB document.
fn get_query_filter(cond: &QueryCond) -> Document {
    let mut filter = Document::new();
    if let Some(value) = cond.user_id {
        filter.insert("userId", value);
    }
    if let Some(value) = cond.account {
        filter.insert("account", value);
    }
    filter
}

/// Transforms the model object to the MongoDB document.
fn get_update_doc(updates: &Updates) -> Option<Document> {
    let mut count = 0;
    let mut document = Document::new();
    if let Some(value) = updates.modified_at.as_ref() {
        document.insert("modifiedAt", DateTime::from_millis(value.timestamp_millis()));
        count += 1;
    }
    if let Some(value) = updates.verified_at.as_ref() {
        document.insert("verifiedAt", DateTime::from_millis(value.timestamp_millis()));
        count += 1;
    }
    if let Some(value) = updates.password.as_ref() {
        document.insert("password", value);
        count += 1;
    }
    if let Some(value) = updates.salt.as_ref() {
        document.insert("salt", value);
        count += 1;
    }
    if let Some(value) = updates.name {
        document.insert("name", value);
        count += 1;
    }
    if let Some(value) = updates.photo_url.as_ref() {
        match value {
            None => {
                document.insert("photoUrl", Bson::Null);
            }
            Some(value) => {
                document.insert("photoUrl", *value);
            }
        }
        count += 1;
    }
    if let Some(value) = updates.symbolic_name.as_ref() {
        match value {
            None => {
                document.insert("symbolicName", Bson::Null);
            }
            Some(value) => {
                document.insert("symbolicName", *value);
            }
        }
        count += 1;
    }
    if let Some(value) = updates.token_balance {
        document.insert("tokenBalance", value);
        count += 1;
    }
    if let Some(value) = updates.reputation {
        document.insert("reputation", value);
        count += 1;
    }
    if let Some(value) = updates.breadcrumb_score {
        document.insert("breadcrumbScore", value);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(doc! {"$set": document})
}

//! Traits and implementations for accessing the shared data store.
//!
//! All OAuth2 state (users, clients, authorization codes, token grants) lives
//! behind these traits so the service keeps no in-process state. Pure
//! MongoDB and pure SQLite implementations are provided; mixing
//! implementations is possible by composing the per-resource models in a
//! custom [`Model`].

use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;

pub mod access_token;
pub mod authorization_code;
pub mod client;
pub mod user;

mod model_mongodb;
mod model_sqlite;
mod mongodb;
mod sqlite;

pub use self::{
    mongodb::conn::{self as mongodb_conn, Options as MongoDbOptions},
    sqlite::conn::{self as sqlite_conn, Options as SqliteOptions},
};
pub use model_mongodb::Model as MongoDbModel;
pub use model_sqlite::Model as SqliteModel;

/// Database connection options for model implementation.
pub enum ConnOptions {
    /// Pure MongoDB model implementation.
    MongoDB(MongoDbOptions),
    /// Pure SQLite model implementation.
    Sqlite(SqliteOptions),
}

/// The top level trait to get all models (tables/collections).
#[async_trait]
pub trait Model: Send + Sync {
    /// Close database connection.
    async fn close(&self) -> Result<(), Box<dyn StdError>>;

    /// To get the user model.
    fn user(&self) -> &dyn user::UserModel;

    /// To get the client model.
    fn client(&self) -> &dyn client::ClientModel;

    /// To get the authorization code model.
    fn authorization_code(&self) -> &dyn authorization_code::AuthorizationCodeModel;

    /// To get the access token (grant) model.
    fn access_token(&self) -> &dyn access_token::AccessTokenModel;
}

/// To create the database model with the specified database implementation.
pub async fn new(opts: &ConnOptions) -> Result<Arc<dyn Model>, Box<dyn StdError>> {
    let model: Arc<dyn Model> = match opts {
        ConnOptions::MongoDB(opts) => Arc::new(MongoDbModel::new(opts).await?),
        ConnOptions::Sqlite(opts) => Arc::new(SqliteModel::new(opts).await?),
    };
    model.user().init().await?;
    model.client().init().await?;
    model.authorization_code().init().await?;
    model.access_token().init().await?;
    Ok(model)
}

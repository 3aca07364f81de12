//! Traits and structs for access token grants.
//!
//! One item represents one grant: the access token value rotates on refresh
//! while the refresh token, scope and user/client identity stay fixed for the
//! grant's lifetime. Revocation is logical; items are never deleted by the
//! protocol flows.

use std::error::Error as StdError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The item content.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: String,
    /// The authorization instant of the grant. Kept across refreshes.
    pub created_at: DateTime<Utc>,
    /// The expiration of the current access token value.
    pub expires_at: DateTime<Utc>,
    /// Once true the grant is permanently invalid.
    pub revoked: bool,
    /// Space-separated granted scopes such as `profile email`.
    pub scope: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub user_id: String,
}

/// The query condition to get item(s).
#[derive(Default)]
pub struct QueryCond<'a> {
    pub access_token: Option<&'a str>,
    pub refresh_token: Option<&'a str>,
    pub client_id: Option<&'a str>,
    pub user_id: Option<&'a str>,
}

/// The query condition for the list operation.
#[derive(Default)]
pub struct ListQueryCond<'a> {
    /// To get grants of the specified user.
    pub user_id: Option<&'a str>,
    /// To get grants of the specified client.
    pub client_id: Option<&'a str>,
    /// To get only revoked or only non-revoked grants.
    pub revoked: Option<bool>,
}

/// The update fields by using [`Some`]s.
#[derive(Default)]
pub struct Updates<'a> {
    /// To rotate the access token value.
    pub access_token: Option<&'a str>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: Option<bool>,
}

/// Model operations.
#[async_trait]
pub trait AccessTokenModel: Sync {
    /// To create and initialize the table/collection.
    async fn init(&self) -> Result<(), Box<dyn StdError>>;

    /// To get an item by the access token value.
    async fn get(&self, access_token: &str) -> Result<Option<AccessToken>, Box<dyn StdError>>;

    /// To get an item by the refresh token value.
    async fn get_by_refresh(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, Box<dyn StdError>>;

    /// To get the item list, newest grant first.
    async fn list(&self, cond: &ListQueryCond) -> Result<Vec<AccessToken>, Box<dyn StdError>>;

    /// To add an item.
    async fn add(&self, token: &AccessToken) -> Result<(), Box<dyn StdError>>;

    /// To update one or more items.
    async fn update(&self, cond: &QueryCond, updates: &Updates)
    -> Result<(), Box<dyn StdError>>;

    /// To delete one or more items.
    async fn del(&self, cond: &QueryCond) -> Result<(), Box<dyn StdError>>;
}

/// The expiration time of the access token in seconds.
pub const EXPIRES: i64 = 1 * 60 * 60;

//! Traits and structs for authorization codes.

use std::error::Error as StdError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The item content.
#[derive(Debug, PartialEq)]
pub struct AuthorizationCode {
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub redirect_uri: String,
    /// Space-separated granted scopes such as `profile email`.
    pub scope: String,
    pub client_id: String,
    pub user_id: String,
    /// One-way flag. Set true exactly once by [`AuthorizationCodeModel::mark_used`].
    pub used: bool,
}

/// The query condition to delete item(s).
#[derive(Default)]
pub struct QueryCond<'a> {
    pub code: Option<&'a str>,
    pub client_id: Option<&'a str>,
    pub user_id: Option<&'a str>,
}

/// Model operations.
#[async_trait]
pub trait AuthorizationCodeModel: Sync {
    /// To create and initialize the table/collection.
    async fn init(&self) -> Result<(), Box<dyn StdError>>;

    /// To get an item.
    async fn get(
        &self,
        authorization_code: &str,
    ) -> Result<Option<AuthorizationCode>, Box<dyn StdError>>;

    /// To add an item.
    async fn add(&self, code: &AuthorizationCode) -> Result<(), Box<dyn StdError>>;

    /// To atomically transition the `used` flag from false to true.
    ///
    /// Returns `true` when this call performed the transition. Returns `false` when the code
    /// does not exist or was already used, so concurrent redemptions of one code yield exactly
    /// one `true`.
    async fn mark_used(&self, authorization_code: &str) -> Result<bool, Box<dyn StdError>>;

    /// To delete one or more items.
    async fn del(&self, cond: &QueryCond) -> Result<(), Box<dyn StdError>>;
}

/// The expiration time of the authorization code in seconds.
pub const EXPIRES: i64 = 10 * 60;

//! Traits and structs for users (the identity store).

use std::error::Error as StdError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The item content.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub user_id: String,
    pub account: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// `None` means the account's email address is not verified yet.
    pub verified_at: Option<DateTime<Utc>>,
    pub password: String,
    pub salt: String,
    pub name: String,
    pub photo_url: Option<String>,
    /// The `§(name)` handle.
    pub symbolic_name: Option<String>,
    pub token_balance: i64,
    pub reputation: String,
    pub breadcrumb_score: i64,
}

/// The query condition to get item(s).
#[derive(Default)]
pub struct QueryCond<'a> {
    pub user_id: Option<&'a str>,
    pub account: Option<&'a str>,
}

/// The update fields by using [`Some`]s.
#[derive(Default)]
pub struct Updates<'a> {
    pub modified_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub name: Option<&'a str>,
    pub photo_url: Option<Option<&'a str>>,
    pub symbolic_name: Option<Option<&'a str>>,
    pub token_balance: Option<i64>,
    pub reputation: Option<&'a str>,
    pub breadcrumb_score: Option<i64>,
}

/// Model operations.
#[async_trait]
pub trait UserModel: Sync {
    /// To create and initialize the table/collection.
    async fn init(&self) -> Result<(), Box<dyn StdError>>;

    /// To get an item.
    async fn get(&self, cond: &QueryCond) -> Result<Option<User>, Box<dyn StdError>>;

    /// To add an item.
    async fn add(&self, user: &User) -> Result<(), Box<dyn StdError>>;

    /// To delete an item.
    async fn del(&self, user_id: &str) -> Result<(), Box<dyn StdError>>;

    /// To update an item.
    async fn update(&self, user_id: &str, updates: &Updates) -> Result<(), Box<dyn StdError>>;
}

/// The default reputation tier of users that have not earned one.
pub const DEF_REPUTATION: &'static str = "chrome";

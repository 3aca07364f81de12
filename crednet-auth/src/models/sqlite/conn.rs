use std::error::Error as StdError;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// SQLite connection options.
pub struct Options {
    /// Use absolute/relative path.
    pub path: String,
}

/// Connect to SQLite. The database file is created when it does not exist.
pub async fn connect(options: &Options) -> Result<SqlitePool, Box<dyn StdError>> {
    let opts = SqliteConnectOptions::new()
        .filename(options.path.as_str())
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(opts).await?;
    Ok(pool)
}

//! SQLite model implementation.
//!
//! # Notes
//!
//! The cursor is the **simulated** implementation. It only works when there are no add/delete
//! operations during a list operation.

pub mod access_token;
pub mod authorization_code;
pub mod client;
pub mod conn;
pub mod user;

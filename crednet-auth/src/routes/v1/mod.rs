//! `/api/v1` management APIs.

pub mod app;
pub mod auth;
pub mod client;

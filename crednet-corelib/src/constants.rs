//! Common constants for CredNet Social core modules.

pub struct ContentType;
pub struct DbEngine;

impl ContentType {
    pub const JSON: &'static str = "application/json";
}

impl DbEngine {
    pub const MONGODB: &'static str = "mongodb";
    pub const SQLITE: &'static str = "sqlite";
}

//! The OAuth2 identity-provider module of CredNet Social.
//!
//! This module provides:
//!
//! - OAuth2 authorization code grant with refresh tokens, so third-party
//!   applications can offer "Sign in with CredNet Social".
//! - Scoped user information (profile, email, symbolic name, token balance,
//!   reputation).
//! - Client registration and management.
//! - Authorized-application listing and revocation.
//!
//!
//! # Mount crednet-auth in your axum App
//!
//! You can simply mount crednet-auth into your axum App:
//!
//! ```ignore
//! use axum::Router;
//! use clap::Command;
//! use std::net::SocketAddr;
//! use crednet_auth::{libs, routes};
//! use tokio::{self, net::TcpListener};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let args = Command::new("your-project-name").get_matches();
//!
//!     let conf = libs::config::read_args(&args);
//!     let auth_state = match routes::new_state("/auth", &conf).await {
//!         Err(e) => {
//!             println!("Error: {}", e);
//!             return Ok(());
//!         },
//!         Ok(state) => state,
//!     };
//!     let app = Router::new().merge(routes::new_service(&auth_state));
//!     let listener = TcpListener::bind("0.0.0.0:1080").await.unwrap();
//!     axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
//! }
//! ```
//!
//! Please see `src/bin/crednet-auth.rs` to get the real world example.

pub mod libs;
pub mod models;
pub mod routes;

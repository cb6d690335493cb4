//! LWW Sync Server Library
//!
//! Cross-device key/value synchronization. Clients push batches of records
//! stamped with their own clock and the server keeps, per key, the record with
//! the highest timestamp. The server binary lives in main.rs.
//!
//! # Modules
//!
//! - `sync`: record types and the SQLite-backed [`sync::SyncStore`]
//! - `routes`: HTTP endpoints and router assembly
//! - `auth`: bearer token middleware
//! - `config`: environment-driven configuration

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
pub mod sync;

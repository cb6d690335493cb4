//! Sync module for multi-device synchronization
//!
//! Provides:
//! - Durable key/value records
//! - Last-write-wins reconciliation on client timestamps
//! - Batched writes and snapshot reads
//!
//! # Conflict Resolution
//!
//! - An incoming write replaces the stored record when its `updated_at` is
//!   greater than or equal to the stored `updated_at`
//! - Ties go to the incoming write
//! - Older writes are discarded silently and only show up in the
//!   `updated` / `total` counters of the batch response

mod store;
mod types;

pub use store::SyncStore;
pub use types::{BatchOutcome, PutSyncRequest, PutSyncResponse, SyncRecord};

//! Sync data types
//!
//! Wire and storage shapes for key/value records.

use serde::{Deserialize, Serialize};

/// A synchronized key/value record
///
/// `updated_at` is the client's own clock reading (seconds since the epoch,
/// fractional) and is the only input to conflict resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SyncRecord {
    pub key: String,
    /// Opaque payload; the server never looks inside it
    pub value: String,
    pub updated_at: f64,
}

impl SyncRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>, updated_at: f64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            updated_at,
        }
    }
}

/// Body of `PUT /api/sync`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutSyncRequest {
    pub items: Vec<SyncRecord>,
}

/// Result of applying one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Items that won the last-write-wins check and were written
    pub applied: usize,
    /// Items submitted in the batch
    pub total: usize,
}

/// Response of `PUT /api/sync`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutSyncResponse {
    pub updated: usize,
    pub total: usize,
}

impl From<BatchOutcome> for PutSyncResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            updated: outcome.applied,
            total: outcome.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_request_deserialize() {
        let req: PutSyncRequest = serde_json::from_str(
            r#"{"items": [{"key": "bookmarks", "value": "[1,2]", "updated_at": 1700000000.25}]}"#,
        )
        .unwrap();

        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0], SyncRecord::new("bookmarks", "[1,2]", 1700000000.25));
    }

    #[test]
    fn test_integer_timestamp_accepted() {
        let record: SyncRecord =
            serde_json::from_str(r#"{"key": "k", "value": "v", "updated_at": 100}"#).unwrap();
        assert_eq!(record.updated_at, 100.0);
    }

    #[test]
    fn test_missing_field_rejected() {
        let result: Result<SyncRecord, _> = serde_json::from_str(r#"{"key": "k", "value": "v"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_response_from_outcome() {
        let response = PutSyncResponse::from(BatchOutcome {
            applied: 2,
            total: 3,
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"updated": 2, "total": 3})
        );
    }
}

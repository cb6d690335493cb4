//! Sync API endpoints
//!
//! Bearer-protected push/pull of key/value records.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    middleware,
    routing::get,
    Json, Router,
};

use crate::auth::require_token;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::sync::{PutSyncRequest, PutSyncResponse, SyncRecord};

/// Create the sync router
pub fn router(state: AppState) -> Router<AppState> {
    let max_body_bytes = state.config().server.max_body_bytes;

    Router::new()
        .route("/", get(get_all).put(put_sync))
        .route("/:key", get(get_key))
        .route_layer(middleware::from_fn_with_state(state, require_token))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// List every stored record
async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<SyncRecord>>> {
    let records = state.store().get_all().await?;
    Ok(Json(records))
}

/// Get the record for a single key
async fn get_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SyncRecord>> {
    let record = state.store().get_by_key(&key).await?;
    Ok(Json(record))
}

/// Push a batch of records, keeping the newest per key
async fn put_sync(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PutSyncRequest>, JsonRejection>,
) -> Result<Json<PutSyncResponse>> {
    let Json(req) = payload.map_err(AppError::from)?;

    let outcome = state.store().apply_batch(req.items).await?;

    Ok(Json(outcome.into()))
}

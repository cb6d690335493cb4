//! Health check endpoint

use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Server clock, seconds since the epoch
    pub time: f64,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
    })
}

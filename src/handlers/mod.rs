// handlers/mod.rs - HTTP handlers
//
// Service endpoints (/, /health) live here; the compliance checks are under
// security/ and mounted at /security.

use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;

pub mod security;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Compliance API",
        "version": version,
        "description": "Security posture checks over the platform management and auth admin APIs",
        "endpoints": {
            "home": "/",
            "health": "/health",
            "mfa": "/security/mfa",
            "rls": "/security/rls",
            "pitr": "/security/pitr",
        }
    }))
}

/// Liveness only; upstream reachability is not probed
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        })),
    )
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

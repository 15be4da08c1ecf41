// handlers/security/rls.rs - GET /security/rls handler

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::checks::rls;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /security/rls - Whether row-level security is enabled on each public table
pub async fn get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    tracing::info!("Checking RLS for public tables");

    let tables = rls::check(&state.config, state.clients.as_ref()).await?;
    Ok(Json(json!({ "tables": tables })))
}

// handlers/security/mfa.rs - GET /security/mfa handler

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::checks::mfa;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /security/mfa - Whether each user has at least one MFA factor
///
/// Single project: `{"users": [{"email", "mfa_enabled"}]}`
/// Multiple projects: `{"users": {"<ref>": [...]}}`
pub async fn get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    tracing::info!("Checking MFA for all users");

    let users = mfa::check(&state.config, state.clients.as_ref()).await?;
    Ok(Json(json!({ "users": users })))
}

// handlers/security/pitr.rs - GET /security/pitr handler

use axum::{extract::State, response::Json};

use crate::checks::{pitr, PitrStatus};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /security/pitr - Point-in-time recovery status of every account project
///
/// Returns a bare array in project-list order.
pub async fn get(State(state): State<AppState>) -> Result<Json<Vec<PitrStatus>>, ApiError> {
    tracing::info!("Checking PITR for all account projects");

    let projects = pitr::check(&state.config, state.clients.as_ref()).await?;
    Ok(Json(projects))
}

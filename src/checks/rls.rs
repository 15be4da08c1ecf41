use serde::Serialize;
use serde_json::Value;

use super::{fan_out, CheckError, PerProject};
use crate::config::AppConfig;
use crate::platform::{ClientFactory, ManagementApi, PlatformError, TableRow};

/// Row-level security flag of every table in the `public` schema
pub const RLS_QUERY: &str =
    "SELECT tablename, rowsecurity FROM pg_catalog.pg_tables WHERE schemaname = 'public';";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RlsStatus {
    pub table: String,
    pub rls_enabled: bool,
}

impl From<TableRow> for RlsStatus {
    fn from(row: TableRow) -> Self {
        Self {
            table: row.tablename,
            rls_enabled: row.rowsecurity,
        }
    }
}

fn decode_rows(project_ref: &str, rows: Vec<Value>) -> Result<Vec<RlsStatus>, PlatformError> {
    rows.into_iter()
        .map(|row| serde_json::from_value::<TableRow>(row).map(RlsStatus::from))
        .collect::<Result<_, _>>()
        .map_err(|e| PlatformError::Decode {
            url: format!("v1/projects/{}/database/query", project_ref),
            message: e.to_string(),
        })
}

/// RLS status of every public table of one project
pub async fn check_project(api: &dyn ManagementApi, project_ref: &str) -> Result<Vec<RlsStatus>, PlatformError> {
    let rows = api.run_query(project_ref, RLS_QUERY).await?;
    decode_rows(project_ref, rows)
}

/// RLS status for the primary project, or for each configured project
pub async fn check(config: &AppConfig, clients: &dyn ClientFactory) -> Result<PerProject<RlsStatus>, CheckError> {
    let api = clients.management()?;

    if !config.is_multi_project() {
        let project_ref = config.primary_project_ref()?;
        let results = check_project(api.as_ref(), project_ref)
            .await
            .map_err(|e| CheckError::for_project(project_ref, e))?;
        return Ok(PerProject::Single(results));
    }

    // Queries go through the management token, but keyless refs are still refused
    let api: &dyn ManagementApi = api.as_ref();
    let results = fan_out(
        config.project_refs(),
        |project_ref| clients.credential(project_ref),
        move |project_ref, ()| async move { check_project(api, &project_ref).await },
    )
    .await?;

    Ok(PerProject::Multi(results))
}

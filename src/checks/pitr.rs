use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;

use super::CheckError;
use crate::config::AppConfig;
use crate::platform::{BackupStatus, ClientFactory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitrStatus {
    pub projectid: String,
    pub pitr_enabled: bool,
}

impl PitrStatus {
    pub fn new(projectid: String, backups: BackupStatus) -> Self {
        Self {
            projectid,
            pitr_enabled: backups.pitr_enabled.unwrap_or(false),
        }
    }
}

/// PITR status of every project visible to the management token.
///
/// The project set comes from the management API rather than the configured
/// credential map. Backup lookups run concurrently, bounded by
/// `PITR_MAX_CONCURRENCY`, and come back in project-list order.
pub async fn check(config: &AppConfig, clients: &dyn ClientFactory) -> Result<Vec<PitrStatus>, CheckError> {
    let management = clients.management()?;
    let api = management.as_ref();

    let projects = api.list_projects().await?;
    tracing::info!("Checking PITR for {} projects", projects.len());

    stream::iter(projects.into_iter().map(|project| project.id))
        .map(move |id| async move {
            match api.backup_status(&id).await {
                Ok(backups) => Ok(PitrStatus::new(id, backups)),
                Err(source) => Err(CheckError::for_project(id, source)),
            }
        })
        .buffered(config.checks.pitr_max_concurrency)
        .try_collect()
        .await
}

use serde::Serialize;

use super::{fan_out, CheckError, PerProject};
use crate::config::AppConfig;
use crate::platform::{AuthAdmin, ClientFactory, PlatformError, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MfaStatus {
    pub email: Option<String>,
    pub mfa_enabled: bool,
}

impl From<User> for MfaStatus {
    fn from(user: User) -> Self {
        let mfa_enabled = user.factors.as_ref().is_some_and(|f| !f.is_empty());
        Self {
            email: user.email,
            mfa_enabled,
        }
    }
}

/// MFA status of every user of one project
pub async fn check_project(client: &dyn AuthAdmin) -> Result<Vec<MfaStatus>, PlatformError> {
    let users = client.list_users().await?;
    Ok(users.into_iter().map(MfaStatus::from).collect())
}

/// MFA status for the primary project, or for each configured project
pub async fn check(config: &AppConfig, clients: &dyn ClientFactory) -> Result<PerProject<MfaStatus>, CheckError> {
    if !config.is_multi_project() {
        let results = check_project(clients.primary().as_ref()).await?;
        return Ok(PerProject::Single(results));
    }

    let results = fan_out(
        config.project_refs(),
        |project_ref| clients.for_project(project_ref),
        |_, client: Box<dyn AuthAdmin>| async move { check_project(client.as_ref()).await },
    )
    .await?;

    Ok(PerProject::Multi(results))
}

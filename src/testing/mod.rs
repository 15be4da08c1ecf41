use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{AppConfig, ConfigError};
use crate::platform::{
    AuthAdmin, BackupStatus, ClientFactory, ManagementApi, PlatformError, Project, User,
};

/// Config for a single primary project with ref `primary`
pub fn single_project_config() -> AppConfig {
    AppConfig::from_vars([
        ("PLATFORM_URL", "https://primary.supabase.co"),
        ("PLATFORM_ANON_KEY", "anon"),
        ("PLATFORM_SERVICE_ROLE_KEY", "service"),
        ("MANAGEMENT_API_BEARER_TOKEN", "token"),
    ])
    .expect("valid test config")
}

/// Config with PROJECT_<N>_REF entries for each ref
pub fn config_with_projects(refs: &[&str]) -> AppConfig {
    let mut vars: Vec<(String, String)> = vec![
        ("PLATFORM_URL".into(), "https://primary.supabase.co".into()),
        ("PLATFORM_ANON_KEY".into(), "anon".into()),
        ("PLATFORM_SERVICE_ROLE_KEY".into(), "service".into()),
        ("MANAGEMENT_API_BEARER_TOKEN".into(), "token".into()),
    ];
    for (i, project_ref) in refs.iter().enumerate() {
        vars.push((format!("PROJECT_{}_REF", i + 1), project_ref.to_string()));
        vars.push((format!("PROJECT_{}_SERVICE_ROLE_KEY", i + 1), format!("{}-key", project_ref)));
    }
    AppConfig::from_vars(vars).expect("valid test config")
}

fn upstream_error(what: &str) -> PlatformError {
    PlatformError::Status {
        url: format!("stub://{}", what),
        status: 500,
        body: "stub failure".into(),
    }
}

/// In-memory ClientFactory. The primary project answers under the ref `primary`.
#[derive(Default)]
pub struct StubFactory {
    users: HashMap<String, Option<Vec<User>>>,
    keyless: HashSet<String>,
    management: Option<StubManagement>,
    user_calls: Arc<AtomicUsize>,
}

impl StubFactory {
    pub fn with_users(mut self, project_ref: &str, users: Vec<User>) -> Self {
        self.users.insert(project_ref.to_string(), Some(users));
        self
    }

    pub fn failing_users(mut self, project_ref: &str) -> Self {
        self.users.insert(project_ref.to_string(), None);
        self
    }

    pub fn without_credential(mut self, project_ref: &str) -> Self {
        self.keyless.insert(project_ref.to_string());
        self
    }

    pub fn with_management(mut self, management: StubManagement) -> Self {
        self.management = Some(management);
        self
    }

    /// Number of list_users calls issued so far
    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    fn auth_admin(&self, project_ref: &str) -> StubAuthAdmin {
        StubAuthAdmin {
            project_ref: project_ref.to_string(),
            users: self.users.get(project_ref).cloned().unwrap_or(Some(Vec::new())),
            calls: self.user_calls.clone(),
        }
    }
}

impl ClientFactory for StubFactory {
    fn primary(&self) -> Box<dyn AuthAdmin> {
        Box::new(self.auth_admin("primary"))
    }

    fn for_project(&self, project_ref: &str) -> Result<Box<dyn AuthAdmin>, ConfigError> {
        self.credential(project_ref)?;
        Ok(Box::new(self.auth_admin(project_ref)))
    }

    fn credential(&self, project_ref: &str) -> Result<(), ConfigError> {
        if self.keyless.contains(project_ref) {
            return Err(ConfigError::MissingCredential(project_ref.to_string()));
        }
        Ok(())
    }

    fn management(&self) -> Result<Box<dyn ManagementApi>, ConfigError> {
        self.management
            .clone()
            .map(|m| Box::new(m) as Box<dyn ManagementApi>)
            .ok_or(ConfigError::MissingManagementToken)
    }
}

struct StubAuthAdmin {
    project_ref: String,
    users: Option<Vec<User>>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AuthAdmin for StubAuthAdmin {
    async fn list_users(&self) -> Result<Vec<User>, PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .clone()
            .ok_or_else(|| upstream_error(&format!("{}/users", self.project_ref)))
    }
}

/// In-memory management API. Clones share the recorded query log.
#[derive(Clone, Default)]
pub struct StubManagement {
    projects: Vec<Project>,
    tables: HashMap<String, Vec<Value>>,
    backups: HashMap<String, Value>,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    fail_list_projects: bool,
    queries: Arc<Mutex<Vec<(String, String)>>>,
}

impl StubManagement {
    pub fn with_projects(mut self, ids: &[&str]) -> Self {
        self.projects = ids
            .iter()
            .map(|id| Project {
                id: id.to_string(),
                name: format!("{} project", id),
            })
            .collect();
        self
    }

    pub fn with_tables(mut self, project_ref: &str, rows: Vec<Value>) -> Self {
        self.tables.insert(project_ref.to_string(), rows);
        self
    }

    pub fn with_backups(mut self, project_ref: &str, body: Value) -> Self {
        self.backups.insert(project_ref.to_string(), body);
        self
    }

    pub fn with_delay(mut self, project_ref: &str, delay: Duration) -> Self {
        self.delays.insert(project_ref.to_string(), delay);
        self
    }

    pub fn failing(mut self, project_ref: &str) -> Self {
        self.failing.insert(project_ref.to_string());
        self
    }

    pub fn failing_list_projects(mut self) -> Self {
        self.fail_list_projects = true;
        self
    }

    /// (project_ref, sql) pairs received by run_query
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    async fn enter(&self, project_ref: &str) -> Result<(), PlatformError> {
        if let Some(delay) = self.delays.get(project_ref) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(project_ref) {
            return Err(upstream_error(project_ref));
        }
        Ok(())
    }
}

#[async_trait]
impl ManagementApi for StubManagement {
    async fn list_projects(&self) -> Result<Vec<Project>, PlatformError> {
        if self.fail_list_projects {
            return Err(upstream_error("projects"));
        }
        Ok(self.projects.clone())
    }

    async fn run_query(&self, project_ref: &str, query: &str) -> Result<Vec<Value>, PlatformError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((project_ref.to_string(), query.to_string()));
        }
        self.enter(project_ref).await?;
        Ok(self.tables.get(project_ref).cloned().unwrap_or_default())
    }

    async fn backup_status(&self, project_ref: &str) -> Result<BackupStatus, PlatformError> {
        self.enter(project_ref).await?;
        let body = self.backups.get(project_ref).cloned().unwrap_or(Value::Null);
        if body.is_null() {
            return Ok(BackupStatus::default());
        }
        serde_json::from_value(body).map_err(|e| PlatformError::Decode {
            url: format!("stub://{}/backups", project_ref),
            message: e.to_string(),
        })
    }
}

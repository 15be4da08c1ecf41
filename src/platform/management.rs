use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::models::{BackupStatus, Project};
use super::{endpoint, fetch_json, ManagementApi, PlatformError};

/// Management REST API (`/v1/projects/...`), authenticated with a bearer token
pub struct HttpManagementApi {
    http: reqwest::Client,
    base_url: Url,
    bearer_token: String,
}

impl HttpManagementApi {
    pub fn new(http: reqwest::Client, base_url: Url, bearer_token: String) -> Self {
        Self {
            http,
            base_url,
            bearer_token,
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }
}

#[async_trait]
impl ManagementApi for HttpManagementApi {
    async fn list_projects(&self) -> Result<Vec<Project>, PlatformError> {
        let url = self.url("v1/projects");
        let request = self.http.get(&url).bearer_auth(&self.bearer_token);
        fetch_json(request, &url).await
    }

    async fn run_query(&self, project_ref: &str, query: &str) -> Result<Vec<Value>, PlatformError> {
        let url = self.url(&format!("v1/projects/{}/database/query", project_ref));
        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .json(&json!({ "query": query }));
        fetch_json(request, &url).await
    }

    async fn backup_status(&self, project_ref: &str) -> Result<BackupStatus, PlatformError> {
        let url = self.url(&format!("v1/projects/{}/database/backups", project_ref));
        let request = self.http.get(&url).bearer_auth(&self.bearer_token);
        fetch_json(request, &url).await
    }
}

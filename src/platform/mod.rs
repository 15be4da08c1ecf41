//! Outbound clients for the hosted platform.
//!
//! Two upstream surfaces are used:
//! - the per-project auth admin API (`{project_url}/auth/v1/admin/*`), authenticated
//!   with that project's service-role key
//! - the account-wide management API (`{management_url}/v1/*`), authenticated with
//!   a personal bearer token
//!
//! Checkers only see the [`AuthAdmin`] and [`ManagementApi`] traits and obtain them
//! through a [`ClientFactory`], so they can run against stubs in tests.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::ConfigError;

pub mod auth_admin;
pub mod factory;
pub mod management;
pub mod models;

pub use auth_admin::HttpAuthAdmin;
pub use factory::HttpClientFactory;
pub use management::HttpManagementApi;
pub use models::{BackupStatus, Factor, Project, TableRow, User};

/// Errors from an outbound platform call
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("{url} still returned full pages after {pages} pages")]
    PageLimit { url: String, pages: u32 },
}

/// Auth admin capability of a single project
#[async_trait]
pub trait AuthAdmin: Send + Sync {
    /// Every user of the project, in upstream order across pages
    async fn list_users(&self) -> Result<Vec<User>, PlatformError>;
}

/// Account-wide management API
#[async_trait]
pub trait ManagementApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, PlatformError>;

    /// Run a SQL statement against a project and return the raw result rows
    async fn run_query(&self, project_ref: &str, query: &str) -> Result<Vec<Value>, PlatformError>;

    async fn backup_status(&self, project_ref: &str) -> Result<BackupStatus, PlatformError>;
}

/// Builds authenticated clients on demand. Nothing is cached across requests.
pub trait ClientFactory: Send + Sync {
    /// Auth admin client for the primary project (PLATFORM_URL)
    fn primary(&self) -> Box<dyn AuthAdmin>;

    /// Auth admin client for a configured project; fails closed without a credential
    fn for_project(&self, project_ref: &str) -> Result<Box<dyn AuthAdmin>, ConfigError>;

    /// Fails unless a service-role key is configured for the project
    fn credential(&self, project_ref: &str) -> Result<(), ConfigError>;

    fn management(&self) -> Result<Box<dyn ManagementApi>, ConfigError>;
}

pub(crate) fn endpoint(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a request, require a 2xx status and decode the JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, PlatformError> {
    let transport = |source: reqwest::Error| PlatformError::Transport {
        url: url.to_string(),
        source,
    };

    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    tracing::debug!("{} -> {} ({} bytes)", url, status, body.len());

    if !status.is_success() {
        return Err(PlatformError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| PlatformError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

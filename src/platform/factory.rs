use std::sync::Arc;

use super::{AuthAdmin, ClientFactory, HttpAuthAdmin, HttpManagementApi, ManagementApi};
use crate::config::{AppConfig, ConfigError, ProjectCredential};

/// Production factory: reqwest-backed clients sharing one connection pool
pub struct HttpClientFactory {
    http: reqwest::Client,
    config: Arc<AppConfig>,
}

impl HttpClientFactory {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.checks.upstream_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    fn keyed_project(&self, project_ref: &str) -> Result<(&ProjectCredential, &str), ConfigError> {
        self.config
            .projects
            .get(project_ref)
            .and_then(|credential| {
                let key = credential.service_role_key.as_deref()?;
                Some((credential, key))
            })
            .ok_or_else(|| ConfigError::MissingCredential(project_ref.to_string()))
    }

    fn auth_admin(&self, base_url: &url::Url, service_role_key: &str) -> HttpAuthAdmin {
        HttpAuthAdmin::new(
            self.http.clone(),
            base_url.clone(),
            service_role_key.to_string(),
            self.config.checks.page_size,
            self.config.checks.max_pages,
        )
    }
}

impl ClientFactory for HttpClientFactory {
    fn primary(&self) -> Box<dyn AuthAdmin> {
        let platform = &self.config.platform;
        Box::new(self.auth_admin(&platform.url, &platform.service_role_key))
    }

    fn for_project(&self, project_ref: &str) -> Result<Box<dyn AuthAdmin>, ConfigError> {
        let (credential, key) = self.keyed_project(project_ref)?;
        Ok(Box::new(self.auth_admin(&credential.url, key)))
    }

    fn credential(&self, project_ref: &str) -> Result<(), ConfigError> {
        self.keyed_project(project_ref).map(|_| ())
    }

    fn management(&self) -> Result<Box<dyn ManagementApi>, ConfigError> {
        let token = self
            .config
            .management
            .bearer_token
            .clone()
            .ok_or(ConfigError::MissingManagementToken)?;

        Ok(Box::new(HttpManagementApi::new(
            self.http.clone(),
            self.config.management.url.clone(),
            token,
        )))
    }
}

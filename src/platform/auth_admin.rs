use async_trait::async_trait;
use url::Url;

use super::models::{User, UserPage};
use super::{endpoint, fetch_json, AuthAdmin, PlatformError};

/// Auth admin API of one project, authenticated with its service-role key
pub struct HttpAuthAdmin {
    http: reqwest::Client,
    base_url: Url,
    service_role_key: String,
    page_size: u32,
    max_pages: u32,
}

impl HttpAuthAdmin {
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        service_role_key: String,
        page_size: u32,
        max_pages: u32,
    ) -> Self {
        Self {
            http,
            base_url,
            service_role_key,
            page_size,
            max_pages,
        }
    }
}

#[async_trait]
impl AuthAdmin for HttpAuthAdmin {
    async fn list_users(&self) -> Result<Vec<User>, PlatformError> {
        let url = endpoint(&self.base_url, "auth/v1/admin/users");
        let mut users = Vec::new();

        // A short page marks the end of the listing
        for page in 1..=self.max_pages {
            let request = self
                .http
                .get(&url)
                .query(&[("page", page), ("per_page", self.page_size)])
                .header("apikey", &self.service_role_key)
                .bearer_auth(&self.service_role_key);

            let batch: UserPage = fetch_json(request, &url).await?;
            let count = batch.users.len();
            users.extend(batch.users);

            if count < self.page_size as usize {
                tracing::debug!("Listed {} users from {}", users.len(), self.base_url);
                return Ok(users);
            }
        }

        Err(PlatformError::PageLimit {
            url,
            pages: self.max_pages,
        })
    }
}

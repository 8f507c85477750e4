use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::{RemoteHost, RemoteRepository};
use crate::core::config::Config;
use crate::core::error::{PushError, Result};

const USER_AGENT: &str = concat!("autopush/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";

/// GitHub REST API client (github.com or an Enterprise `api_url`)
pub struct GitHubHost {
    client: Client,
    api_url: String,
    token: String,
}

impl GitHubHost {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_url, token)
    }

    pub fn with_client(client: Client, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone(), config.credentials.token.clone())
    }
}

#[async_trait]
impl RemoteHost for GitHubHost {
    async fn lookup(&self, owner: &str, name: &str) -> Result<Option<RemoteRepository>> {
        let url = format!("{}/repos/{}/{}", self.api_url, owner, name);
        debug!(%url, "checking repository on GitHub");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(PushError::RemoteUnavailable)?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%status, "repository lookup did not find {}/{}", owner, name);
            return Ok(None);
        }

        let body = response.text().await.map_err(PushError::RemoteUnavailable)?;
        match serde_json::from_str::<RemoteRepository>(&body) {
            Ok(repo) => Ok(Some(repo)),
            Err(e) => {
                // A 200 is authoritative even when the body is not what we expect.
                warn!("Unexpected repository payload from GitHub: {}", e);
                Ok(Some(RemoteRepository {
                    full_name: format!("{}/{}", owner, name),
                    ..RemoteRepository::default()
                }))
            }
        }
    }

    fn name(&self) -> &str {
        "github"
    }
}

pub mod github;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::error::Result;

/// Trait for hosting services that can confirm a repository exists.
#[async_trait]
pub trait RemoteHost: Send + Sync {
    /// Look the repository up. `Ok(None)` means the host did not answer with a
    /// found response, whatever the reason.
    async fn lookup(&self, owner: &str, name: &str) -> Result<Option<RemoteRepository>>;

    async fn repository_exists(&self, owner: &str, name: &str) -> Result<bool> {
        Ok(self.lookup(owner, name).await?.is_some())
    }

    fn name(&self) -> &str;
}

/// The fields of a hosted repository that autopush reports on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteRepository {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub private: bool,
}

use crate::error::GenomicsResult;
use crate::oauth::credential::Credential;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Single-file credential cache. Read once at start, written after each
/// authorization or refresh. Concurrent runs are not coordinated.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached credential. A missing or unreadable cache yields `None`.
    pub async fn load(&self) -> GenomicsResult<Option<Credential>> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No credential cache at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&json) {
            Ok(credential) => Ok(Some(credential)),
            Err(e) => {
                warn!("Ignoring malformed credential cache {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    pub async fn save(&self, credential: &Credential) -> GenomicsResult<()> {
        let json = serde_json::to_string_pretty(credential)?;
        tokio::fs::write(&self.path, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        debug!("Saved credential to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_cache_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));

        let mut credential = Credential::new("access");
        credential.refresh_token = Some("refresh".to_string());
        store.save(&credential).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(credential));
    }

    #[tokio::test]
    async fn test_malformed_cache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(CredentialStore::new(path).load().await.unwrap().is_none());
    }
}

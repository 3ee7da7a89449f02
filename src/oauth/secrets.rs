use crate::error::{GenomicsError, GenomicsResult};
use serde::Deserialize;
use std::path::Path;

pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URI: &str = "https://accounts.google.com/o/oauth2/token";

/// OAuth scope granting access to the genomics API
pub const GENOMICS_SCOPE: &str = "https://www.googleapis.com/auth/genomics";

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

/// OAuth client identity
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// Layout of a downloaded `client_secrets.json`
#[derive(Debug, Deserialize)]
enum SecretsFile {
    #[serde(rename = "installed")]
    Installed(ClientSecrets),
    #[serde(rename = "web")]
    Web(ClientSecrets),
}

impl ClientSecrets {
    /// Client identity for the default Google endpoints
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_uri: default_auth_uri(),
            token_uri: default_token_uri(),
            redirect_uris: Vec::new(),
        }
    }

    /// Parse the contents of a `client_secrets.json` file
    pub fn from_json(json: &str) -> GenomicsResult<Self> {
        let secrets = match serde_json::from_str::<SecretsFile>(json)? {
            SecretsFile::Installed(secrets) | SecretsFile::Web(secrets) => secrets,
        };
        if secrets.client_id.is_empty() {
            return Err(GenomicsError::invalid_param("client_secrets has an empty client_id"));
        }
        Ok(secrets)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> GenomicsResult<Self> {
        let json = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_secrets() {
        let json = r#"{"installed": {
            "client_id": "id.apps.googleusercontent.com",
            "client_secret": "shh",
            "auth_uri": "https://example.com/auth",
            "token_uri": "https://example.com/token",
            "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
        }}"#;
        let secrets = ClientSecrets::from_json(json).unwrap();
        assert_eq!(secrets.client_id, "id.apps.googleusercontent.com");
        assert_eq!(secrets.token_uri, "https://example.com/token");
        assert_eq!(secrets.redirect_uris.len(), 2);
    }

    #[test]
    fn test_web_secrets_use_default_endpoints() {
        let json = r#"{"web": {"client_id": "id", "client_secret": "shh"}}"#;
        let secrets = ClientSecrets::from_json(json).unwrap();
        assert_eq!(secrets.auth_uri, GOOGLE_AUTH_URI);
        assert_eq!(secrets.token_uri, GOOGLE_TOKEN_URI);
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        assert!(ClientSecrets::from_json(r#"{"client_id": "id"}"#).is_err());
    }
}

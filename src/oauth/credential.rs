use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens expiring within this many seconds are treated as already expired.
const EXPIRY_SKEW_SECS: i64 = 60;

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Cached OAuth2 credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Set once the token endpoint has rejected the refresh token
    #[serde(default)]
    pub invalid: bool,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: default_token_type(),
            expires_at: None,
            invalid: false,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map(|expires_at| now + Duration::seconds(EXPIRY_SKEW_SECS) >= expires_at)
            .unwrap_or(false)
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.invalid && !self.access_token.is_empty() && !self.is_expired_at(now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn can_refresh(&self) -> bool {
        !self.invalid && self.refresh_token.is_some()
    }

    /// Value for the `Authorization` header
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Successful token endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// A refresh response usually omits the refresh token; keep the previous one then.
    pub fn into_credential(self, issued_at: DateTime<Utc>, previous_refresh: Option<String>) -> Credential {
        Credential {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            token_type: self.token_type.unwrap_or_else(default_token_type),
            expires_at: self
                .expires_in
                .map(|secs| issued_at + Duration::seconds(secs)),
            invalid: false,
        }
    }
}

/// Error body returned by the token endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct TokenErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

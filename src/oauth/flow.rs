use crate::auth::{Authentication, BasicAuth};
use crate::error::{GenomicsError, GenomicsResult};
use crate::oauth::credential::{Credential, TokenErrorResponse, TokenResponse};
use crate::oauth::secrets::{ClientSecrets, GENOMICS_SCOPE};
use chrono::Utc;
use log::{debug, info};
use reqwest::header::HeaderMap;
use reqwest::Client;
use url::Url;

/// Token endpoint error for a revoked, expired or unknown code or refresh token
const INVALID_GRANT: &str = "invalid_grant";

/// Installed-application OAuth2 authorization code flow
pub struct OAuthFlow {
    http: Client,
    secrets: ClientSecrets,
    scopes: Vec<String>,
}

impl OAuthFlow {
    pub fn new(secrets: ClientSecrets) -> GenomicsResult<Self> {
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self::with_client(http, secrets))
    }

    pub fn with_client(http: Client, secrets: ClientSecrets) -> Self {
        Self {
            http,
            secrets,
            scopes: vec![GENOMICS_SCOPE.to_string()],
        }
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn secrets(&self) -> &ClientSecrets {
        &self.secrets
    }

    /// Consent page the user visits to grant access
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> GenomicsResult<Url> {
        let mut url = Url::parse(&self.secrets.auth_uri)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.secrets.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange an authorization code for a credential
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> GenomicsResult<Credential> {
        info!("Exchanging authorization code for a token");
        let issued_at = Utc::now();
        let response = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .await?;
        if response.refresh_token.is_none() {
            debug!("Token endpoint did not issue a refresh token");
        }
        Ok(response.into_credential(issued_at, None))
    }

    /// Obtain a fresh access token using the credential's refresh token
    pub async fn refresh(&self, credential: &Credential) -> GenomicsResult<Credential> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| GenomicsError::auth_error("credential has no refresh token"))?;

        info!("Refreshing access token");
        let issued_at = Utc::now();
        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;
        Ok(response.into_credential(issued_at, credential.refresh_token.clone()))
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> GenomicsResult<TokenResponse> {
        let mut headers = HeaderMap::new();
        BasicAuth::new(&self.secrets.client_id, &self.secrets.client_secret)
            .apply_auth(&mut headers)
            .await?;

        debug!("HTTP POST {}", self.secrets.token_uri);
        let response = self
            .http
            .post(&self.secrets.token_uri)
            .headers(headers)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<TokenResponse>().await?);
        }

        match response.json::<TokenErrorResponse>().await {
            Ok(body) if body.error == INVALID_GRANT => Err(GenomicsError::InvalidGrant(
                body.error_description.unwrap_or(body.error),
            )),
            Ok(body) => Err(GenomicsError::auth_error(match body.error_description {
                Some(description) => format!("{}: {}", body.error, description),
                None => body.error,
            })),
            Err(_) => Err(GenomicsError::auth_error(format!("HTTP {}", status))),
        }
    }
}

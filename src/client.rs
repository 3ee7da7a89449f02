use crate::{
    auth::Authentication,
    error::{GenomicsError, GenomicsResult},
    models::ErrorResponse,
    apis::{CallSetApi, ReadApi, ReadGroupSetApi, VariantApi},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Default endpoint of the genomics API
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/genomics/v1beta2/";

/// Main genomics API client
#[derive(Clone)]
pub struct GenomicsClient {
    client: Client,
    base_url: Url,
    auth: Arc<dyn Authentication>,
}

/// API paths are joined relative to the base URL, so it must end in `/`.
fn parse_base_url(base_url: &str) -> GenomicsResult<Url> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{}/", base_url))?)
    }
}

impl GenomicsClient {
    /// Create a new client with authentication
    pub fn new(
        base_url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> GenomicsResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Self::with_client(client, base_url, auth)
    }

    /// Create a new client with a custom reqwest client
    pub fn with_client(
        client: Client,
        base_url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> GenomicsResult<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url.as_ref())?,
            auth: Arc::new(auth),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get Read Group Set API
    pub fn readgroupsets(&self) -> ReadGroupSetApi<'_> {
        ReadGroupSetApi::new(self)
    }

    /// Get Read API
    pub fn reads(&self) -> ReadApi<'_> {
        ReadApi::new(self)
    }

    /// Get Call Set API
    pub fn callsets(&self) -> CallSetApi<'_> {
        CallSetApi::new(self)
    }

    /// Get Variant API
    pub fn variants(&self) -> VariantApi<'_> {
        VariantApi::new(self)
    }

    /// Resolve an API path against the base URL
    pub fn endpoint(&self, path: &str) -> GenomicsResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build a request to the given path with authentication
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> GenomicsResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut headers = reqwest::header::HeaderMap::new();
        self.auth.apply_auth(&mut headers).await?;

        Ok(self.client.request(method, url).headers(headers))
    }

    /// Execute a request and handle common error cases
    pub async fn execute<T>(&self, request: RequestBuilder) -> GenomicsResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> GenomicsResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if status.is_success() {
            let json = response.json::<T>().await?;
            Ok(json)
        } else {
            self.handle_error_response(status, response).await
        }
    }

    /// Handle error responses
    async fn handle_error_response<T>(&self, status: StatusCode, response: Response) -> GenomicsResult<T> {
        let error_message = match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse { error: Some(body) }) => body
                .message
                .unwrap_or_else(|| format!("HTTP {}", status)),
            _ => format!("HTTP {}", status),
        };

        match status {
            StatusCode::UNAUTHORIZED => Err(GenomicsError::auth_error(error_message)),
            StatusCode::FORBIDDEN => Err(GenomicsError::PermissionDenied(error_message)),
            StatusCode::NOT_FOUND => Err(GenomicsError::NotFound(error_message)),
            StatusCode::BAD_REQUEST => Err(GenomicsError::invalid_param(error_message)),
            _ => Err(GenomicsError::api_error(status.as_u16(), error_message)),
        }
    }

    /// Restrict the response payload to the given partial-response field mask
    pub fn with_fields(request: RequestBuilder, fields: Option<&str>) -> RequestBuilder {
        match fields {
            Some(fields) => request.query(&[("fields", fields)]),
            None => request,
        }
    }
}

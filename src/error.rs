use thiserror::Error;

/// Genomics client error types
#[derive(Error, Debug)]
pub enum GenomicsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Token endpoint rejected the grant: {0}")]
    InvalidGrant(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Searching for {name} didn't return the right number of {kind} (found {found})")]
    Cardinality {
        kind: &'static str,
        name: String,
        found: usize,
    },

    #[error("Projection failed: {0}")]
    Projection(#[from] ProjectionError),
}

/// Defects detected while projecting a remote record onto a coordinate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("read has no alignment")]
    MissingAlignment,

    #[error("offset {offset} is outside a sequence of length {len}")]
    OutOfRange { offset: i64, len: usize },

    #[error("alignment does not cover coordinate {0}")]
    NotCovered(i64),

    #[error("genotype index {index} has no matching allele ({alternates} alternates)")]
    GenotypeIndex { index: i32, alternates: usize },
}

/// Result type for genomics operations
pub type GenomicsResult<T> = Result<T, GenomicsError>;

impl GenomicsError {
    /// Create an API error from a status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an authorization error
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Create a wrong-cardinality error for a name lookup
    pub fn cardinality(kind: &'static str, name: impl Into<String>, found: usize) -> Self {
        Self::Cardinality {
            kind,
            name: name.into(),
            found,
        }
    }
}

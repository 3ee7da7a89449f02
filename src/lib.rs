/*
 * Genomics API client - OAuth2 authorization, typed search operations and
 * point lookups of read bases and called genotypes
 */

// Internal modules
mod client;
pub mod models;
mod apis;
mod error;
mod auth;
pub mod config;
pub mod lookup;
pub mod oauth;
pub mod projection;
pub mod report;


// Re-export public types and interfaces
pub use client::{GenomicsClient, DEFAULT_BASE_URL};
pub use models::*;
pub use apis::*;
pub use error::{GenomicsError, GenomicsResult, ProjectionError};
pub use auth::{Authentication, BasicAuth, BearerAuth, NoAuth, OAuthAuth};
pub use config::Config;

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        GenomicsClient,
        BearerAuth, NoAuth, OAuthAuth,
        GenomicsError, GenomicsResult,
        Locus, Read, Variant,
        lookup::{called_genotype_at, read_bases_at, CalledGenotype, Matches},
        projection::{base_at, BaseTally},
        oauth::{authorize, ClientSecrets, CredentialStore, OAuthFlow},
    };
}

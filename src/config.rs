use crate::client::DEFAULT_BASE_URL;
use crate::models::Locus;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "getting-started")]
#[command(about = "Look up read bases and the called genotype for a sample at one position")]
pub struct Config {
    /// Client ID for a native application with the Genomics API enabled
    #[arg(env = "GENOMICS_CLIENT_ID", requires = "client_secret")]
    pub client_id: Option<String>,

    /// Client secret matching the client ID
    #[arg(env = "GENOMICS_CLIENT_SECRET", requires = "client_id")]
    pub client_secret: Option<String>,

    /// Path to client_secrets.json, used when no client ID is given
    #[arg(long, env = "GENOMICS_CLIENT_SECRETS", default_value = "client_secrets.json")]
    pub client_secrets_filename: PathBuf,

    /// Paste the authorization code instead of receiving it on a local webserver
    #[arg(long)]
    pub noauth_local_webserver: bool,

    /// Hostname for the local authorization webserver
    #[arg(long, default_value = "localhost")]
    pub auth_host_name: String,

    /// Ports tried in order for the local authorization webserver
    #[arg(long, value_delimiter = ',', default_value = "8080,8090")]
    pub auth_host_port: Vec<u16>,

    /// Credential cache file
    #[arg(long, env = "GENOMICS_CREDENTIAL_STORE", default_value = "credentials.json")]
    pub credential_store: PathBuf,

    /// Genomics API endpoint
    #[arg(long, env = "GENOMICS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Dataset (and variant set) to search; defaults to 1000 Genomes
    #[arg(long, default_value = "10473108253681171589")]
    pub dataset_id: String,

    /// Sample name to look up
    #[arg(long, default_value = "NA12872")]
    pub sample: String,

    /// Reference sequence name
    #[arg(long, default_value = "22")]
    pub reference_name: String,

    /// Zero-based reference coordinate
    #[arg(long, default_value = "51003835")]
    pub position: i64,

    /// Maximum number of reads fetched at the position
    #[arg(long, default_value = "1024")]
    pub max_results: u32,

    /// Skip the read base lookup
    #[arg(long)]
    pub skip_reads: bool,

    /// Skip the genotype lookup
    #[arg(long)]
    pub skip_variants: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    pub fn locus(&self) -> Locus {
        Locus::new(self.reference_name.clone(), self.position)
    }

    /// Client ID and secret given directly on the command line
    pub fn client_pair(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

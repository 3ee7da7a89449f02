use anyhow::Context;
use clap::Parser;
use log::info;
use std::io::Write;

use genomics_client::{
    lookup::{called_genotype_at, read_bases_at},
    oauth::{
        authorize, ClientSecrets, CredentialStore, LocalServerReceiver, OAuthFlow,
        PromptReceiver, VerificationCodeReceiver,
    },
    report::{write_base_tally, write_genotype},
    Config, GenomicsClient, OAuthAuth,
};

async fn client_secrets(config: &Config) -> anyhow::Result<ClientSecrets> {
    if let Some((id, secret)) = config.client_pair() {
        return Ok(ClientSecrets::new(id, secret));
    }

    let path = &config.client_secrets_filename;
    if !path.exists() {
        anyhow::bail!(
            "Client secrets file {} does not exist. Visit https://developers.google.com/genomics \
             to learn how to install a client_secrets.json file. If you have installed a \
             client_secrets.json in a specific location, use --client-secrets-filename \
             <path>/client_secrets.json.",
            path.display()
        );
    }
    ClientSecrets::from_file(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    // Authorization
    let flow = OAuthFlow::new(client_secrets(&config).await?)?;
    let store = CredentialStore::new(config.credential_store.clone());
    let receiver: Box<dyn VerificationCodeReceiver> = if config.noauth_local_webserver {
        Box::new(PromptReceiver)
    } else {
        Box::new(LocalServerReceiver::bind(&config.auth_host_name, &config.auth_host_port).await?)
    };
    let credential = authorize(&flow, &store, receiver.as_ref()).await?;

    let auth = OAuthAuth::new(flow, credential).with_store(store);
    let client = GenomicsClient::new(&config.base_url, auth)?;
    info!("Using genomics API at {}", client.base_url());

    let locus = config.locus();
    let mut stdout = std::io::stdout().lock();

    if !config.skip_reads {
        let tally = read_bases_at(
            &client,
            &config.dataset_id,
            &config.sample,
            &locus,
            config.max_results,
        )
        .await?;
        write_base_tally(&mut stdout, &config.sample, &locus, &tally)?;
    }

    if !config.skip_variants {
        let called = called_genotype_at(&client, &config.dataset_id, &config.sample, &locus).await?;
        write_genotype(&mut stdout, &called.genotype(), called.variant_name.as_deref())?;
    }

    stdout.flush()?;
    Ok(())
}

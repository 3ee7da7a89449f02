//! OAuth2 installed-application authorization: client secrets, the
//! authorization code and refresh flows, the credential cache, and the
//! receivers that collect the authorization code from the user.

mod credential;
mod flow;
mod receiver;
mod secrets;
mod storage;

pub use credential::Credential;
pub use flow::OAuthFlow;
pub use receiver::{LocalServerReceiver, PromptReceiver, VerificationCodeReceiver, OOB_REDIRECT_URI};
pub use secrets::{ClientSecrets, GENOMICS_SCOPE, GOOGLE_AUTH_URI, GOOGLE_TOKEN_URI};
pub use storage::CredentialStore;

use crate::error::{GenomicsError, GenomicsResult};
use log::{info, warn};
use uuid::Uuid;

/// Return a usable credential, running the interactive flow only when needed.
///
/// Order: cached valid credential, then refresh of a cached credential, then
/// the authorization code flow through `receiver`. Any new credential is saved.
/// Only a rejected refresh token falls through to the interactive flow; other
/// refresh failures are returned and leave the cache untouched.
pub async fn authorize(
    flow: &OAuthFlow,
    store: &CredentialStore,
    receiver: &dyn VerificationCodeReceiver,
) -> GenomicsResult<Credential> {
    if let Some(mut credential) = store.load().await? {
        if credential.is_valid() {
            info!("Using cached credential from {}", store.path().display());
            return Ok(credential);
        }
        if credential.can_refresh() {
            match flow.refresh(&credential).await {
                Ok(refreshed) => {
                    store.save(&refreshed).await?;
                    return Ok(refreshed);
                }
                Err(GenomicsError::InvalidGrant(reason)) => {
                    warn!("Cached refresh token was rejected: {}", reason);
                    credential.invalid = true;
                    store.save(&credential).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    let redirect_uri = receiver.redirect_uri();
    let state = Uuid::new_v4().simple().to_string();
    let authorization_url = flow.authorization_url(&redirect_uri, &state)?;
    let code = receiver.receive_code(&authorization_url, &state).await?;

    let credential = flow.exchange_code(&code, &redirect_uri).await?;
    store.save(&credential).await?;
    info!("Stored credential in {}", store.path().display());
    Ok(credential)
}

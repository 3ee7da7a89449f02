use crate::error::{GenomicsError, GenomicsResult};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

/// Redirect URI for the copy-and-paste flow
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// How long the success page gets to reach the browser after the code arrives
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

const SUCCESS_PAGE: &str = "<html><head><title>Authentication Status</title></head>\
<body><p>The authentication flow has completed. You may close this window.</p></body></html>";

const FAILURE_PAGE: &str = "<html><head><title>Authentication Status</title></head>\
<body><p>The authentication flow failed. Check the terminal for details.</p></body></html>";

/// Obtains the authorization code after the user visits the consent page
#[async_trait::async_trait]
pub trait VerificationCodeReceiver: Send + Sync {
    /// Redirect URI registered with the authorization request
    fn redirect_uri(&self) -> String;

    /// Present `authorization_url` to the user and wait for the code
    async fn receive_code(&self, authorization_url: &Url, state: &str) -> GenomicsResult<String>;
}

/// Prints the consent URL and reads the pasted code from standard input
#[derive(Debug, Clone, Default)]
pub struct PromptReceiver;

#[async_trait::async_trait]
impl VerificationCodeReceiver for PromptReceiver {
    fn redirect_uri(&self) -> String {
        OOB_REDIRECT_URI.to_string()
    }

    async fn receive_code(&self, authorization_url: &Url, _state: &str) -> GenomicsResult<String> {
        println!("Please visit the below URL to obtain OAuth2 code.");
        println!();
        println!("{}", authorization_url);
        println!();
        println!("Please enter the code here:");

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

        let code = line.trim();
        if code.is_empty() {
            return Err(GenomicsError::auth_error("no authorization code entered"));
        }
        Ok(code.to_string())
    }
}

/// Listens on a loopback port for the browser redirect carrying the code.
///
/// The listener serves a single authorization; a second `receive_code` fails.
#[derive(Debug)]
pub struct LocalServerReceiver {
    listener: Mutex<Option<TcpListener>>,
    host: String,
    port: u16,
}

/// Shared with the redirect handler
struct RedirectState {
    state: String,
    outcome: Mutex<Option<oneshot::Sender<GenomicsResult<String>>>>,
}

impl LocalServerReceiver {
    /// Bind the first available port from `ports`
    pub async fn bind(host: &str, ports: &[u16]) -> GenomicsResult<Self> {
        for &port in ports {
            match TcpListener::bind((host, port)).await {
                Ok(listener) => {
                    let port = listener.local_addr()?.port();
                    debug!("Local authorization server listening on {}:{}", host, port);
                    return Ok(Self {
                        listener: Mutex::new(Some(listener)),
                        host: host.to_string(),
                        port,
                    });
                }
                Err(e) => debug!("Cannot bind {}:{}: {}", host, port, e),
            }
        }
        Err(GenomicsError::auth_error(format!(
            "failed to start a local webserver on {} ports {:?}; \
             rerun with --noauth-local-webserver",
            host, ports
        )))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn take_listener(&self) -> GenomicsResult<TcpListener> {
        self.listener
            .lock()
            .ok()
            .and_then(|mut listener| listener.take())
            .ok_or_else(|| GenomicsError::auth_error("local webserver has already been used"))
    }
}

/// Outcome of one redirect: the code, or why the flow failed
fn redirect_outcome(params: &HashMap<String, String>, expected_state: &str) -> GenomicsResult<String> {
    if let Some(error) = params.get("error") {
        return Err(GenomicsError::auth_error(format!(
            "authorization was denied: {}",
            error
        )));
    }
    if params.get("state").map(String::as_str) != Some(expected_state) {
        warn!("Redirect carried an unexpected state parameter");
        return Err(GenomicsError::auth_error("state mismatch in authorization redirect"));
    }
    params
        .get("code")
        .cloned()
        .ok_or_else(|| GenomicsError::auth_error("redirect did not include a code"))
}

async fn handle_redirect(
    State(shared): State<Arc<RedirectState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<&'static str>) {
    let outcome = redirect_outcome(&params, &shared.state);
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::BAD_REQUEST,
    };
    let page = if outcome.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };

    let sender = shared.outcome.lock().ok().and_then(|mut sender| sender.take());
    match sender {
        Some(sender) => {
            let _ = sender.send(outcome);
        }
        None => debug!("Ignoring redirect after the flow finished"),
    }
    (status, Html(page))
}

#[async_trait::async_trait]
impl VerificationCodeReceiver for LocalServerReceiver {
    fn redirect_uri(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    async fn receive_code(&self, authorization_url: &Url, state: &str) -> GenomicsResult<String> {
        let listener = self.take_listener()?;

        println!("Go to the following link in your browser:");
        println!();
        println!("    {}", authorization_url);
        println!();
        println!("If your browser is on a different machine then exit and re-run this");
        println!("application with the command-line parameter");
        println!();
        println!("  --noauth-local-webserver");
        println!();

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let shared = Arc::new(RedirectState {
            state: state.to_string(),
            outcome: Mutex::new(Some(outcome_tx)),
        });
        let app = Router::new()
            .route("/", get(handle_redirect))
            .with_state(shared);

        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let outcome = tokio::select! {
            outcome = outcome_rx => outcome.map_err(|_| {
                GenomicsError::auth_error("local webserver stopped before receiving a code")
            })?,
            served = &mut server => {
                return Err(match served {
                    Ok(Err(e)) => e.into(),
                    _ => GenomicsError::auth_error("local webserver stopped before receiving a code"),
                });
            }
        };

        // Idle browser connections would hold graceful shutdown open, so only
        // wait briefly for the response to be written.
        let _ = shutdown_tx.send(());
        if tokio::time::timeout(SHUTDOWN_GRACE, server).await.is_err() {
            debug!("Local webserver still draining connections; leaving it behind");
        }

        if outcome.is_ok() {
            info!("Authentication successful");
        }
        outcome
    }
}

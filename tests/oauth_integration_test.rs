use chrono::{Duration, Utc};
use genomics_client::lookup::resolve_read_group_set_id;
use genomics_client::oauth::{
    authorize, ClientSecrets, Credential, CredentialStore, OAuthFlow, VerificationCodeReceiver,
};
use genomics_client::{GenomicsClient, GenomicsError, GenomicsResult, OAuthAuth};
use serde_json::json;
use std::sync::Mutex;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// base64("client-id:client-secret")
const CLIENT_BASIC: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

/// Helper to create a flow whose token endpoint is the mock server
fn create_test_flow(server: &MockServer) -> OAuthFlow {
    let mut secrets = ClientSecrets::new("client-id", "client-secret");
    secrets.token_uri = format!("{}/token", server.uri());
    OAuthFlow::new(secrets).expect("Failed to create flow")
}

fn expired_credential() -> Credential {
    let mut credential = Credential::new("stale");
    credential.refresh_token = Some("refresh-1".to_string());
    credential.expires_at = Some(Utc::now() - Duration::hours(1));
    credential
}

/// Receiver that answers with a fixed code and records what it was shown
struct FixedCodeReceiver {
    code: &'static str,
    seen: Mutex<Option<(Url, String)>>,
}

impl FixedCodeReceiver {
    fn new(code: &'static str) -> Self {
        Self {
            code,
            seen: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl VerificationCodeReceiver for FixedCodeReceiver {
    fn redirect_uri(&self) -> String {
        "http://localhost:8080/".to_string()
    }

    async fn receive_code(&self, authorization_url: &Url, state: &str) -> GenomicsResult<String> {
        *self.seen.lock().unwrap() = Some((authorization_url.clone(), state.to_string()));
        Ok(self.code.to_string())
    }
}

/// Test that a valid cached credential is used without any network traffic
#[tokio::test]
async fn test_authorize_uses_valid_cache() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let mut cached = Credential::new("cached-token");
    cached.expires_at = Some(Utc::now() + Duration::hours(1));
    store.save(&cached).await.unwrap();

    let receiver = FixedCodeReceiver::new("unused");
    let credential = authorize(&create_test_flow(&server), &store, &receiver)
        .await
        .expect("Failed to authorize");
    assert_eq!(credential.access_token, "cached-token");
    assert!(receiver.seen.lock().unwrap().is_none());
}

/// Test that an expired cached credential is refreshed and saved
#[tokio::test]
async fn test_authorize_refreshes_expired_cache() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("authorization", CLIENT_BASIC))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    store.save(&expired_credential()).await.unwrap();

    let receiver = FixedCodeReceiver::new("unused");
    let credential = authorize(&create_test_flow(&server), &store, &receiver)
        .await
        .expect("Failed to authorize");
    assert_eq!(credential.access_token, "fresh");
    assert_eq!(credential.refresh_token.as_deref(), Some("refresh-1"));
    assert!(credential.is_valid());

    let saved = store.load().await.unwrap().expect("credential should be saved");
    assert_eq!(saved, credential);
}

/// Test the authorization code flow when nothing is cached
#[tokio::test]
async fn test_authorize_runs_code_flow() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("authorization", CLIENT_BASIC))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=code-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let receiver = FixedCodeReceiver::new("code-123");

    let credential = authorize(&create_test_flow(&server), &store, &receiver)
        .await
        .expect("Failed to authorize");
    assert_eq!(credential.access_token, "new-access");
    assert_eq!(credential.refresh_token.as_deref(), Some("new-refresh"));

    let (url, state) = receiver.seen.lock().unwrap().clone().expect("receiver not used");
    assert!(!state.is_empty());
    assert!(url.query_pairs().any(|(k, v)| k == "state" && v == state));
    assert!(url.query_pairs().any(|(k, v)| k == "client_id" && v == "client-id"));

    assert_eq!(store.load().await.unwrap(), Some(credential));
}

/// Test that a rejected refresh token falls back to the code flow
#[tokio::test]
async fn test_authorize_falls_back_when_refresh_rejected() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token has been revoked."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "after-consent",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    store.save(&expired_credential()).await.unwrap();

    let receiver = FixedCodeReceiver::new("code-456");
    let credential = authorize(&create_test_flow(&server), &store, &receiver)
        .await
        .expect("Failed to authorize");
    assert_eq!(credential.access_token, "after-consent");
    assert!(receiver.seen.lock().unwrap().is_some());
}

/// Test that token endpoint errors surface as authorization errors
#[tokio::test]
async fn test_exchange_error_is_auth_error() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=bad-client"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Unauthorized"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=bad-code"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Bad code"
        })))
        .mount(&server)
        .await;

    let flow = create_test_flow(&server);

    let err = flow
        .exchange_code("bad-client", "urn:ietf:wg:oauth:2.0:oob")
        .await
        .unwrap_err();
    match err {
        GenomicsError::Auth(message) => assert_eq!(message, "invalid_client: Unauthorized"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = flow
        .exchange_code("bad-code", "urn:ietf:wg:oauth:2.0:oob")
        .await
        .unwrap_err();
    match err {
        GenomicsError::InvalidGrant(message) => assert_eq!(message, "Bad code"),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Test that an unreachable token endpoint keeps the cached refresh token usable
#[tokio::test]
async fn test_authorize_keeps_cache_when_token_endpoint_unreachable() {
    let _ = env_logger::try_init();

    let mut secrets = ClientSecrets::new("client-id", "client-secret");
    secrets.token_uri = "http://127.0.0.1:1/token".to_string();
    let flow = OAuthFlow::new(secrets).expect("Failed to create flow");

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    store.save(&expired_credential()).await.unwrap();

    let receiver = FixedCodeReceiver::new("unused");
    let err = authorize(&flow, &store, &receiver).await.unwrap_err();
    assert!(matches!(err, GenomicsError::Http(_)));
    assert!(receiver.seen.lock().unwrap().is_none());

    let cached = store.load().await.unwrap().expect("cache should remain");
    assert!(!cached.invalid);
    assert!(cached.can_refresh());
    assert_eq!(cached.access_token, "stale");
}

/// Test that a token endpoint outage is returned without touching the cache
#[tokio::test]
async fn test_authorize_keeps_cache_on_server_error() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    store.save(&expired_credential()).await.unwrap();

    let receiver = FixedCodeReceiver::new("unused");
    let err = authorize(&create_test_flow(&server), &store, &receiver)
        .await
        .unwrap_err();
    assert!(matches!(err, GenomicsError::Auth(_)));
    assert!(receiver.seen.lock().unwrap().is_none());

    let cached = store.load().await.unwrap().expect("cache should remain");
    assert!(cached.can_refresh());
}

/// Test that API calls refresh an expired credential first
#[tokio::test]
async fn test_oauth_auth_refreshes_before_request() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/readgroupsets/search"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "readGroupSets": [{ "id": "rgs-1" }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let auth = OAuthAuth::new(create_test_flow(&server), expired_credential())
        .with_store(store.clone());
    let client = GenomicsClient::new(server.uri(), auth).expect("Failed to create client");

    // The second call reuses the refreshed token
    for _ in 0..2 {
        let id = resolve_read_group_set_id(&client, "1000g", "NA12878")
            .await
            .expect("Failed to resolve");
        assert_eq!(id, "rgs-1");
    }

    let saved = store.load().await.unwrap().expect("refreshed credential should be saved");
    assert_eq!(saved.access_token, "fresh");
}

/// Test that an expired credential without a refresh token fails
#[tokio::test]
async fn test_oauth_auth_without_refresh_token() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    let mut credential = Credential::new("stale");
    credential.expires_at = Some(Utc::now() - Duration::hours(1));
    let auth = OAuthAuth::new(create_test_flow(&server), credential);
    let client = GenomicsClient::new(server.uri(), auth).expect("Failed to create client");

    let err = resolve_read_group_set_id(&client, "1000g", "NA12878")
        .await
        .unwrap_err();
    assert!(matches!(err, GenomicsError::Auth(_)));
}

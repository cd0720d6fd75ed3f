//! End-to-end tests for the membership and prompt endpoints.
//!
//! These run against the in-memory store and cache backends, so the full
//! HTTP surface: routing, admin gate, handlers, coordinator, prompt
//! fallback: is exercised without external infrastructure.

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::task::JoinHandle;

use regiongate_server::{
    AdminConfig, AppConfig, StorageBackend, build_app, build_state, secrets,
};

const KEY_HEX: &str = "9e107d9d372bb6826bd81d3542a419d6e7f3a1c6c8a4b89c0f2d1e3b4a596877";
const ADMIN_SECRET: &str = "integration-admin-secret";

fn test_config(prompt_dir: &TempDir) -> AppConfig {
    let key = secrets::parse_key_hex(KEY_HEX).unwrap();
    let (ciphertext, nonce) = secrets::encrypt(ADMIN_SECRET, &key).unwrap();

    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.prompt.fallback_path = prompt_dir
        .path()
        .join("Promptwords")
        .to_string_lossy()
        .into_owned();
    config.admin = AdminConfig {
        secret_ciphertext: ciphertext,
        secret_nonce: nonce,
        key_hex: KEY_HEX.to_string(),
    };
    config
}

async fn start_server(
    config: &AppConfig,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let state = build_state(config).await.expect("build state");
    let app = build_app(config, state);

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

async fn check(client: &reqwest::Client, base: &str, code: &str) -> Value {
    let resp = client
        .post(format!("{base}/ratelimit/check"))
        .json(&json!({ "regioncode": code }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn membership_lifecycle() {
    let prompt_dir = TempDir::new().unwrap();
    let config = test_config(&prompt_dir);
    let (base, _shutdown_tx, _handle) = start_server(&config).await;
    let client = reqwest::Client::new();

    // Unknown code is not allowed.
    let body = check(&client, &base, "REGION_A").await;
    assert_eq!(body["allowed"], json!(false));

    // Open it.
    let resp = client
        .post(format!("{base}/ratelimit/open"))
        .header("secretKey", ADMIN_SECRET)
        .json(&json!({ "regioncode": "REGION_A" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["msg"], json!("region opened"));

    let body = check(&client, &base, "REGION_A").await;
    assert_eq!(body["allowed"], json!(true));

    // A second open conflicts.
    let resp = client
        .post(format!("{base}/ratelimit/open"))
        .header("secretKey", ADMIN_SECRET)
        .json(&json!({ "regioncode": "REGION_A" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["msg"], json!("already exists"));

    // Close it.
    let resp = client
        .post(format!("{base}/ratelimit/close"))
        .header("secretKey", ADMIN_SECRET)
        .json(&json!({ "regioncode": "REGION_A" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body = check(&client, &base, "REGION_A").await;
    assert_eq!(body["allowed"], json!(false));

    // Closing a region that was never opened still succeeds.
    let resp = client
        .post(format!("{base}/ratelimit/close"))
        .header("secretKey", ADMIN_SECRET)
        .json(&json!({ "regioncode": "REGION_B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn privileged_routes_require_the_secret() {
    let prompt_dir = TempDir::new().unwrap();
    let config = test_config(&prompt_dir);
    let (base, _shutdown_tx, _handle) = start_server(&config).await;
    let client = reqwest::Client::new();

    for path in ["/ratelimit/open", "/ratelimit/close"] {
        // Missing header.
        let resp = client
            .post(format!("{base}{path}"))
            .json(&json!({ "regioncode": "REGION_A" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["msg"], json!("unauthorized"));

        // Wrong secret.
        let resp = client
            .post(format!("{base}{path}"))
            .header("secretKey", "guess")
            .json(&json!({ "regioncode": "REGION_A" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    let resp = client
        .post(format!("{base}/ratelimit/prompt"))
        .json(&json!({ "prompt": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    // The check endpoint is public.
    let body = check(&client, &base, "REGION_A").await;
    assert_eq!(body["allowed"], json!(false));
}

#[tokio::test]
async fn prompt_update_writes_through_and_rides_along_on_check() {
    let prompt_dir = TempDir::new().unwrap();
    let config = test_config(&prompt_dir);
    let (base, _shutdown_tx, _handle) = start_server(&config).await;
    let client = reqwest::Client::new();

    // No prompt anywhere yet: check still succeeds with an empty string.
    let body = check(&client, &base, "REGION_A").await;
    assert_eq!(body["promptwords"], json!(""));

    let resp = client
        .post(format!("{base}/ratelimit/prompt"))
        .header("secretKey", ADMIN_SECRET)
        .json(&json!({ "prompt": "service notice" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    // The durable copy landed byte-for-byte.
    let on_disk = std::fs::read_to_string(&config.prompt.fallback_path).unwrap();
    assert_eq!(on_disk, "service notice");

    let body = check(&client, &base, "REGION_A").await;
    assert_eq!(body["promptwords"], json!("service notice"));
}

#[tokio::test]
async fn cold_cache_serves_prompt_from_file_trimmed() {
    let prompt_dir = TempDir::new().unwrap();
    let config = test_config(&prompt_dir);
    // Seed the fallback file before the server (and its empty cache) start.
    std::fs::write(&config.prompt.fallback_path, "hello world\n").unwrap();

    let (base, _shutdown_tx, _handle) = start_server(&config).await;
    let client = reqwest::Client::new();

    let body = check(&client, &base, "REGION_A").await;
    assert_eq!(body["promptwords"], json!("hello world"));
}

#[tokio::test]
async fn invalid_region_codes_are_rejected_early() {
    let prompt_dir = TempDir::new().unwrap();
    let config = test_config(&prompt_dir);
    let (base, _shutdown_tx, _handle) = start_server(&config).await;
    let client = reqwest::Client::new();

    // Empty code.
    let resp = client
        .post(format!("{base}/ratelimit/check"))
        .json(&json!({ "regioncode": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["msg"], json!("invalid region code"));

    // Oversized code.
    let resp = client
        .post(format!("{base}/ratelimit/open"))
        .header("secretKey", ADMIN_SECRET)
        .json(&json!({ "regioncode": "R".repeat(64) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    // Malformed body.
    let resp = client
        .post(format!("{base}/ratelimit/check"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn health_endpoints_respond() {
    let prompt_dir = TempDir::new().unwrap();
    let config = test_config(&prompt_dir);
    let (base, _shutdown_tx, _handle) = start_server(&config).await;
    let client = reqwest::Client::new();

    for path in ["/healthz", "/readyz", "/"] {
        let resp = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    // Responses carry a request id.
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.headers().contains_key("x-request-id"));
}

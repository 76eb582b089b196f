//! Shared setup: a mock server on an ephemeral port and a client bound to it.

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use mock_server::{MockConfig, MockState, Shared};
use nativ::{ClientConfig, NativClient};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start a mock server and return a client pointed at it plus the server's
/// state for inspecting the request journal.
pub async fn start(config: MockConfig) -> (NativClient, Shared) {
    start_with(config, ClientConfig::new().api_key(mock_server::API_KEY)).await
}

pub async fn start_with(config: MockConfig, client_config: ClientConfig) -> (NativClient, Shared) {
    init_tracing();
    let state = MockState::new(config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run_with(listener, state.clone()));

    let client = NativClient::new(client_config.base_url(format!("http://{addr}/"))).unwrap();
    (client, state)
}

pub fn short_timeout(ms: u64) -> ClientConfig {
    ClientConfig::new()
        .api_key(mock_server::API_KEY)
        .timeout(Duration::from_millis(ms))
}

/// Write `data` to a fresh temp directory under `name` and return the path.
pub fn temp_file(name: &str, data: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nativ-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

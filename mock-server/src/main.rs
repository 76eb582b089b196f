use mock_server::{MockConfig, MockState};
use tokio::net::TcpListener;

/// Serves the mock Nativ API. `PORT` picks the port (default 3000) and
/// `MOCK_API_KEY` overrides the accepted key.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mut config = MockConfig::default();
    if let Ok(key) = std::env::var("MOCK_API_KEY") {
        config.api_key = key;
    }

    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    let addr = listener.local_addr()?;
    println!("mock Nativ API on http://{addr}");
    println!("  NATIV_API_URL=http://{addr} NATIV_API_KEY={}", config.api_key);
    mock_server::run_with(listener, MockState::new(config)).await
}

//! Common test utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use gambit_server::{Server, ServerConfig};
use gambit_session::{SessionStore, StoreConfig};

/// A test server that runs in the background.
///
/// The server shuts down when this value is dropped.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client for this server.
    pub client: Client,
    /// Store behind the server, for direct inspection.
    pub store: SessionStore,
    shutdown: CancellationToken,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with rate limiting off and no not-found delay.
    pub async fn start() -> Result<Self> {
        Self::start_with(
            ServerConfig::new()
                .with_rate_limiting(false)
                .with_request_logging(false)
                .with_not_found_delay(Duration::ZERO),
            StoreConfig::default(),
        )
        .await
    }

    /// Start a test server with explicit configuration.
    pub async fn start_with(config: ServerConfig, store_config: StoreConfig) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let store = SessionStore::new(store_config);
        let server = Server::new(store.clone(), config.with_bind_address(addr));

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener, token).await;
        });

        let client = Client::new();
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            store,
            shutdown,
            _handle: handle,
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of a game route under the default prefix.
    pub fn game_url(&self, path: &str) -> String {
        format!("{}/uc2024{}", self.base_url(), path)
    }

    /// Check if server is healthy.
    pub async fn health(&self) -> Result<bool> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url()))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Wait for the server to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!("Timeout waiting for server to start"),
    }
}

//! Integration tests for LuxeMarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p luxemarket-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port with a fresh
//! data directory, so tests run in parallel without sharing shopper state.
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Product listing, detail and search
//! - `storefront_cart` - Cart, badge and wishlist behaviour, persistence across restarts
//! - `storefront_checkout` - Shipping step and order placement

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use luxemarket_storefront::catalog::MockCatalog;
use luxemarket_storefront::config::StorefrontConfig;
use luxemarket_storefront::state::AppState;
use luxemarket_storefront::storage::FileStorage;
use reqwest::Client;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A running storefront and a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    server: JoinHandle<()>,
    data_dir: Option<TempDir>,
}

impl TestContext {
    /// Start a storefront over a fresh temporary data directory.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut ctx = Self::with_data_dir(dir.path()).await;
        ctx.data_dir = Some(dir);
        ctx
    }

    /// Start a storefront over an existing data directory.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn with_data_dir(data_dir: &Path) -> Self {
        let config = StorefrontConfig {
            port: 0,
            data_dir: data_dir.to_path_buf(),
            ..StorefrontConfig::default()
        };
        let catalog = MockCatalog::from_seed(Duration::ZERO).expect("Failed to load seed catalog");
        let storage = FileStorage::new(data_dir);
        let state = AppState::new(Arc::new(catalog), Arc::new(storage));

        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr: SocketAddr = listener.local_addr().expect("Listener has no address");

        let app = luxemarket_storefront::app(state);
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            server,
            data_dir: None,
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Stop the server, returning its data directory if this context owns it.
    pub async fn shutdown(mut self) -> Option<TempDir> {
        self.server.abort();
        let _ = (&mut self.server).await;
        self.data_dir.take()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

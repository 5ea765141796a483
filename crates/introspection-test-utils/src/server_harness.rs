//! Test server harness for E2E testing
//!
//! Provides `TestIntrospectionServer` for spawning the demo service in tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use token_introspection::client::IntrospectionClient;
use token_introspection::config::Config;
use token_introspection::routes::{self, AppState};

/// Test harness for spawning the demo service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// let stub = StubIntrospectionServer::start().await;
/// let server = TestIntrospectionServer::spawn(&stub.endpoint()).await?;
///
/// let response = reqwest::get(format!("{}/v1/health", server.url())).await?;
/// assert_eq!(response.status(), 200);
/// ```
pub struct TestIntrospectionServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestIntrospectionServer {
    /// Spawn a server that introspects against `endpoint`.
    pub async fn spawn(endpoint: &str) -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(endpoint, HashMap::new()).await
    }

    /// Spawn a server with additional configuration variables.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn_with_vars(
        endpoint: &str,
        extra_vars: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("INTROSPECTION_ENDPOINT".to_string(), endpoint.to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ]);
        vars.extend(extra_vars);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let client = IntrospectionClient::new(config.to_options())
            .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

        // The global recorder can only be installed once per process
        let metrics_handle = match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let state = Arc::new(AppState {
            config: config.clone(),
            client,
            metrics_handle,
        });

        let app = routes::build_routes(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestIntrospectionServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_server::StubIntrospectionServer;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let stub = StubIntrospectionServer::start().await;
        let server = TestIntrospectionServer::spawn(&stub.endpoint()).await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));

        let response = reqwest::get(format!("{}/v1/health", server.url())).await?;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cache"], "disabled");

        Ok(())
    }

    #[tokio::test]
    async fn test_server_provides_config_access() -> Result<(), anyhow::Error> {
        let stub = StubIntrospectionServer::start().await;
        let server = TestIntrospectionServer::spawn_with_vars(
            &stub.endpoint(),
            HashMap::from([(
                "INTROSPECTION_CACHE_TTL_SECONDS".to_string(),
                "60".to_string(),
            )]),
        )
        .await?;

        assert_eq!(server.config().introspection_endpoint, stub.endpoint());
        assert!(server.config().cache_enabled());

        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_servers_different_ports() -> Result<(), anyhow::Error> {
        let stub = StubIntrospectionServer::start().await;
        let server1 = TestIntrospectionServer::spawn(&stub.endpoint()).await?;
        let server2 = TestIntrospectionServer::spawn(&stub.endpoint()).await?;

        assert_ne!(server1.addr(), server2.addr());

        Ok(())
    }
}

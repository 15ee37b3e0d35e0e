//! Process lifecycle: load configuration, set up logging, serve the webhook
//! and stop on Ctrl+C or SIGTERM.
//!
//! ```rust,ignore
//! use vvbot_runtime::VvRuntime;
//!
//! let runtime = VvRuntime::builder()
//!     .config_file("deploy/vvbot.yml")
//!     .build()?;
//! let handler = make_handler(runtime.config());
//! runtime.run(handler).await?;
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};

use vvbot_transport::ListenerHandle;
use vvbot_transport::http::{WebhookHandler, http_listen};

use crate::config::{ConfigLoader, VvConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// The vvbot runtime.
///
/// Holds the validated configuration, shared read-only with every request.
pub struct VvRuntime {
    config: Arc<VvConfig>,
}

impl VvRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Validates the configuration and initializes logging from it.
    pub fn from_config(config: VvConfig) -> RuntimeResult<Self> {
        validate_config(&config)?;
        logging::init_from_config(&config.logging);

        info!(
            bot = %config.bot.qq,
            listen = %config.server.bind_addr(),
            napcat = %config.napcat.api_url(),
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Returns the shared configuration.
    pub fn config(&self) -> &Arc<VvConfig> {
        &self.config
    }

    /// Binds the webhook listener and returns its handle.
    pub async fn serve(&self, handler: Arc<dyn WebhookHandler>) -> RuntimeResult<ListenerHandle> {
        let server = &self.config.server;
        let handle = http_listen(&server.bind_addr(), &server.path, handler).await?;
        info!(addr = %handle.local_addr, path = %server.path, "Listening for gateway events");
        Ok(handle)
    }

    /// Serves until Ctrl+C or SIGTERM.
    pub async fn run(&self, handler: Arc<dyn WebhookHandler>) -> RuntimeResult<()> {
        let handle = self.serve(handler).await?;
        info!("vvbot is now running. Press Ctrl+C to stop.");

        let result = wait_for_shutdown().await;
        handle.stop();
        info!("Runtime stopped");
        result
    }

    /// Serves until `shutdown` completes.
    pub async fn run_until<F>(&self, handler: Arc<dyn WebhookHandler>, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let handle = self.serve(handler).await?;
        shutdown.await;
        handle.stop();
        info!("Runtime stopped");
        Ok(())
    }
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_shutdown() -> RuntimeResult<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(|e| RuntimeError::Signal(e.to_string()))?;

        tokio::select! {
            res = signal::ctrl_c() => {
                res.map_err(|e| RuntimeError::Signal(e.to_string()))?;
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .map_err(|e| RuntimeError::Signal(e.to_string()))?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}

/// Builder for creating a [`VvRuntime`] from layered configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    port: Option<u16>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            port: None,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Overrides `server.port` after all sources are merged.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Loads, validates and builds the runtime.
    pub fn build(self) -> RuntimeResult<VvRuntime> {
        let mut config = self.config_loader.load()?;
        if let Some(port) = self.port {
            if port != config.server.port {
                warn!(from = config.server.port, to = port, "Overriding listen port");
            }
            config.server.port = port;
        }
        VvRuntime::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Noop(AtomicUsize);

    #[async_trait]
    impl WebhookHandler for Noop {
        async fn on_message(&self, _data: &[u8]) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    fn test_config(port: u16) -> VvConfig {
        let mut config = VvConfig::default();
        config.bot.qq = "10000".to_string();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let err = VvRuntime::from_config(VvConfig::default()).err().unwrap();
        assert!(matches!(err, RuntimeError::Config(_)));
    }

    #[test]
    fn test_builder_port_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vvbot.yml"), "bot:\n  qq: \"1\"\n").unwrap();

        let runtime = VvRuntime::builder()
            .search_path(dir.path())
            .without_env()
            .port(9123)
            .build()
            .unwrap();
        assert_eq!(runtime.config().server.port, 9123);
        assert_eq!(runtime.config().bot.qq, "1");
    }

    #[tokio::test]
    async fn test_serve_binds_configured_port() {
        let port = free_port();
        let runtime = VvRuntime::from_config(test_config(port)).unwrap();
        let handle = runtime.serve(Arc::new(Noop(AtomicUsize::new(0)))).await.unwrap();
        assert_eq!(handle.local_addr.port(), port);
        handle.stop();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_error() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let runtime = VvRuntime::from_config(test_config(port)).unwrap();

        let err = runtime
            .run_until(Arc::new(Noop(AtomicUsize::new(0))), async {})
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Transport(_)));
    }

    #[tokio::test]
    async fn test_run_until_stops() {
        let runtime = VvRuntime::from_config(test_config(free_port())).unwrap();
        runtime
            .run_until(Arc::new(Noop(AtomicUsize::new(0))), async {})
            .await
            .unwrap();
    }
}

//! `WuxingServer` builder and accept loop.
//!
//! This is the entry point for running the login server. It ties together
//! all the layers: transport → protocol → auth + store.

use std::sync::Arc;

use wuxing_auth::{AuthConfig, Mailer};
use wuxing_protocol::{Codec, JsonCodec};
use wuxing_store::{KvBackend, ProfileStore};
use wuxing_transport::{Transport, WebSocketTransport};

use crate::WuxingError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The store
/// handles its own interior locking; the mailer, codec, and auth config are
/// read-only after construction — the notification channel is injected here
/// once and never looked up through any global registry.
pub(crate) struct ServerState<B: KvBackend, M: Mailer, C: Codec> {
    pub(crate) store: ProfileStore<B>,
    pub(crate) mailer: M,
    pub(crate) codec: C,
    pub(crate) auth: AuthConfig,
}

/// Builder for configuring and starting a Wuxing login server.
///
/// # Example
///
/// ```rust,no_run
/// use wuxing::prelude::*;
///
/// # async fn run() -> Result<(), WuxingError> {
/// let server = WuxingServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(MemoryBackend::new(), MockMailer::new())
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct WuxingServerBuilder {
    bind_addr: String,
    auth_config: AuthConfig,
}

impl WuxingServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            auth_config: AuthConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the auth configuration (salt, validity window).
    pub fn auth_config(mut self, config: AuthConfig) -> Self {
        self.auth_config = config;
        self
    }

    /// Builds the server with the given storage backend and mailer.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` as the wire defaults.
    pub async fn build<B: KvBackend, M: Mailer>(
        self,
        backend: B,
        mailer: M,
    ) -> Result<WuxingServer<B, M, JsonCodec>, WuxingError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            store: ProfileStore::new(backend),
            mailer,
            codec: JsonCodec,
            auth: self.auth_config,
        });

        Ok(WuxingServer { transport, state })
    }
}

impl Default for WuxingServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Wuxing login server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct WuxingServer<B: KvBackend, M: Mailer, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<B, M, C>>,
}

impl<B, M, C> WuxingServer<B, M, C>
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    /// Creates a new builder.
    pub fn builder() -> WuxingServerBuilder {
        WuxingServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), WuxingError> {
        tracing::info!("Wuxing login server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection::<B, M, C>(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

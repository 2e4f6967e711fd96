//! `DigitduelServer` builder and accept loop.
//!
//! This is the entry point for running a digitduel server. It ties
//! together all the layers: transport → protocol → registry → room.

use std::sync::Arc;

use digitduel_engine::{RoomRegistry, RoomRules};
use digitduel_protocol::JsonCodec;
use digitduel_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::DigitduelError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry lock guards only the room table; gameplay runs inside each
/// room's actor task, never under this lock.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a digitduel server.
///
/// # Example
///
/// ```rust,ignore
/// let server = DigitduelServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct DigitduelServerBuilder {
    bind_addr: String,
    rules: RoomRules,
}

impl DigitduelServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            rules: RoomRules::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the rules applied to every room this server creates.
    pub fn rules(mut self, rules: RoomRules) -> Self {
        self.rules = rules;
        self
    }

    /// Builds the server and binds its listener.
    pub async fn build(self) -> Result<DigitduelServer, DigitduelError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new(self.rules)),
            codec: JsonCodec,
        });

        Ok(DigitduelServer { transport, state })
    }
}

impl Default for DigitduelServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running digitduel server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DigitduelServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl DigitduelServer {
    /// Creates a new builder.
    pub fn builder() -> DigitduelServerBuilder {
        DigitduelServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each
    /// connected player. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), DigitduelError> {
        tracing::info!("digitduel server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
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

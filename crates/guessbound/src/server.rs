//! `GuessboundServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → registry/rooms.

use std::sync::Arc;

use guessbound_room::{GameConfig, RoomRegistry};
use guessbound_transport::WsListener;
use guessbound_words::{WordListPaths, WordSource};

use crate::ServerError;
use crate::gateway::{ServerState, handle_connection};
use crate::sweeper;

/// Builder for configuring and starting a Guessbound server.
///
/// # Example
///
/// ```rust,no_run
/// use guessbound::GuessboundServer;
///
/// # async fn run() -> Result<(), guessbound::ServerError> {
/// let server = GuessboundServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GuessboundServerBuilder {
    bind_addr: String,
    config: GameConfig,
    words: Option<WordSource>,
}

impl GuessboundServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            config: GameConfig::default(),
            words: None,
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Overrides the game timings (tests shrink the round here).
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Supplies the word pools. Without this, the default word-list
    /// paths are loaded at build time.
    pub fn words(mut self, words: WordSource) -> Self {
        self.words = Some(words);
        self
    }

    /// Binds the listener and assembles the server.
    pub async fn build(self) -> Result<GuessboundServer, ServerError> {
        let listener = WsListener::bind(&self.bind_addr).await?;
        let words = self
            .words
            .unwrap_or_else(|| WordSource::load(&WordListPaths::default()));

        let state = Arc::new(ServerState {
            registry: RoomRegistry::new(self.config).into_shared(),
            words: Arc::new(words),
        });

        Ok(GuessboundServer { listener, state })
    }
}

impl Default for GuessboundServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Guessbound server.
pub struct GuessboundServer {
    listener: WsListener,
    state: Arc<ServerState>,
}

impl GuessboundServer {
    /// Creates a new builder.
    pub fn builder() -> GuessboundServerBuilder {
        GuessboundServerBuilder::new()
    }

    /// The bound local address.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop (and the presence sweeper) until the process
    /// is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        let _sweeper = sweeper::spawn(self.state.registry.clone());
        tracing::info!("guessbound server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(conn, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

//! Error types for the transport layer.

use tokio_tungstenite::tungstenite;

/// Errors that can occur on the WebSocket transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listener could not bind to the requested address.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// An incoming TCP connection could not be accepted.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),

    /// The WebSocket upgrade handshake failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    /// Sending a frame failed (peer gone, socket broken).
    #[error("failed to send frame: {0}")]
    Send(#[source] tungstenite::Error),

    /// Receiving a frame failed.
    #[error("failed to receive frame: {0}")]
    Recv(#[source] tungstenite::Error),
}

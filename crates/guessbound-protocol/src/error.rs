//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A frame could not be serialized to JSON.
    #[error("failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound frame was not valid JSON or not a known event.
    #[error("failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),
}

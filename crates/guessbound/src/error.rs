//! Unified error type for the server crate.

use guessbound_protocol::ProtocolError;
use guessbound_transport::TransportError;

/// Top-level error wrapping the layer-specific errors.
///
/// Game-rule failures (`GameError`) never appear here: they are answered
/// to the requesting client through acks and leave the server running.
/// Only transport and encoding problems bubble up this far.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

//! WebSocket transport for Guessbound.
//!
//! The protocol is JSON text frames over a persistent connection, so this
//! layer is deliberately thin: accept sockets, hand out
//! [`ConnectionId`](guessbound_protocol::ConnectionId)s, and move text
//! frames in both directions. Delivery and ordering
//! semantics are the WebSocket's own (reliable, per-connection ordered);
//! nothing here adds behavior on top.
//!
//! A [`WsConnection`] keeps its sink and stream halves behind separate
//! locks so an outbound broadcast is never blocked behind a pending
//! `recv` — the gateway reads from one task while a forwarding task
//! writes from another.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsConnection, WsListener};

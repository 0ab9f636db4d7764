//! Wire protocol for Guessbound.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`Role`], [`Difficulty`], [`ExplainerAnswer`],
//!   [`ConnectionId`], [`PlayerEntry`]) — the shared vocabulary.
//! - **Frames** ([`ClientFrame`], [`ClientEvent`], [`ServerEvent`],
//!   [`Ack`], [`AckFrame`]) — the JSON messages that travel on the wire,
//!   plus encode/decode helpers.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! # Wire format
//!
//! Every WebSocket text frame carries exactly one JSON object. Inbound
//! frames are a [`ClientEvent`] tagged by `"event"`, optionally carrying
//! an `"ack"` correlation id chosen by the client. Outbound frames are
//! either a [`ServerEvent`] (same tagging) or an ack reply
//! `{"ack": <id>, "success": true, ...}` / `{"ack": <id>, "error": "..."}`.
//!
//! The event names and payload fields are a compatibility contract with
//! existing clients — the shape tests in this crate pin them exactly.

mod error;
mod frame;
mod types;

pub use error::ProtocolError;
pub use frame::{
    Ack, AckFrame, ClientEvent, ClientFrame, ServerEvent, decode_client,
    encode_ack, encode_event,
};
pub use types::{ConnectionId, Difficulty, ExplainerAnswer, PlayerEntry, Role};

//! Room lifecycle for Guessbound — the core of the server.
//!
//! # Key types
//!
//! - [`Room`] — one play session: players, roles, secret word, chat,
//!   countdown; every state transition lives here
//! - [`RoomRegistry`] / [`SharedRegistry`] — code → room map, code
//!   generation/validation, connection index, garbage collection
//! - [`RoundTimer`] — the cancellable per-round countdown task
//! - [`GameConfig`] — timings (round length, grace, sweep interval)
//! - [`GameError`] — validation failures whose `Display` strings are the
//!   client-facing ack messages
//!
//! Concurrency model: all mutations are serialized through the
//! [`SharedRegistry`] mutex — inbound events from the gateway, countdown
//! ticks, and sweeper passes alike — which gives every room the
//! at-most-one-concurrent-mutation guarantee without per-room locks.

mod config;
mod error;
mod registry;
mod room;
mod timer;

pub use config::GameConfig;
pub use error::GameError;
pub use registry::{RoomCode, RoomRegistry, SharedRegistry, schedule_removal};
pub use room::{
    ChatLine, CountdownStep, Disposition, OutboundSender, Phase, Player, Room,
};
pub use timer::RoundTimer;

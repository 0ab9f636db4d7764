//! # Guessbound
//!
//! Real-time room server for a two-player word-guessing party game:
//! players join a coded room, the host assigns the Explainer and Guesser
//! roles, the explainer picks a secret word, and the guesser names it via
//! chat before the clock runs out — with blanks, one hint per round, and
//! yes/no/maybe answers along the way.
//!
//! This crate is the outermost layer: the session gateway (per-connection
//! event dispatch), the presence sweeper, and the server builder. The
//! game itself lives in [`guessbound_room`]; the wire contract in
//! [`guessbound_protocol`]; word pools and blanks in [`guessbound_words`].

mod error;
mod gateway;
mod server;
mod sweeper;

pub use error::ServerError;
pub use server::{GuessboundServer, GuessboundServerBuilder};

// Re-exported for binaries and tests that configure a server.
pub use guessbound_room::GameConfig;
pub use guessbound_words::{WordListPaths, WordSource};

//! Error taxonomy for room and registry operations.
//!
//! The `Display` strings double as the human-readable messages returned
//! through ack callbacks, so they are part of the client-facing surface —
//! change them only deliberately.
//!
//! Unauthorized actions (wrong role, not the host) are intentionally NOT
//! errors: they are silent no-ops, because an action that should never
//! have been offered to this player gets no feedback either.

/// A validation failure surfaced to the requesting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// `createGame` without a display name.
    #[error("Name required")]
    NameRequired,

    /// `joinGame` with an empty code or name.
    #[error("Invalid code or name")]
    MissingCodeOrName,

    /// A room code failed the charset check.
    #[error("Room code may only contain letters and numbers.")]
    InvalidCode,

    /// A custom room code collided (case-insensitively) with a live room.
    #[error("This room code is already taken!")]
    CodeTaken,

    /// No live room has this code.
    #[error("No game found with that code!")]
    RoomNotFound,

    /// The display name is already used inside the room.
    #[error("Name already taken.")]
    NameTaken,

    /// The room already has two players.
    #[error("This room is already full (max 2 players).")]
    RoomFull,

    /// This connection is already a player somewhere.
    #[error("You are already in this game.")]
    AlreadyJoined,

    /// `startGame` before both roles were assigned.
    #[error("Please assign Guesser and Explainer first.")]
    RolesMissing,

    /// A custom word was empty after trimming.
    #[error("Word must not be empty.")]
    EmptyWord,

    /// A custom word contained characters outside letters/space/hyphen.
    #[error("Invalid word.")]
    InvalidCharacters,

    /// A random word was requested while every pool is empty.
    #[error("No words available.")]
    NoWordsAvailable,
}

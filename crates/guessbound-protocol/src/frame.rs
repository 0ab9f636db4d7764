//! Frame types: everything that travels on the wire, and helpers to
//! encode/decode them.
//!
//! The event names are socket.io-style camelCase strings
//! (`"createGame"`, `"playerList"`, …) — they are the compatibility
//! contract with the deployed client and MUST match exactly. The
//! `#[serde(tag = "event", rename_all = "camelCase")]` attribute pair is
//! what produces them: the variant name becomes the `"event"` value and
//! the variant fields become sibling keys, so
//! `ClientEvent::CreateGame { name, custom_code }` is
//! `{"event":"createGame","name":"Ana","customCode":"AB12"}` on the wire.
//!
//! Ack replies use a separate frame shape (`{"ack": <id>, ...}`) so a
//! client can tell responses to its own requests apart from broadcasts.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::{Difficulty, ExplainerAnswer, PlayerEntry, Role};

// ---------------------------------------------------------------------------
// Inbound frames
// ---------------------------------------------------------------------------

/// One inbound WebSocket text frame: an event plus an optional ack id.
///
/// The ack id is chosen by the client; when present, the server answers
/// the request with an [`AckFrame`] carrying the same id. Events the
/// server never acknowledges (`startGame`, `leaveRoom`) simply ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientFrame {
    /// Correlation id for the ack reply, if the client wants one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,

    /// The event itself, flattened beside the ack id.
    #[serde(flatten)]
    pub event: ClientEvent,
}

/// Every event a client can send.
///
/// Names and payload fields mirror the wire contract exactly; see the
/// shape tests below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Create a room, optionally with a caller-chosen code.
    CreateGame {
        name: String,
        #[serde(
            rename = "customCode",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        custom_code: Option<String>,
    },

    /// Join an existing room by code.
    JoinGame { code: String, name: String },

    /// Host starts the round (requires both roles assigned).
    StartGame { code: String },

    /// Leave the room voluntarily.
    LeaveRoom { code: String },

    /// Host assigns a role to a player, addressed by display name.
    AssignRole {
        code: String,
        name: String,
        role: Role,
    },

    /// Free-text chat; a guesser's message is also checked against the
    /// secret word.
    SendChat { text: String },

    /// Explainer supplies their own secret word.
    ChooseCustomWord { word: String },

    /// Explainer asks for a word from the weighted pools.
    ChooseRandomWord,

    /// Explainer answers the latest guess with one of the fixed replies.
    ExplainerAnswer { answer: ExplainerAnswer },

    /// Explainer reveals one random letter (once per round).
    GiveHint,

    /// Any participant adds five minutes to the round clock.
    ExtendTime,

    /// Any participant aborts the round.
    GiveUp { reason: String },
}

// ---------------------------------------------------------------------------
// Outbound frames
// ---------------------------------------------------------------------------

/// Every event the server can send.
///
/// Broadcast to the whole room unless noted unicast. Optional fields use
/// `skip_serializing_if` only where the client expects the key to be
/// absent entirely (`gameStarted.word`, `gameAborted.by`); fields it
/// expects as explicit `null` keep plain `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Current roster: names, ingame flags, roles, and the host's name.
    PlayerList {
        players: Vec<PlayerEntry>,
        #[serde(rename = "hostName")]
        host_name: Option<String>,
    },

    /// Unicast: the round is being prepared; switch to the game UI.
    RoundPreparing { role: Role },

    /// Unicast to the explainer: pick random or custom word.
    ChooseWordMethod,

    /// Unicast to the guesser: the explainer is choosing a word.
    WaitingForWord,

    /// A secret word was selected (word itself not included).
    WordChosen {
        by: String,
        blanks: String,
        difficulty: Difficulty,
    },

    /// Unicast per ingame player. `word` is present only for the
    /// explainer — the guesser must never receive the plaintext word.
    GameStarted {
        role: Role,
        blanks: String,
        #[serde(rename = "secondsLeft")]
        seconds_left: u64,
        difficulty: Difficulty,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        word: Option<String>,
    },

    /// The masked word changed (round start or after a hint).
    BlanksUpdate { blanks: String },

    /// A letter was revealed. `index` is a character position.
    HintGiven {
        blanks: String,
        index: usize,
        letter: char,
    },

    /// Countdown tick with the remaining seconds.
    TimerUpdate { seconds: u64 },

    /// A chat line (player chat or an explainer answer).
    ChatMessage { from: String, text: String },

    /// The guesser named the word.
    GameWon {
        winner: String,
        word: String,
        difficulty: Difficulty,
    },

    /// The clock ran out; the word is revealed.
    TimeUp { word: String, difficulty: Difficulty },

    /// The round was aborted (give-up or player loss). `by` is absent
    /// for disconnect-induced aborts.
    GameAborted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by: Option<String>,
        reason: String,
        word: Option<String>,
        difficulty: Option<Difficulty>,
    },

    /// Unicast: a human-readable error near the triggering control.
    ErrorMessage { message: String },

    /// Unicast: the requested room code does not exist.
    NoGameFound,
}

// ---------------------------------------------------------------------------
// Ack replies
// ---------------------------------------------------------------------------

/// The body of an ack reply: `{"success": true, ...}` or
/// `{"error": "<message>"}`.
///
/// `#[serde(untagged)]` picks the variant from the fields present — the
/// client only ever checks for an `error` key, so no extra tag is wanted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ack {
    /// The request succeeded, with optional extras depending on the event.
    Success {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        difficulty: Option<Difficulty>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seconds: Option<u64>,
    },

    /// The request failed; `error` is the human-readable message.
    Failure { error: String },
}

impl Ack {
    /// Plain success with no extra fields.
    pub fn ok() -> Self {
        Ack::Success {
            success: true,
            code: None,
            difficulty: None,
            seconds: None,
        }
    }

    /// Success carrying the (normalized) room code.
    pub fn ok_code(code: impl Into<String>) -> Self {
        Ack::Success {
            success: true,
            code: Some(code.into()),
            difficulty: None,
            seconds: None,
        }
    }

    /// Success carrying the selected word's difficulty.
    pub fn ok_difficulty(difficulty: Difficulty) -> Self {
        Ack::Success {
            success: true,
            code: None,
            difficulty: Some(difficulty),
            seconds: None,
        }
    }

    /// Success carrying the new remaining seconds.
    pub fn ok_seconds(seconds: u64) -> Self {
        Ack::Success {
            success: true,
            code: None,
            difficulty: None,
            seconds: Some(seconds),
        }
    }

    /// Failure with a human-readable message.
    pub fn err(message: impl Into<String>) -> Self {
        Ack::Failure {
            error: message.into(),
        }
    }
}

/// A complete ack reply frame: correlation id plus body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckFrame {
    /// The id the client sent with its request.
    pub ack: u64,

    #[serde(flatten)]
    pub body: Ack,
}

// ---------------------------------------------------------------------------
// Encode / decode helpers
// ---------------------------------------------------------------------------

/// Decodes one inbound text frame.
pub fn decode_client(text: &str) -> Result<ClientFrame, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

/// Encodes a server event as one outbound text frame.
pub fn encode_event(event: &ServerEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(ProtocolError::Encode)
}

/// Encodes an ack reply as one outbound text frame.
pub fn encode_ack(ack_id: u64, body: &Ack) -> Result<String, ProtocolError> {
    serde_json::to_string(&AckFrame { ack: ack_id, body: body.clone() })
        .map_err(ProtocolError::Encode)
}

// =========================================================================
// Tests
// =========================================================================

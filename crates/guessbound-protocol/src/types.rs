//! Shared vocabulary types for the Guessbound wire contract.
//!
//! Everything here either travels on the wire (roles, difficulties,
//! answers, player list entries) or identifies a connection on the server
//! side ([`ConnectionId`]). The serde attributes pin the exact strings the
//! client expects — `"guesser"`, not `"Guesser"` — and the tests at the
//! bottom verify them, because a mismatch means deployed clients stop
//! understanding us.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ConnectionId
// ---------------------------------------------------------------------------

/// Opaque identifier for one live connection.
///
/// Assigned by the transport when a socket is accepted, and the only
/// notion of identity the server has: a player *is* their connection.
/// It never appears on the wire — clients address each other by display
/// name — so it intentionally does not implement `Serialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a `ConnectionId` from a raw counter value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The two asymmetric roles in a round.
///
/// `#[serde(rename_all = "lowercase")]` makes the wire values `"guesser"`
/// and `"explainer"`, matching the `assignRole` payload and the `role`
/// field of `playerList` / `gameStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Tries to name the secret word via chat.
    Guesser,
    /// Knows the secret word and answers yes/no/maybe/idk.
    Explainer,
}

impl Role {
    /// The opposite role.
    pub fn other(self) -> Self {
        match self {
            Role::Guesser => Role::Explainer,
            Role::Explainer => Role::Guesser,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Guesser => write!(f, "guesser"),
            Role::Explainer => write!(f, "explainer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Which word pool a secret word came from.
///
/// `Custom` marks a word typed in by the explainer rather than drawn from
/// a pool. Revealed to both players when a round resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Standard,
    Easy,
    Difficult,
    Custom,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Standard => write!(f, "standard"),
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Difficult => write!(f, "difficult"),
            Difficulty::Custom => write!(f, "custom"),
        }
    }
}

// ---------------------------------------------------------------------------
// ExplainerAnswer
// ---------------------------------------------------------------------------

/// The fixed set of answers the explainer may give to a guess.
///
/// Restricting this at the type level is what enforces the "answer must
/// be one of a fixed small enumeration" rule: a frame with any other
/// value fails to decode and never reaches the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainerAnswer {
    Yes,
    No,
    Maybe,
    Idk,
}

impl ExplainerAnswer {
    /// The wire string, also used as the chat-line text.
    pub fn as_str(self) -> &'static str {
        match self {
            ExplainerAnswer::Yes => "yes",
            ExplainerAnswer::No => "no",
            ExplainerAnswer::Maybe => "maybe",
            ExplainerAnswer::Idk => "idk",
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerEntry
// ---------------------------------------------------------------------------

/// One row of the `playerList` broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Display name, unique within the room.
    pub name: String,
    /// `true` once a round has started for this player.
    pub ingame: bool,
    /// Assigned role, `null` while unassigned.
    pub role: Option<Role>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Shape tests: the lowercase wire strings are part of the client
    //! contract and must not drift when variants are renamed in Rust.

    use super::*;

    #[test]
    fn test_connection_id_display_and_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.to_string(), "conn-42");
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "ana");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(2)], "bob");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Guesser).unwrap(), "\"guesser\"");
        assert_eq!(
            serde_json::to_string(&Role::Explainer).unwrap(),
            "\"explainer\""
        );
    }

    #[test]
    fn test_role_deserializes_from_lowercase() {
        let role: Role = serde_json::from_str("\"explainer\"").unwrap();
        assert_eq!(role, Role::Explainer);
    }

    #[test]
    fn test_role_rejects_capitalized() {
        let result: Result<Role, _> = serde_json::from_str("\"Guesser\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_role_other_is_involution() {
        assert_eq!(Role::Guesser.other(), Role::Explainer);
        assert_eq!(Role::Explainer.other().other(), Role::Explainer);
    }

    #[test]
    fn test_difficulty_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Standard).unwrap(),
            "\"standard\""
        );
        assert_eq!(
            serde_json::to_string(&Difficulty::Custom).unwrap(),
            "\"custom\""
        );
    }

    #[test]
    fn test_explainer_answer_round_trip() {
        for answer in [
            ExplainerAnswer::Yes,
            ExplainerAnswer::No,
            ExplainerAnswer::Maybe,
            ExplainerAnswer::Idk,
        ] {
            let json = serde_json::to_string(&answer).unwrap();
            assert_eq!(json, format!("\"{}\"", answer.as_str()));
            let back: ExplainerAnswer = serde_json::from_str(&json).unwrap();
            assert_eq!(back, answer);
        }
    }

    #[test]
    fn test_explainer_answer_rejects_unknown_value() {
        let result: Result<ExplainerAnswer, _> =
            serde_json::from_str("\"probably\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_player_entry_unassigned_role_is_null() {
        let entry = PlayerEntry {
            name: "Ana".into(),
            ingame: false,
            role: None,
        };
        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["ingame"], false);
        assert!(json["role"].is_null());
    }
}

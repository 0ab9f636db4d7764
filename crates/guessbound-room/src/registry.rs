//! Room registry: owns the code → room map and the connection index.
//!
//! This is the single synchronization point of the server: every
//! mutation — inbound events, countdown ticks, sweeper passes — goes
//! through one `Arc<Mutex<RoomRegistry>>`, so no two operations on the
//! same room ever interleave.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use guessbound_protocol::ConnectionId;
use rand::Rng;
use tokio::sync::Mutex;

use crate::room::{Disposition, OutboundSender, Room};
use crate::{GameConfig, GameError};

/// Length of generated room codes.
const GENERATED_CODE_LEN: usize = 4;

/// Alphabet for generated codes: base-36, uppercase.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The registry handle shared between the gateway, timers, and sweeper.
pub type SharedRegistry = Arc<Mutex<RoomRegistry>>;

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// A validated, normalized (uppercase) room code.
///
/// Codes are compared case-insensitively by construction: parsing
/// uppercases, so `"ab12"` and `"AB12"` are the same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Validates a caller-supplied code: non-empty ASCII alphanumerics,
    /// normalized to uppercase.
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GameError::InvalidCode);
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    /// Generates a random 4-character code (collision checking is the
    /// registry's job).
    fn generate(rng: &mut impl Rng) -> Self {
        let code = (0..GENERATED_CODE_LEN)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// RoomRegistry
// ---------------------------------------------------------------------------

/// Owns all live rooms and tracks which connection is in which room.
pub struct RoomRegistry {
    config: GameConfig,
    rooms: HashMap<RoomCode, Room>,
    /// Connection → room code. A connection is in at most ONE room at a
    /// time (key invariant), and this makes `find by connection` O(1).
    by_connection: HashMap<ConnectionId, RoomCode>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            by_connection: HashMap::new(),
        }
    }

    /// Wraps the registry in the shared mutex handle.
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Creates a room, with a caller-chosen code or a generated one.
    pub fn create_room(
        &mut self,
        requested: Option<&str>,
    ) -> Result<RoomCode, GameError> {
        let code = match requested {
            Some(raw) => {
                let code = RoomCode::parse(raw)?;
                if self.rooms.contains_key(&code) {
                    return Err(GameError::CodeTaken);
                }
                code
            }
            None => {
                let mut rng = rand::rng();
                loop {
                    let code = RoomCode::generate(&mut rng);
                    if !self.rooms.contains_key(&code) {
                        break code;
                    }
                }
            }
        };

        self.rooms
            .insert(code.clone(), Room::new(code.clone(), self.config.clone()));
        tracing::info!(room = %code, rooms = self.rooms.len(), "room created");
        Ok(code)
    }

    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// The room a connection currently belongs to.
    pub fn code_for(&self, conn: ConnectionId) -> Option<&RoomCode> {
        self.by_connection.get(&conn)
    }

    /// Mutable access to a connection's current room.
    pub fn room_of_mut(&mut self, conn: ConnectionId) -> Option<&mut Room> {
        let code = self.by_connection.get(&conn)?.clone();
        self.rooms.get_mut(&code)
    }

    /// Adds a connection to a room by code, keeping the index in sync.
    pub fn join(
        &mut self,
        code: &RoomCode,
        conn: ConnectionId,
        name: &str,
        sender: OutboundSender,
    ) -> Result<(), GameError> {
        if self.by_connection.contains_key(&conn) {
            return Err(GameError::AlreadyJoined);
        }
        let room = self.rooms.get_mut(code).ok_or(GameError::RoomNotFound)?;
        room.join(conn, name, sender)?;
        self.by_connection.insert(conn, code.clone());
        Ok(())
    }

    /// Removes a connection from its current room (explicit leave or
    /// disconnect), applying the room's disposition. Returns the room
    /// code that was affected, if any.
    pub fn leave(&mut self, conn: ConnectionId) -> Option<RoomCode> {
        let code = self.by_connection.remove(&conn)?;
        let room = self.rooms.get_mut(&code)?;
        if room.leave(conn) == Some(Disposition::RemoveNow) {
            self.remove(&code);
        }
        Some(code)
    }

    /// Deletes a room and its index rows. Idempotent: removing an
    /// already-removed code is a no-op.
    pub fn remove(&mut self, code: &RoomCode) {
        if let Some(mut room) = self.rooms.remove(code) {
            // A stale countdown must never outlive its room.
            room.cancel_timer();
            self.by_connection.retain(|_, c| c != code);
            tracing::info!(room = %code, rooms = self.rooms.len(), "room removed");
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// All live rooms, for the presence sweeper.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }
}

/// Removes a room after a delay — the post-resolution grace period that
/// lets clients render the final message before teardown. Harmless if
/// the room is already gone by then.
pub fn schedule_removal(registry: SharedRegistry, code: RoomCode, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        registry.lock().await.remove(&code);
    });
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use guessbound_protocol::ServerEvent;
    use tokio::sync::mpsc;

    fn conn(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    fn sender() -> OutboundSender {
        mpsc::unbounded_channel::<ServerEvent>().0
    }

    fn registry() -> RoomRegistry {
        RoomRegistry::new(GameConfig::default())
    }

    // =====================================================================
    // Codes
    // =====================================================================

    #[test]
    fn test_parse_normalizes_to_uppercase() {
        assert_eq!(RoomCode::parse("ab12").unwrap().as_str(), "AB12");
    }

    #[test]
    fn test_parse_rejects_bad_charset() {
        assert_eq!(RoomCode::parse(""), Err(GameError::InvalidCode));
        assert_eq!(RoomCode::parse("AB 12"), Err(GameError::InvalidCode));
        assert_eq!(RoomCode::parse("AB-12"), Err(GameError::InvalidCode));
        assert_eq!(RoomCode::parse("ÜBER"), Err(GameError::InvalidCode));
    }

    #[test]
    fn test_generated_codes_have_expected_shape() {
        let mut reg = registry();
        for _ in 0..50 {
            let code = reg.create_room(None).unwrap();
            assert_eq!(code.as_str().len(), 4);
            assert!(
                code.as_str()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
        // All 50 are live simultaneously, so all 50 are distinct.
        assert_eq!(reg.room_count(), 50);
    }

    // =====================================================================
    // Creation
    // =====================================================================

    #[test]
    fn test_custom_code_collision_is_case_insensitive() {
        let mut reg = registry();
        reg.create_room(Some("ab")).unwrap();
        assert_eq!(reg.create_room(Some("AB")), Err(GameError::CodeTaken));
    }

    #[test]
    fn test_create_room_rejects_invalid_custom_code() {
        let mut reg = registry();
        assert_eq!(reg.create_room(Some("no spaces")), Err(GameError::InvalidCode));
        assert_eq!(reg.room_count(), 0);
    }

    // =====================================================================
    // Membership index
    // =====================================================================

    #[test]
    fn test_join_indexes_the_connection() {
        let mut reg = registry();
        let code = reg.create_room(Some("AB12")).unwrap();
        reg.join(&code, conn(1), "Ana", sender()).unwrap();
        assert_eq!(reg.code_for(conn(1)), Some(&code));
        assert!(reg.room_of_mut(conn(1)).is_some());
    }

    #[test]
    fn test_join_while_in_another_room_fails() {
        let mut reg = registry();
        let first = reg.create_room(Some("AAAA")).unwrap();
        let second = reg.create_room(Some("BBBB")).unwrap();
        reg.join(&first, conn(1), "Ana", sender()).unwrap();
        assert_eq!(
            reg.join(&second, conn(1), "Ana", sender()),
            Err(GameError::AlreadyJoined)
        );
    }

    #[test]
    fn test_join_unknown_code_fails() {
        let mut reg = registry();
        let code = RoomCode::parse("ZZZZ").unwrap();
        assert_eq!(
            reg.join(&code, conn(1), "Ana", sender()),
            Err(GameError::RoomNotFound)
        );
    }

    #[test]
    fn test_leave_of_last_player_removes_the_room() {
        let mut reg = registry();
        let code = reg.create_room(Some("AB12")).unwrap();
        reg.join(&code, conn(1), "Ana", sender()).unwrap();

        assert_eq!(reg.leave(conn(1)), Some(code.clone()));
        assert_eq!(reg.room_count(), 0);
        assert_eq!(reg.code_for(conn(1)), None);
        // And the code is free for reuse.
        assert!(reg.create_room(Some("AB12")).is_ok());
    }

    #[test]
    fn test_leave_of_unknown_connection_is_none() {
        let mut reg = registry();
        assert_eq!(reg.leave(conn(42)), None);
    }

    #[test]
    fn test_remove_is_idempotent_and_clears_index() {
        let mut reg = registry();
        let code = reg.create_room(Some("AB12")).unwrap();
        reg.join(&code, conn(1), "Ana", sender()).unwrap();

        reg.remove(&code);
        assert_eq!(reg.room_count(), 0);
        assert_eq!(reg.code_for(conn(1)), None);
        reg.remove(&code); // no-op
    }
}

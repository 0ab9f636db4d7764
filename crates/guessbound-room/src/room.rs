//! The room state machine.
//!
//! A [`Room`] owns everything scoped to one play session: the player
//! list, role assignments, the secret word and its revealed positions,
//! the chat log, the countdown handle, and the per-connection outbound
//! channels (the room-scoped pub/sub group). Every operation validates
//! the caller's identity and the current phase *before* mutating, so an
//! invalid request is always a complete no-op.
//!
//! Two kinds of rejection exist, on purpose:
//!
//! - validation failures the client should see return
//!   `Err(GameError)` (name taken, room full, bad word …);
//! - unauthorized or out-of-phase actions return `None` and emit
//!   nothing — the permissive-silence policy: a control that should not
//!   have been offered gets no feedback when forged.
//!
//! The room never locks anything; callers serialize access through the
//! registry mutex, which is what makes each operation atomic per room.

use std::collections::HashMap;

use guessbound_protocol::{
    ConnectionId, Difficulty, ExplainerAnswer, PlayerEntry, Role, ServerEvent,
};
use guessbound_words::{WordSource, blanks};
use rand::Rng;
use tokio::sync::mpsc;

use crate::registry::RoomCode;
use crate::timer::RoundTimer;
use crate::{GameConfig, GameError};

/// Hard cap on players per room.
const MAX_PLAYERS: usize = 2;

/// Reason broadcast when a round loses a player.
const PLAYER_LOSS_REASON: &str = "Not enough players. Game aborted.";

/// Channel end the room uses to push events to one connection.
pub type OutboundSender = mpsc::UnboundedSender<ServerEvent>;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a room.
///
/// ```text
/// Lobby → AwaitingWord → InRound → Ended
/// ```
///
/// `Ended` is terminal; the room is removed from the registry shortly
/// after (immediately on timeout/abort, after a short grace on win and
/// give-up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Players gathering, roles being assigned.
    Lobby,
    /// Round started; the explainer is choosing a word.
    AwaitingWord,
    /// Active guessing with the countdown running.
    InRound,
    /// Resolved (win, timeout, or abort).
    Ended,
}

impl Phase {
    /// `true` from round start until resolution — the window in which
    /// dropping below two players aborts the game.
    pub fn round_in_progress(self) -> bool {
        matches!(self, Phase::AwaitingWord | Phase::InRound)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Lobby => write!(f, "lobby"),
            Phase::AwaitingWord => write!(f, "awaiting-word"),
            Phase::InRound => write!(f, "in-round"),
            Phase::Ended => write!(f, "ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// One player, scoped to one room.
#[derive(Debug, Clone)]
pub struct Player {
    /// The connection that is this player.
    pub conn: ConnectionId,
    /// Display name, unique within the room.
    pub name: String,
    /// Set once a round has started for this player.
    pub ingame: bool,
}

/// One chat log line.
#[derive(Debug, Clone)]
pub struct ChatLine {
    pub from: String,
    pub text: String,
}

/// What the caller must do with the room after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Nothing; the room lives on.
    Keep,
    /// Remove from the registry now (empty room, timeout, player loss).
    RemoveNow,
    /// Remove after the configured grace delay (win, give-up), so
    /// clients can render the final message first.
    RemoveAfterGrace,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Running,
    Expired,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// One play session. See the module docs for the operation contract.
pub struct Room {
    code: RoomCode,
    config: GameConfig,
    phase: Phase,
    players: Vec<Player>,
    host: Option<ConnectionId>,
    guesser: Option<ConnectionId>,
    explainer: Option<ConnectionId>,
    secret_word: Option<String>,
    difficulty: Option<Difficulty>,
    /// Revealed character positions, in reveal order.
    revealed: Vec<usize>,
    hint_used: bool,
    remaining_seconds: u64,
    chat: Vec<ChatLine>,
    timer: Option<RoundTimer>,
    senders: HashMap<ConnectionId, OutboundSender>,
}

impl Room {
    /// Creates an empty lobby. The first player to join becomes host.
    pub fn new(code: RoomCode, config: GameConfig) -> Self {
        Self {
            code,
            config,
            phase: Phase::Lobby,
            players: Vec::new(),
            host: None,
            guesser: None,
            explainer: None,
            secret_word: None,
            difficulty: None,
            revealed: Vec::new(),
            hint_used: false,
            remaining_seconds: 0,
            chat: Vec::new(),
            timer: None,
            senders: HashMap::new(),
        }
    }

    // -- accessors ---------------------------------------------------------

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn host(&self) -> Option<ConnectionId> {
        self.host
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// The chat log, in send order (player lines and explainer answers).
    pub fn chat(&self) -> &[ChatLine] {
        &self.chat
    }

    /// The assigned role of a connection, if any.
    pub fn role_of(&self, conn: ConnectionId) -> Option<Role> {
        if self.guesser == Some(conn) {
            Some(Role::Guesser)
        } else if self.explainer == Some(conn) {
            Some(Role::Explainer)
        } else {
            None
        }
    }

    fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    fn name_of(&self, conn: ConnectionId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.conn == conn)
            .map(|p| p.name.as_str())
    }

    // -- membership --------------------------------------------------------

    /// Adds a player. The first joiner becomes host.
    pub fn join(
        &mut self,
        conn: ConnectionId,
        name: &str,
        sender: OutboundSender,
    ) -> Result<(), GameError> {
        if self.players.iter().any(|p| p.conn == conn) {
            return Err(GameError::AlreadyJoined);
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(GameError::NameTaken);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }

        self.players.push(Player {
            conn,
            name: name.to_owned(),
            ingame: false,
        });
        self.senders.insert(conn, sender);
        if self.host.is_none() {
            self.host = Some(conn);
        }

        tracing::info!(
            room = %self.code,
            player = name,
            players = self.players.len(),
            "player joined"
        );
        self.broadcast_player_list();
        Ok(())
    }

    /// Removes a player (explicit leave or disconnect).
    ///
    /// Handles host migration, aborts an in-progress round that drops
    /// below two players, and tells the caller whether the room should
    /// be removed. Returns `None` if the connection was not a member.
    pub fn leave(&mut self, conn: ConnectionId) -> Option<Disposition> {
        let index = self.players.iter().position(|p| p.conn == conn)?;
        let departed = self.players.remove(index);
        self.senders.remove(&conn);
        if self.guesser == Some(conn) {
            self.guesser = None;
        }
        if self.explainer == Some(conn) {
            self.explainer = None;
        }

        if self.host == Some(conn) {
            // Prefer a player still in the lobby; otherwise the oldest
            // remaining member.
            self.host = self
                .players
                .iter()
                .find(|p| !p.ingame)
                .or_else(|| self.players.first())
                .map(|p| p.conn);
        }

        tracing::info!(
            room = %self.code,
            player = %departed.name,
            remaining = self.players.len(),
            "player left"
        );
        self.broadcast_player_list();

        if self.players.is_empty() {
            return Some(Disposition::RemoveNow);
        }

        if self.phase.round_in_progress() && self.players.len() < MAX_PLAYERS {
            self.cancel_timer();
            self.phase = Phase::Ended;
            self.broadcast(ServerEvent::GameAborted {
                by: None,
                reason: PLAYER_LOSS_REASON.to_owned(),
                word: self.secret_word.clone(),
                difficulty: self.difficulty,
            });
            tracing::info!(room = %self.code, "round aborted, player lost");
            return Some(Disposition::RemoveNow);
        }

        Some(Disposition::Keep)
    }

    // -- roles and round start --------------------------------------------

    /// Host assigns `role` to the player named `target_name`.
    ///
    /// Silent unless the actor is the host and the target exists.
    /// Assigning a role clears the target's opposite role; once two
    /// players are present, the other player auto-fills any unassigned
    /// role, so a started 2-player room always has exactly one guesser
    /// and one explainer.
    pub fn assign_role(
        &mut self,
        actor: ConnectionId,
        target_name: &str,
        role: Role,
    ) -> Option<()> {
        if self.host != Some(actor) {
            return None;
        }
        let target = self.player_by_name(target_name)?.conn;

        match role {
            Role::Guesser => {
                self.guesser = Some(target);
                if self.explainer == Some(target) {
                    self.explainer = None;
                }
            }
            Role::Explainer => {
                self.explainer = Some(target);
                if self.guesser == Some(target) {
                    self.guesser = None;
                }
            }
        }

        if self.players.len() == MAX_PLAYERS {
            if let Some(other) =
                self.players.iter().map(|p| p.conn).find(|c| *c != target)
            {
                if self.guesser.is_none() {
                    self.guesser = Some(other);
                }
                if self.explainer.is_none() {
                    self.explainer = Some(other);
                }
            }
        }

        self.broadcast_player_list();
        Some(())
    }

    /// Host starts the round.
    ///
    /// Silent unless called by the host, in the lobby, with exactly two
    /// players. With players but no complete role assignment, the host
    /// gets an `errorMessage` unicast and nothing changes.
    pub fn start(&mut self, actor: ConnectionId) {
        if self.host != Some(actor)
            || self.phase != Phase::Lobby
            || self.players.len() != MAX_PLAYERS
        {
            return;
        }
        let (Some(guesser), Some(explainer)) = (self.guesser, self.explainer)
        else {
            self.send_to(
                actor,
                ServerEvent::ErrorMessage {
                    message: GameError::RolesMissing.to_string(),
                },
            );
            return;
        };

        for player in &mut self.players {
            player.ingame = true;
        }
        self.phase = Phase::AwaitingWord;

        self.send_to(guesser, ServerEvent::RoundPreparing { role: Role::Guesser });
        self.send_to(
            explainer,
            ServerEvent::RoundPreparing { role: Role::Explainer },
        );
        self.send_to(explainer, ServerEvent::ChooseWordMethod);
        self.send_to(guesser, ServerEvent::WaitingForWord);
        self.broadcast_player_list();
        tracing::info!(room = %self.code, "awaiting word from explainer");
    }

    // -- word selection ----------------------------------------------------

    /// Explainer supplies their own word. `Ok(None)` means the call was
    /// silently ignored (wrong role or phase).
    pub fn choose_custom_word(
        &mut self,
        actor: ConnectionId,
        raw: &str,
    ) -> Result<Option<Difficulty>, GameError> {
        if self.explainer != Some(actor) || self.phase != Phase::AwaitingWord {
            return Ok(None);
        }
        let word = raw.trim();
        if word.is_empty() {
            return Err(GameError::EmptyWord);
        }
        if !word
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '-')
        {
            return Err(GameError::InvalidCharacters);
        }

        self.set_word_and_start(actor, word.to_owned(), Difficulty::Custom);
        Ok(Some(Difficulty::Custom))
    }

    /// Explainer asks for a word from the weighted pools. `Ok(None)`
    /// means the call was silently ignored (wrong role or phase).
    pub fn choose_random_word(
        &mut self,
        actor: ConnectionId,
        words: &WordSource,
    ) -> Result<Option<Difficulty>, GameError> {
        if self.explainer != Some(actor) || self.phase != Phase::AwaitingWord {
            return Ok(None);
        }
        let (word, difficulty) = words
            .draw(&mut rand::rng())
            .ok_or(GameError::NoWordsAvailable)?;

        self.set_word_and_start(actor, word, difficulty);
        Ok(Some(difficulty))
    }

    fn set_word_and_start(
        &mut self,
        actor: ConnectionId,
        word: String,
        difficulty: Difficulty,
    ) {
        let rendered = blanks::render(&word, &[]);
        let by = self.name_of(actor).unwrap_or_default().to_owned();
        self.secret_word = Some(word);
        self.difficulty = Some(difficulty);
        self.revealed.clear();
        self.hint_used = false;

        self.broadcast(ServerEvent::WordChosen {
            by,
            blanks: rendered,
            difficulty,
        });
        self.start_round();
    }

    /// Transitions to the active round and sends the role-scoped start
    /// payloads. The caller arms the countdown afterwards via
    /// [`RoundTimer::spawn`](crate::RoundTimer::spawn) + [`set_timer`](Self::set_timer) —
    /// the tick task needs the shared registry handle, which the room
    /// itself does not hold.
    fn start_round(&mut self) {
        let (Some(word), Some(difficulty)) =
            (self.secret_word.clone(), self.difficulty)
        else {
            return; // word selection always precedes the round
        };

        self.phase = Phase::InRound;
        self.remaining_seconds = self.config.round_seconds;
        let rendered = blanks::render(&word, &self.revealed);

        for player in self.players.clone() {
            if !player.ingame {
                continue;
            }
            let role = if self.guesser == Some(player.conn) {
                Role::Guesser
            } else {
                Role::Explainer
            };
            // Only the explainer's payload carries the plaintext word.
            let word_for_role = (role == Role::Explainer).then(|| word.clone());
            self.send_to(
                player.conn,
                ServerEvent::GameStarted {
                    role,
                    blanks: rendered.clone(),
                    seconds_left: self.remaining_seconds,
                    difficulty,
                    word: word_for_role,
                },
            );
        }

        self.broadcast(ServerEvent::BlanksUpdate { blanks: rendered });
        self.broadcast_player_list();
        tracing::info!(room = %self.code, %difficulty, "round started");
    }

    // -- in-round actions --------------------------------------------------

    /// Explainer reveals one random unrevealed letter. At most one hint
    /// per round; every other case is a silent no-op.
    pub fn give_hint(&mut self, actor: ConnectionId) -> Option<()> {
        if self.explainer != Some(actor) || self.hint_used {
            return None;
        }
        let word = self.secret_word.clone()?;
        let open = blanks::hidden_letter_positions(&word, &self.revealed);
        if open.is_empty() {
            return None;
        }

        let index = open[rand::rng().random_range(0..open.len())];
        let letter = word.chars().nth(index)?;
        self.revealed.push(index);
        self.hint_used = true;

        self.broadcast(ServerEvent::HintGiven {
            blanks: self.current_blanks(),
            index,
            letter,
        });
        Some(())
    }

    /// Any participant adds time to a running round. Returns the new
    /// remaining seconds, or `None` (silently) when no round is active.
    pub fn extend_time(&mut self, _actor: ConnectionId) -> Option<u64> {
        if self.phase != Phase::InRound {
            return None;
        }
        self.remaining_seconds += self.config.extend_seconds;
        self.broadcast(ServerEvent::TimerUpdate {
            seconds: self.remaining_seconds,
        });
        Some(self.remaining_seconds)
    }

    /// Appends a chat line and broadcasts it. A guesser's message during
    /// an active round is compared (trimmed, case-insensitively) against
    /// the secret word; an exact match resolves the round as a win.
    pub fn submit_chat(
        &mut self,
        conn: ConnectionId,
        text: &str,
    ) -> Option<Disposition> {
        let from = self.name_of(conn)?.to_owned();
        self.chat.push(ChatLine {
            from: from.clone(),
            text: text.to_owned(),
        });
        self.broadcast(ServerEvent::ChatMessage {
            from: from.clone(),
            text: text.to_owned(),
        });

        let guessed = self.guesser == Some(conn)
            && self.phase == Phase::InRound
            && self
                .secret_word
                .as_deref()
                .is_some_and(|w| w.trim().to_lowercase() == text.trim().to_lowercase());

        if guessed {
            // Cancel before broadcasting the result so no stale tick can
            // follow the resolution.
            self.cancel_timer();
            self.phase = Phase::Ended;
            if let (Some(word), Some(difficulty)) =
                (self.secret_word.clone(), self.difficulty)
            {
                self.broadcast(ServerEvent::GameWon {
                    winner: from.clone(),
                    word,
                    difficulty,
                });
            }
            tracing::info!(room = %self.code, winner = %from, "word guessed");
            return Some(Disposition::RemoveAfterGrace);
        }

        Some(Disposition::Keep)
    }

    /// Explainer answers the latest guess; the answer lands in chat as a
    /// line from the explainer. No other state effect.
    pub fn explainer_answer(
        &mut self,
        actor: ConnectionId,
        answer: ExplainerAnswer,
    ) -> Option<()> {
        if self.explainer != Some(actor) {
            return None;
        }
        let from = self.name_of(actor)?.to_owned();
        self.chat.push(ChatLine {
            from: from.clone(),
            text: answer.as_str().to_owned(),
        });
        self.broadcast(ServerEvent::ChatMessage {
            from,
            text: answer.as_str().to_owned(),
        });
        Some(())
    }

    /// Any participant aborts the round, revealing the word.
    pub fn give_up(
        &mut self,
        actor: ConnectionId,
        reason: &str,
    ) -> Option<Disposition> {
        let by = self.name_of(actor)?.to_owned();
        self.cancel_timer();
        self.phase = Phase::Ended;
        self.broadcast(ServerEvent::GameAborted {
            by: Some(by),
            reason: reason.to_owned(),
            word: self.secret_word.clone(),
            difficulty: self.difficulty,
        });
        tracing::info!(room = %self.code, reason, "round given up");
        Some(Disposition::RemoveAfterGrace)
    }

    // -- countdown ---------------------------------------------------------

    /// One countdown tick: decrements and broadcasts the remaining time.
    pub fn tick_second(&mut self) -> CountdownStep {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.broadcast(ServerEvent::TimerUpdate {
            seconds: self.remaining_seconds,
        });
        if self.remaining_seconds == 0 {
            CountdownStep::Expired
        } else {
            CountdownStep::Running
        }
    }

    /// Resolves the round as a timeout, revealing the word.
    pub fn finish_timeout(&mut self) {
        self.cancel_timer();
        self.phase = Phase::Ended;
        if let (Some(word), Some(difficulty)) =
            (self.secret_word.clone(), self.difficulty)
        {
            self.broadcast(ServerEvent::TimeUp { word, difficulty });
        }
        tracing::info!(room = %self.code, "round timed out");
    }

    /// Hands the room its armed countdown handle.
    pub fn set_timer(&mut self, timer: RoundTimer) {
        self.timer = Some(timer);
    }

    /// The single cancellation point, reached from every terminal
    /// transition (win, timeout, abort, player loss). Idempotent.
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    // -- outbound ----------------------------------------------------------

    /// Rebroadcasts the roster; also called by the presence sweeper.
    pub fn broadcast_player_list(&self) {
        let players = self
            .players
            .iter()
            .map(|p| PlayerEntry {
                name: p.name.clone(),
                ingame: p.ingame,
                role: self.role_of(p.conn),
            })
            .collect();
        let host_name = self
            .host
            .and_then(|h| self.name_of(h))
            .map(str::to_owned);
        self.broadcast(ServerEvent::PlayerList { players, host_name });
    }

    fn current_blanks(&self) -> String {
        blanks::render(self.secret_word.as_deref().unwrap_or_default(), &self.revealed)
    }

    /// Sends to every member. Closed receivers are silently skipped;
    /// disconnect cleanup removes them shortly after.
    fn broadcast(&self, event: ServerEvent) {
        for sender in self.senders.values() {
            let _ = sender.send(event.clone());
        }
    }

    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(event);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

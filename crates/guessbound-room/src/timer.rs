//! The per-round countdown task.
//!
//! A round's timer is an explicit, cancellable Tokio task — not a
//! side-effect of some other loop — with a single cancellation point
//! ([`Room::cancel_timer`](crate::Room::cancel_timer)) reachable from
//! every terminal transition. Each tick re-acquires the registry lock
//! and re-checks the room's phase, so a tick that lost the race to a
//! win, abort, or disconnect is a no-op instead of a stale broadcast.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::registry::{RoomCode, SharedRegistry};
use crate::room::{CountdownStep, Phase};

/// Handle to a running countdown. Aborting is the only interaction;
/// dropping the handle aborts too, so a timer can never outlive the
/// room that owns it.
pub struct RoundTimer {
    handle: JoinHandle<()>,
}

impl RoundTimer {
    /// Spawns the 1 Hz countdown for `code`.
    ///
    /// Each tick locks the registry, decrements the room's clock, and
    /// broadcasts `timerUpdate`. On expiry it resolves the round as a
    /// timeout and removes the room immediately. The task exits on its
    /// own when the room is gone or no longer in a round.
    pub fn spawn(registry: SharedRegistry, code: RoomCode) -> Self {
        let handle = tokio::spawn(async move {
            let second = Duration::from_secs(1);
            let mut interval = time::interval_at(Instant::now() + second, second);
            // A delayed tick must not burst-decrement the clock.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                let mut reg = registry.lock().await;
                let Some(room) = reg.room_mut(&code) else {
                    break;
                };
                if room.phase() != Phase::InRound {
                    // Resolved between ticks; nothing left to count.
                    break;
                }

                match room.tick_second() {
                    CountdownStep::Running => {}
                    CountdownStep::Expired => {
                        room.finish_timeout();
                        reg.remove(&code);
                        break;
                    }
                }
            }
        });

        Self { handle }
    }

    /// Cancels the countdown.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//! The presence sweeper.
//!
//! Every sweep interval (3 s by default), every live room rebroadcasts
//! its player list. This is a resynchronization mechanism independent of
//! the event-driven updates: a client that missed a `playerList` (or got
//! one out of order on a flaky link) converges within one sweep.

use guessbound_room::SharedRegistry;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Spawns the sweep loop. Runs for the life of the server.
pub(crate) fn spawn(registry: SharedRegistry) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = registry.lock().await.config().sweep_interval;
        let mut interval = time::interval_at(Instant::now() + period, period);

        loop {
            interval.tick().await;
            let reg = registry.lock().await;
            for room in reg.rooms() {
                room.broadcast_player_list();
            }
        }
    })
}

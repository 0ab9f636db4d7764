//! Game configuration.

use std::time::Duration;

/// Tunable timings for rooms.
///
/// Production uses the defaults; tests shrink the round to seconds so
/// timeout paths can be exercised without waiting five minutes.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Initial round length in seconds.
    pub round_seconds: u64,

    /// How many seconds `extendTime` adds to a running round.
    pub extend_seconds: u64,

    /// How long a resolved room (win / give-up) lingers before removal,
    /// so clients can render the final message before teardown.
    pub removal_grace: Duration,

    /// How often the presence sweeper rebroadcasts player lists.
    pub sweep_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: 300,
            extend_seconds: 300,
            removal_grace: Duration::from_secs(2),
            sweep_interval: Duration::from_secs(3),
        }
    }
}

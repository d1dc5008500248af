//! Time and cadence configuration for the game session

use std::time::Duration;

/// Frame rate of the simulation loop
pub const FRAME_TPS: u32 = 60; // 60 frames per second

/// Duration of one simulation frame
pub fn frame_interval() -> Duration {
    Duration::from_micros(1_000_000 / FRAME_TPS as u64)
}

/// How often the room status and roster are polled
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How often a new asteroid is spawned while the session is active
pub const SPAWN_INTERVAL: Duration = Duration::from_secs(3);

/// Cadence of the session and ship-disable countdowns
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_interval_matches_tps() {
        assert_eq!(frame_interval(), Duration::from_micros(1_000_000 / FRAME_TPS as u64));
    }
}

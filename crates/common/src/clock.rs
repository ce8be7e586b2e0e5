//! Session clock.
//!
//! A capture session is anchored to a monotonic instant taken when the
//! start trigger fires, plus the matching wall-clock time for log output.

use std::time::Instant;

/// Monotonic clock anchored to the start of a capture session.
#[derive(Debug, Clone)]
pub struct SessionClock {
    epoch: Instant,
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since the session started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start (RFC 3339).
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        assert!(clock.elapsed_secs() < 1.0);
    }

    #[test]
    fn test_epoch_wall_is_rfc3339() {
        let clock = SessionClock::start();
        assert!(chrono::DateTime::parse_from_rfc3339(clock.epoch_wall()).is_ok());
    }
}

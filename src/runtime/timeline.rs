//! Run-relative clock and the suspension points built on it

use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Clock anchored at the start of a run
#[derive(Debug, Clone, Copy)]
pub struct Timeline {
    origin: Instant,
}

impl Timeline {
    /// Start a timeline at the current instant
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Time elapsed since the timeline started
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Suspend for `ms` milliseconds. Negative values are treated as zero.
    pub async fn pause(&self, ms: i64) {
        sleep(millis(ms)).await;
    }
}

/// Convert a possibly negative millisecond count to a duration, clamping at zero
pub fn millis(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_millis_clamp_to_zero() {
        assert_eq!(millis(-5), Duration::ZERO);
        assert_eq!(millis(250), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_advances_elapsed() {
        let timeline = Timeline::start();
        timeline.pause(1500).await;
        assert_eq!(timeline.elapsed(), Duration::from_millis(1500));
    }
}

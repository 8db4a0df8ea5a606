use crate::scrapers::types::ScrollPolicy;
use anyhow::Result;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Tracks whether a size signal has stopped changing.
///
/// The signal starts at zero. Each reading equal to the previous one counts as
/// an idle round; any change resets the count.
#[derive(Debug, Clone)]
pub struct IdleDetector {
    threshold: u32,
    last: u64,
    idle: u32,
}

impl IdleDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            last: 0,
            idle: 0,
        }
    }

    /// Record one reading and report whether the signal has settled
    pub fn observe(&mut self, reading: u64) -> bool {
        if reading == self.last {
            self.idle += 1;
        } else {
            self.idle = 0;
            self.last = reading;
        }
        self.is_settled()
    }

    pub fn is_settled(&self) -> bool {
        self.idle >= self.threshold
    }

    pub fn idle_rounds(&self) -> u32 {
        self.idle
    }

    pub fn last_reading(&self) -> u64 {
        self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSummary {
    pub rounds: u32,
    pub last_reading: u64,
    /// The policy's `max_rounds` stopped the loop before the signal settled
    pub capped: bool,
}

/// Drive a container to its end.
///
/// `round` measures the signal, scrolls once, and returns the measurement.
/// Rounds repeat, separated by the policy pause, until the idle threshold is
/// reached. Without `max_rounds` there is no upper bound.
pub fn scroll_until_stable<F>(policy: &ScrollPolicy, mut round: F) -> Result<ScrollSummary>
where
    F: FnMut() -> Result<u64>,
{
    let mut detector = IdleDetector::new(policy.idle_rounds);
    let mut rounds = 0;

    while !detector.is_settled() {
        if policy.max_rounds.is_some_and(|max| rounds >= max) {
            warn!(
                rounds,
                idle = detector.idle_rounds(),
                "Scroll round limit reached before content settled"
            );
            return Ok(ScrollSummary {
                rounds,
                last_reading: detector.last_reading(),
                capped: true,
            });
        }

        let reading = round()?;
        detector.observe(reading);
        rounds += 1;
        pause(policy.pause);
    }

    debug!(rounds, reading = detector.last_reading(), "Scrolling settled");
    Ok(ScrollSummary {
        rounds,
        last_reading: detector.last_reading(),
        capped: false,
    })
}

/// Fixed settle delay
pub fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(idle_rounds: u32, max_rounds: Option<u32>) -> ScrollPolicy {
        ScrollPolicy {
            idle_rounds,
            pause: Duration::ZERO,
            max_rounds,
        }
    }

    #[test]
    fn test_change_resets_idle_count_before_threshold() {
        let mut detector = IdleDetector::new(5);
        for reading in [3, 5, 5, 5, 5, 5] {
            assert!(!detector.observe(reading));
        }
        assert_eq!(detector.idle_rounds(), 4);

        assert!(!detector.observe(7));
        assert_eq!(detector.idle_rounds(), 0);
    }

    #[test]
    fn test_settles_after_threshold_unchanged_readings() {
        let mut detector = IdleDetector::new(5);
        let settled_at = [3, 5, 5, 5, 5, 5, 5]
            .iter()
            .position(|&r| detector.observe(r));
        assert_eq!(settled_at, Some(6));
    }

    #[test]
    fn test_scroll_stops_once_signal_settles() {
        let readings = [3, 5, 5, 5, 5, 5, 7];
        let mut calls = 0;
        let summary = scroll_until_stable(&policy(5, None), || {
            let reading = readings.get(calls).copied().unwrap_or(7);
            calls += 1;
            Ok(reading)
        })
        .unwrap();

        // seven scripted readings, then five unchanged readings of 7
        assert_eq!(calls, 12);
        assert_eq!(summary.rounds, 12);
        assert_eq!(summary.last_reading, 7);
        assert!(!summary.capped);
    }

    #[test]
    fn test_zero_signal_counts_as_idle_from_the_start() {
        let mut calls = 0;
        let summary = scroll_until_stable(&policy(8, None), || {
            calls += 1;
            Ok(0)
        })
        .unwrap();
        assert_eq!(summary.rounds, 8);
    }

    #[test]
    fn test_round_limit_is_opt_in() {
        let mut height = 0;
        let summary = scroll_until_stable(&policy(5, Some(20)), || {
            height += 100;
            Ok(height)
        })
        .unwrap();
        assert!(summary.capped);
        assert_eq!(summary.rounds, 20);
    }

    #[test]
    fn test_errors_propagate() {
        let result = scroll_until_stable(&policy(5, None), || anyhow::bail!("tab crashed"));
        assert!(result.is_err());
    }
}

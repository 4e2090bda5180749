//! Fixed-interval drive of the liquidation cycle.
//!
//! The interval is measured from the end of one pass to the start of the
//! next, so a slow pass can never overlap the following one. A failed
//! pass is logged and retried at the next interval; the process stays up,
//! with an alarm once the consecutive-failure streak reaches a bound.

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};

use crate::cycle::LiquidationCycle;

/// Consecutive pass-failure accounting with a bounded alarm.
#[derive(Debug)]
struct FailureStreak {
    count: u32,
    bound: u32,
}

impl FailureStreak {
    fn new(bound: u32) -> Self {
        Self { count: 0, bound }
    }

    fn record_success(&mut self) {
        self.count = 0;
    }

    /// Record a failure; returns true while the streak sits at or past
    /// the alarm bound.
    fn record_failure(&mut self) -> bool {
        self.count += 1;
        self.count >= self.bound
    }

    fn current(&self) -> u32 {
        self.count
    }
}

/// Drives the cycle forever at a fixed end-to-start interval.
pub struct Scheduler {
    cycle: LiquidationCycle,
    interval: Duration,
    max_failure_streak: u32,
}

impl Scheduler {
    /// Create a scheduler over a cycle.
    pub fn new(cycle: LiquidationCycle, interval: Duration, max_failure_streak: u32) -> Self {
        Self {
            cycle,
            interval,
            max_failure_streak,
        }
    }

    /// Run the scan loop; never returns under normal operation.
    ///
    /// Passes are strictly serialized: pass N+1 starts only after pass N
    /// has completed or failed, plus the configured interval.
    pub async fn run(mut self) -> Result<()> {
        info!(
            interval_secs = self.interval.as_secs(),
            max_failure_streak = self.max_failure_streak,
            "Scheduler started"
        );

        let mut streak = FailureStreak::new(self.max_failure_streak);

        loop {
            match self.cycle.run_once().await {
                Ok(_report) => {
                    streak.record_success();
                }
                Err(e) => {
                    let alarmed = streak.record_failure();
                    error!(
                        error = %e,
                        streak = streak.current(),
                        "Scan pass failed, retrying at next interval"
                    );
                    if alarmed {
                        error!(
                            consecutive_failures = streak.current(),
                            "Pass failure streak bound reached, check RPC endpoint and contract addresses"
                        );
                    }
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_streak_alarm_at_bound() {
        let mut streak = FailureStreak::new(3);

        assert!(!streak.record_failure());
        assert!(!streak.record_failure());
        assert!(streak.record_failure());
        // Stays alarmed while the streak continues
        assert!(streak.record_failure());
        assert_eq!(streak.current(), 4);
    }

    #[test]
    fn test_failure_streak_resets_on_success() {
        let mut streak = FailureStreak::new(2);

        assert!(!streak.record_failure());
        streak.record_success();
        assert_eq!(streak.current(), 0);
        assert!(!streak.record_failure());
        assert!(streak.record_failure());
    }
}

//! Virtual clock helpers shared by the integration tests.
//!
//! Tests run on tokio's current-thread runtime with the clock paused, so the
//! driver task and the test share one thread and time only moves when a test
//! advances it.

#![allow(dead_code)]

use std::time::Duration;

/// Route the crate's `log` output through the test harness. Set `RUST_LOG`
/// to see it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Let every ready task run until it parks on a timer again.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock one millisecond at a time, letting the driver
/// react at the exact instant each of its timers fires.
pub async fn advance_ms(ms: u64) {
    for _ in 0..ms {
        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
    }
}

/// Tracks total virtual time advanced since the driver started.
#[derive(Default)]
pub struct VirtualClock {
    elapsed_ms: u64,
}

impl VirtualClock {
    /// Advance until `target_ms` after start. Targets must be increasing.
    pub async fn advance_to(&mut self, target_ms: u64) {
        assert!(target_ms >= self.elapsed_ms, "clock cannot go backwards");
        advance_ms(target_ms - self.elapsed_ms).await;
        self.elapsed_ms = target_ms;
    }
}

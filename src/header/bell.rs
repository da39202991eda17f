//! Seam to the external bell sub-animation.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Plays the bell icon animation.
///
/// The driver calls [`play`](BellPlayer::play) exactly once per run, at the
/// moment `BellTriggered` flips to true. Playback is a single iteration and
/// its progress is never reported back. `play` is called from the driver's
/// task and must not block.
pub trait BellPlayer: Send + Sync {
    fn play(&self);
}

/// Bell player that only records and logs playback requests.
#[derive(Debug, Default)]
pub struct LogBellPlayer {
    plays: AtomicUsize,
}

impl LogBellPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times playback was requested.
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl BellPlayer for LogBellPlayer {
    fn play(&self) {
        let n = self.plays.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("bell animation started (play #{n}, 1 iteration)");
    }
}

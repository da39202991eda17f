// ============================================================================
// Cross-thread invalidation
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use super::runtime::{batch, is_batching, notify_signal_write, SignalId};

/// Work waiting for one home thread.
#[derive(Default)]
struct Pending {
    /// Signals written off the home thread, notified on the next flush.
    writes: Vec<SignalId>,
    frame_requested: bool,
}

impl Pending {
    fn push_write(&mut self, signal_id: SignalId) {
        if !self.writes.contains(&signal_id) {
            self.writes.push(signal_id);
        }
    }
}

/// Invalidations keyed by home thread. Each home thread drains only its own
/// entry, so concurrent hosts never consume each other's frames.
static PENDING: LazyLock<Mutex<HashMap<ThreadId, Pending>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

thread_local! {
    /// Background writes made inside a batch on this thread, published when
    /// the outermost batch closes.
    static STAGED: RefCell<Vec<(ThreadId, SignalId)>> = const { RefCell::new(Vec::new()) };
}

/// Record a write to a signal owned by another thread's runtime.
///
/// Inside a batch the write is staged, so a home thread never sees part of a
/// batch: every signal written in it becomes pending under a single lock.
pub(crate) fn queue_bg_write(home: ThreadId, signal_id: SignalId) {
    if is_batching() {
        let staged = STAGED.try_with(|staged| staged.borrow_mut().push((home, signal_id)));
        if staged.is_ok() {
            return;
        }
    }
    publish(std::iter::once((home, signal_id)));
}

/// Publish the writes staged by the batch that just closed on this thread.
pub(crate) fn publish_staged_bg_writes() {
    let staged = STAGED
        .try_with(|staged| std::mem::take(&mut *staged.borrow_mut()))
        .unwrap_or_default();
    if !staged.is_empty() {
        publish(staged);
    }
}

fn publish(writes: impl IntoIterator<Item = (ThreadId, SignalId)>) {
    let mut pending = PENDING.lock().unwrap_or_else(PoisonError::into_inner);
    for (home, signal_id) in writes {
        let entry = pending.entry(home).or_default();
        entry.push_write(signal_id);
        entry.frame_requested = true;
    }
}

/// Replay writes made by background tasks to signals owned by this thread.
///
/// Hosts call this once per frame before presenting. All queued writes are
/// notified inside one batch, so an effect depending on several of them runs
/// once and sees all new values together.
pub fn flush_bg_writes() -> usize {
    let home = thread::current().id();
    let pending = PENDING
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_mut(&home)
        .map(|entry| std::mem::take(&mut entry.writes))
        .unwrap_or_default();

    if pending.is_empty() {
        return 0;
    }

    log::trace!("flushing {} background signal writes", pending.len());
    batch(|| {
        for signal_id in &pending {
            notify_signal_write(*signal_id);
        }
    });
    pending.len()
}

/// Ask the host loop running on `home` to present a new frame
pub(crate) fn request_frame(home: ThreadId) {
    PENDING
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(home)
        .or_default()
        .frame_requested = true;
}

/// Check if a frame has been requested for the calling thread and clear the flag
pub fn take_frame_request() -> bool {
    let home = thread::current().id();
    PENDING
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_mut(&home)
        .is_some_and(|entry| std::mem::take(&mut entry.frame_requested))
}

pub(crate) fn reset_invalidation() {
    let home = thread::current().id();
    PENDING
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&home);
    let _ = STAGED.try_with(|staged| staged.borrow_mut().clear());
}

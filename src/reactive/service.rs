//! Background service system for owner-scoped async tasks.
//!
//! A service is a tokio task tied to the current owner: disposing the owner
//! stops the service. Stopping is strict. [`ServiceContext::run_if_active`]
//! and [`ServiceHandle::stop`] share a gate lock, so once `stop` returns no
//! guarded section can still be running and none will start afterwards. The
//! task is then aborted, which drops any timer it is waiting on.
//!
//! # Example
//!
//! ```ignore
//! let count = create_signal(0u32);
//! let count_w = count.writer();
//!
//! let service = create_service(move |ctx| async move {
//!     loop {
//!         tokio::time::sleep(Duration::from_secs(1)).await;
//!         if ctx.run_if_active(|| count_w.update(|c| *c += 1)).is_none() {
//!             break;
//!         }
//!     }
//! });
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::AbortHandle;

use super::on_cleanup;

struct Gate {
    running: Mutex<bool>,
}

impl Gate {
    fn new() -> Self {
        Self {
            running: Mutex::new(true),
        }
    }

    fn is_open(&self) -> bool {
        *self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Close the gate. Returns `true` if this call closed it.
    fn close(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *running, false)
    }
}

/// Context passed to the service function.
pub struct ServiceContext {
    gate: Arc<Gate>,
}

impl ServiceContext {
    /// Returns `true` while the service has not been stopped.
    pub fn is_running(&self) -> bool {
        self.gate.is_open()
    }

    /// Run `f` only if the service is still running.
    ///
    /// The gate stays locked while `f` runs, so [`ServiceHandle::stop`] waits
    /// for it. Keep `f` short and never await inside it.
    pub fn run_if_active<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let running = self.gate.running.lock().unwrap_or_else(PoisonError::into_inner);
        if !*running {
            return None;
        }
        let result = f();
        drop(running);
        Some(result)
    }
}

/// Handle to a background service.
///
/// Clone this handle to stop the service from several places.
#[derive(Clone)]
pub struct ServiceHandle {
    gate: Arc<Gate>,
    abort: AbortHandle,
}

impl ServiceHandle {
    /// Stop the service. Idempotent.
    ///
    /// Returns `true` if this call stopped a running service.
    pub fn stop(&self) -> bool {
        let stopped = self.gate.close();
        self.abort.abort();
        stopped
    }

    pub fn is_running(&self) -> bool {
        self.gate.is_open()
    }

    /// Run `f` while no [`ServiceContext::run_if_active`] section is running.
    ///
    /// Use it to read several values a guarded section writes together. `f`
    /// must not stop this service.
    pub fn exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        let _gate = self.gate.running.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Whether the task has returned or been aborted.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Create a background service tied to the current owner.
///
/// Must be called from within a tokio runtime context. When the owner is
/// disposed the service is stopped as if [`ServiceHandle::stop`] was called.
pub fn create_service<F, Fut>(f: F) -> ServiceHandle
where
    F: FnOnce(ServiceContext) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let gate = Arc::new(Gate::new());
    let ctx = ServiceContext { gate: gate.clone() };
    let task = tokio::spawn(f(ctx));

    let handle = ServiceHandle {
        gate,
        abort: task.abort_handle(),
    };

    let handle_for_cleanup = handle.clone();
    on_cleanup(move || {
        handle_for_cleanup.stop();
    });

    handle
}

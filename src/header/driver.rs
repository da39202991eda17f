//! The timed state machine behind the header.
//!
//! [`SequenceDriver`] owns two observable values, the current [`Phase`] and
//! the one-shot `BellTriggered` flag, and plays [`TIMELINE`] once as a tokio
//! task. Everything else in the header reads these values; nothing else
//! writes them.

use std::fmt;
use std::sync::Arc;

use crate::reactive::{
    batch, create_service, create_signal, on_cleanup, ReadSignal, ServiceContext, ServiceHandle,
    Signal, WriteSignal,
};

use super::bell::BellPlayer;
use super::phase::Phase;
use super::timeline::{Step, INITIAL_PHASE, TIMELINE};

/// Where a driver is in its single run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DriverStatus {
    /// Constructed, `start` not called yet.
    #[default]
    Idle,
    /// Timeline in progress.
    Running,
    /// Every step applied; the terminal state is held.
    Finished,
    /// Stopped before the last step.
    Cancelled,
}

impl DriverStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriverStatus::Finished | DriverStatus::Cancelled)
    }
}

/// Cancels a started driver. Cheap to clone; used by activation cleanups.
#[derive(Clone)]
pub struct CancelHandle {
    service: ServiceHandle,
    status: WriteSignal<DriverStatus>,
}

impl CancelHandle {
    /// Abandon every pending step. Idempotent and silent.
    ///
    /// When this returns no step is being applied and none will be. The
    /// pending timer is released with the task.
    pub fn cancel(&self) {
        let stopped = self.service.stop();
        let mut cancelled = false;
        self.status.update(|status| {
            if *status == DriverStatus::Running {
                *status = DriverStatus::Cancelled;
                cancelled = true;
            }
        });
        if stopped && cancelled {
            log::info!("header timeline cancelled");
        }
    }
}

/// Plays the header timeline once.
///
/// Create one driver per activation and call [`start`](Self::start) once.
/// Reads are available before, during and after the run from any thread.
pub struct SequenceDriver {
    phase: Signal<Phase>,
    bell_triggered: Signal<bool>,
    status: Signal<DriverStatus>,
    bell_player: Option<Arc<dyn BellPlayer>>,
    cancel: Option<CancelHandle>,
    starts: usize,
}

impl SequenceDriver {
    /// A driver at `LogoShown` with the bell untriggered.
    ///
    /// Create it on the thread that runs the presenters; effects reading its
    /// signals are notified there.
    pub fn new() -> Self {
        Self {
            phase: create_signal(INITIAL_PHASE),
            bell_triggered: create_signal(false),
            status: create_signal(DriverStatus::Idle),
            bell_player: None,
            cancel: None,
            starts: 0,
        }
    }

    /// Start `player` when the bell is triggered.
    pub fn with_bell_player(mut self, player: Arc<dyn BellPlayer>) -> Self {
        self.bell_player = Some(player);
        self
    }

    /// Begin the timeline from its first step.
    ///
    /// Precondition: called at most once per driver. The host lifecycle
    /// guarantees single invocation; this method does not guard against a
    /// second call. Must run inside a tokio runtime. If an owner is current,
    /// disposing it cancels the run.
    pub fn start(&mut self) {
        let phase = self.phase.writer();
        let bell_triggered = self.bell_triggered.writer();
        let status = self.status.writer();
        let bell_player = self.bell_player.clone();

        self.starts += 1;
        if self.starts > 1 {
            log::warn!("header timeline started {} times", self.starts);
        }
        self.status.set(DriverStatus::Running);
        log::info!(
            "header timeline started: {} steps over {:?}",
            TIMELINE.len(),
            super::timeline::total_duration()
        );

        let service = create_service(move |ctx| async move {
            let steps = Steps {
                ctx,
                phase,
                bell_triggered,
                bell_player,
            };
            if !steps.run().await {
                return;
            }
            let finished = batch(|| steps.ctx.run_if_active(|| status.set(DriverStatus::Finished)));
            if finished.is_some() {
                log::info!("header timeline finished");
            }
        });

        let handle = CancelHandle {
            service,
            status: self.status.writer(),
        };
        let for_cleanup = handle.clone();
        on_cleanup(move || for_cleanup.cancel());
        self.cancel = Some(handle);
    }

    /// Abandon the run. A no-op if never started, finished or already cancelled.
    pub fn cancel(&self) {
        if let Some(handle) = &self.cancel {
            handle.cancel();
        }
    }

    /// How many times [`start`](Self::start) has been called.
    pub fn start_count(&self) -> usize {
        self.starts
    }

    /// A handle that can cancel this run after the driver is moved.
    pub fn cancel_handle(&self) -> Option<CancelHandle> {
        self.cancel.clone()
    }

    /// Phase and bell flag read together, never from the middle of a step.
    pub fn state(&self) -> (Phase, bool) {
        let read = || (self.phase.get(), self.bell_triggered.get());
        match &self.cancel {
            Some(handle) => handle.service.exclusive(read),
            None => read(),
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn bell_triggered(&self) -> bool {
        self.bell_triggered.get()
    }

    pub fn status(&self) -> DriverStatus {
        self.status.get()
    }

    pub fn phase_signal(&self) -> ReadSignal<Phase> {
        self.phase.reader()
    }

    pub fn bell_signal(&self) -> ReadSignal<bool> {
        self.bell_triggered.reader()
    }

    pub fn status_signal(&self) -> ReadSignal<DriverStatus> {
        self.status.reader()
    }
}

impl Default for SequenceDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SequenceDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceDriver")
            .field("phase", &self.phase.get_untracked())
            .field("bell_triggered", &self.bell_triggered.get_untracked())
            .field("status", &self.status.get_untracked())
            .field("starts", &self.starts)
            .finish()
    }
}

/// State moved into the driver task.
struct Steps {
    ctx: ServiceContext,
    phase: WriteSignal<Phase>,
    bell_triggered: WriteSignal<bool>,
    bell_player: Option<Arc<dyn BellPlayer>>,
}

impl Steps {
    /// Returns `false` if the run was stopped before the last step.
    async fn run(&self) -> bool {
        for (index, step) in TIMELINE.iter().enumerate() {
            tokio::time::sleep(step.wait).await;
            // The batch closes after the gate is released, so effects that
            // cancel the driver cannot deadlock on it.
            let applied = batch(|| self.ctx.run_if_active(|| self.apply(step)));
            if applied.is_none() {
                return false;
            }
            log::debug!(
                "step {}/{}: phase -> {}{}",
                index + 1,
                TIMELINE.len(),
                step.phase,
                if step.rings_bell { ", bell triggered" } else { "" }
            );
        }
        true
    }

    fn apply(&self, step: &Step) {
        self.phase.set(step.phase);
        if step.rings_bell && !self.bell_triggered.get() {
            self.bell_triggered.set(true);
            if let Some(player) = &self.bell_player {
                player.play();
            }
        }
    }
}

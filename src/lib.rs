pub mod animation;
pub mod error;
pub mod header;
pub mod host;
pub mod reactive;

use std::sync::Arc;
use std::time::{Duration, Instant};

use header::{BellPlayer, DriverStatus, HeaderView, Presenter};
use host::Activation;
use reactive::{flush_bg_writes, take_frame_request};

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::animation::{Edge, Motion, MotionKind, SpringConfig, TimingFunction, Transition};
    pub use crate::header::{
        BellPlayer, DriverStatus, Element, ElementChange, HeaderPresenter, HeaderView,
        LogBellPlayer, Phase, Presenter, SequenceDriver, TextPresenter, VisibleElements,
    };
    pub use crate::host::Activation;
    pub use crate::reactive::{
        batch, create_effect, create_memo, create_signal, Effect, Memo, ReadSignal, Signal,
        WriteSignal,
    };
    pub use crate::{App, AppConfig, Error, Result};
}

pub struct AppConfig {
    /// Pause between frames of the host loop
    pub frame_interval: Duration,
    /// How long to keep presenting after the timeline has finished
    pub linger: Duration,
    /// End the activation early, cancelling the rest of the timeline
    pub deactivate_after: Option<Duration>,
    pub worker_threads: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            linger: Duration::from_millis(500),
            deactivate_after: None,
            worker_threads: 1,
        }
    }
}

/// A callback that gets called each frame after background writes are
/// flushed and before presenting.
pub type UpdateCallback = Box<dyn FnMut(&HeaderView)>;

/// Headless host for the header: activates it once, presents frames until
/// the run ends, then deactivates.
pub struct App {
    config: AppConfig,
    bell_player: Option<Arc<dyn BellPlayer>>,
    on_update: Option<UpdateCallback>,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            bell_player: None,
            on_update: None,
        }
    }

    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.config.frame_interval = interval;
        self
    }

    pub fn linger(mut self, linger: Duration) -> Self {
        self.config.linger = linger;
        self
    }

    pub fn deactivate_after(mut self, after: Duration) -> Self {
        self.config.deactivate_after = Some(after);
        self
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = threads.max(1);
        self
    }

    pub fn bell_player(mut self, player: Arc<dyn BellPlayer>) -> Self {
        self.bell_player = Some(player);
        self
    }

    /// Set a callback that gets called each frame with the current view.
    pub fn on_update<F: FnMut(&HeaderView) + 'static>(mut self, callback: F) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Run one activation to completion on the calling thread.
    ///
    /// Returns the status the driver ended in: `Finished` after a full run,
    /// `Cancelled` if `deactivate_after` cut it short.
    pub fn run<P: Presenter>(mut self, mut presenter: P) -> Result<DriverStatus> {
        // Ignore the error if a logger is already installed
        let _ = env_logger::try_init();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .thread_name("appbar-motion")
            .enable_time()
            .build()?;
        let guard = runtime.enter();

        let activation = match self.bell_player.take() {
            Some(player) => Activation::activate_with(player),
            None => Activation::activate(),
        };
        let driver = activation.driver();

        let started = Instant::now();
        let mut finished_at: Option<Instant> = None;
        presenter.present(&HeaderView::capture(driver));

        loop {
            flush_bg_writes();

            if take_frame_request() {
                let view = HeaderView::capture(driver);
                log::trace!("frame: {view:?}");
                if let Some(ref mut callback) = self.on_update {
                    callback(&view);
                }
                presenter.present(&view);
            }

            let status = driver.status();
            if status == DriverStatus::Cancelled {
                break;
            }
            if status == DriverStatus::Finished {
                let at = *finished_at.get_or_insert_with(Instant::now);
                if at.elapsed() >= self.config.linger {
                    break;
                }
            }
            if let Some(after) = self.config.deactivate_after {
                if started.elapsed() >= after && !status.is_terminal() {
                    log::info!("deactivating after {after:?}");
                    driver.cancel();
                    continue;
                }
            }

            std::thread::sleep(self.config.frame_interval);
        }

        flush_bg_writes();
        presenter.present(&HeaderView::capture(driver));
        let status = driver.status();
        activation.deactivate();
        drop(guard);
        runtime.shutdown_timeout(Duration::from_millis(100));
        reactive::reset_reactive();
        Ok(status)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

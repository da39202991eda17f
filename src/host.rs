//! Host lifecycle bracket around one header run.

use std::sync::Arc;

use crate::header::{BellPlayer, SequenceDriver};
use crate::reactive::{dispose_owner, is_owner_alive, run_in_owner, with_owner, OwnerId};

/// One mounted header.
///
/// Activating opens an owner scope, builds a fresh [`SequenceDriver`] in it
/// and starts it. This is the only place a driver is started, which is how
/// the one-start-per-driver precondition is upheld. Deactivating (or
/// dropping) disposes the scope, cancelling whatever part of the timeline is
/// still pending.
///
/// Must be created inside a tokio runtime.
pub struct Activation {
    owner: OwnerId,
    driver: SequenceDriver,
}

impl Activation {
    pub fn activate() -> Self {
        Self::mount(None)
    }

    /// Activate with a bell sub-animation player attached.
    pub fn activate_with(bell_player: Arc<dyn BellPlayer>) -> Self {
        Self::mount(Some(bell_player))
    }

    fn mount(bell_player: Option<Arc<dyn BellPlayer>>) -> Self {
        let (driver, owner) = with_owner(|| {
            let mut driver = SequenceDriver::new();
            if let Some(player) = bell_player {
                driver = driver.with_bell_player(player);
            }
            driver.start();
            driver
        });
        log::info!("header activated (owner {owner})");
        Self { owner, driver }
    }

    pub fn driver(&self) -> &SequenceDriver {
        &self.driver
    }

    pub fn is_active(&self) -> bool {
        is_owner_alive(self.owner)
    }

    /// Run `f` inside this activation's scope, e.g. to mount presenters whose
    /// effects should be torn down with it.
    pub fn scope<T>(&self, f: impl FnOnce(&SequenceDriver) -> T) -> T {
        run_in_owner(self.owner, || f(&self.driver))
    }

    /// End the activation, cancelling any pending steps.
    pub fn deactivate(self) {
        drop(self);
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        if is_owner_alive(self.owner) {
            log::info!(
                "header deactivated at {} ({:?})",
                self.driver.current_phase(),
                self.driver.status()
            );
            dispose_owner(self.owner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{DriverStatus, HeaderPresenter, LogBellPlayer, Phase};
    use crate::reactive::on_cleanup;
    use std::cell::Cell;
    use std::rc::Rc;

    #[tokio::test(start_paused = true)]
    async fn test_activation_starts_driver() {
        let activation = Activation::activate();
        assert!(activation.is_active());
        assert_eq!(activation.driver().status(), DriverStatus::Running);
        assert_eq!(activation.driver().current_phase(), Phase::LogoShown);
        assert_eq!(activation.driver().start_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_cancels_and_runs_scoped_cleanups() {
        let player = Arc::new(LogBellPlayer::new());
        let activation = Activation::activate_with(player.clone());
        let status = activation.driver().status_signal();

        let cleaned = Rc::new(Cell::new(false));
        let cleaned_clone = cleaned.clone();
        activation.scope(|driver| {
            let _presenter = HeaderPresenter::mount(driver.phase_signal(), |_| {});
            on_cleanup(move || cleaned_clone.set(true));
        });

        activation.deactivate();
        assert!(cleaned.get());
        assert_eq!(status.get(), DriverStatus::Cancelled);

        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        assert_eq!(player.plays(), 0);
    }
}

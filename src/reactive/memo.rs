use super::effect::create_effect;
use super::signal::{create_signal, ReadSignal};

/// Eager computed value that recomputes immediately when dependencies change.
///
/// A `Memo<T>` updates eagerly whenever any dependency signal changes.
/// It only notifies downstream subscribers when the computed result actually
/// differs (`PartialEq`), so an effect reading a memo runs only on real changes.
///
/// # Example
///
/// ```ignore
/// let phase = create_signal(Phase::LogoShown);
/// let logo_visible = create_memo(move || phase.get() == Phase::LogoShown);
/// ```
#[derive(Clone)]
pub struct Memo<T> {
    value: ReadSignal<T>,
}

/// Create an eagerly-evaluated memo that recomputes when dependencies change.
///
/// The backing effect belongs to the current owner, so the memo stops
/// recomputing once that owner is disposed.
pub fn create_memo<T, F>(f: F) -> Memo<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn() -> T + 'static,
{
    let signal = create_signal(f());
    let writer = signal.writer();
    // The first run re-evaluates `f` to collect dependencies; `set` skips the
    // notification because the value is unchanged.
    create_effect(move || writer.set(f()));
    Memo {
        value: signal.reader(),
    }
}

impl<T: Clone> Memo<T> {
    /// Get the current memo value (tracked for dependency tracking).
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn get_untracked(&self) -> T {
        self.value.get_untracked()
    }
}

impl<T> Memo<T> {
    /// Borrow the current value (tracked for dependency tracking).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.value.with(f)
    }
}

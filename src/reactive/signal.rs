use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use super::invalidation::{queue_bg_write, request_frame};
use super::runtime::{notify_signal_write, try_with_runtime, with_runtime, SignalId};

struct SignalInner<T> {
    id: SignalId,
    /// Thread whose runtime allocated `id` and runs the subscribed effects.
    home: ThreadId,
    value: RwLock<T>,
}

impl<T> SignalInner<T> {
    fn track(&self) {
        if thread::current().id() == self.home {
            try_with_runtime(|rt| rt.track_read(self.id));
        }
    }

    fn notify(&self) {
        if thread::current().id() == self.home {
            notify_signal_write(self.id);
            request_frame(self.home);
        } else {
            // Also requests the frame, once the enclosing batch is published.
            queue_bg_write(self.home, self.id);
        }
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<T: PartialEq> SignalInner<T> {
    fn set(&self, value: T) {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        if *guard != value {
            *guard = value;
            drop(guard);
            self.notify();
        }
    }
}

impl<T: PartialEq + Clone> SignalInner<T> {
    fn update(&self, f: impl FnOnce(&mut T)) {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        let old_value = guard.clone();
        f(&mut guard);
        if *guard != old_value {
            drop(guard);
            self.notify();
        }
    }
}

/// A reactive signal that can be read and written from any thread.
///
/// Signals are the core primitive of the reactive system. When a signal's
/// value changes, any effects that depend on it will be re-run on the signal's
/// home thread (the thread that created it).
///
/// # Thread Safety
/// The value sits behind a `RwLock`, so a reader never observes a partially
/// written value. A write from a background thread updates the value
/// immediately and defers effect notification until the home thread calls
/// [`flush_bg_writes`](super::flush_bg_writes). Background writes made inside
/// one [`batch`](super::batch) become visible to the home thread's effects
/// together, when the batch closes.
#[derive(Clone)]
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = with_runtime(|rt| rt.allocate_signal());
        Self {
            inner: Arc::new(SignalInner {
                id,
                home: thread::current().id(),
                value: RwLock::new(value),
            }),
        }
    }

    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (self.reader(), WriteSignal { inner: self.inner })
    }

    pub fn reader(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: self.inner.clone(),
        }
    }

    pub fn writer(&self) -> WriteSignal<T> {
        WriteSignal {
            inner: self.inner.clone(),
        }
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.track();
        self.inner.read(f)
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.read(f)
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: PartialEq> Signal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        self.inner.set(value);
    }
}

impl<T: PartialEq + Clone> Signal<T> {
    /// Updates the signal's value using a closure, only triggering updates if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.inner.update(f);
    }
}

/// Read-only handle to a signal.
#[derive(Clone)]
pub struct ReadSignal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> ReadSignal<T> {
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.track();
        self.inner.read(f)
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.read(f)
    }
}

impl<T: Clone> ReadSignal<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

/// Write-only handle to a signal.
#[derive(Clone)]
pub struct WriteSignal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T: PartialEq> WriteSignal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        self.inner.set(value);
    }
}

impl<T: PartialEq + Clone> WriteSignal<T> {
    /// Updates the signal's value using a closure, only triggering updates if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.inner.update(f);
    }
}

impl<T: Clone> WriteSignal<T> {
    /// Get the current value (useful for read-modify-write patterns)
    pub fn get(&self) -> T {
        self.inner.read(T::clone)
    }
}

pub fn create_signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{create_effect, flush_bg_writes};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_create_signal_and_get() {
        let signal = create_signal(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn test_update_with_closure() {
        let signal = create_signal(5);
        signal.update(|v| *v += 10);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn test_split_into_read_write_handles() {
        let signal = create_signal(7);
        let (read, write) = signal.split();

        assert_eq!(read.get(), 7);
        write.set(14);
        assert_eq!(read.get(), 14);
    }

    #[test]
    fn test_with_untracked() {
        let signal = create_signal(String::from("test"));
        let result = signal.with_untracked(|s| format!("{}ing", s));
        assert_eq!(result, "testing");
    }

    #[test]
    fn test_set_only_notifies_on_change() {
        let signal = create_signal(5);
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let reader = signal.reader();
        create_effect(move || {
            reader.get();
            runs_clone.set(runs_clone.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        signal.set(5);
        assert_eq!(runs.get(), 1);
        signal.set(10);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_background_write_is_visible_and_deferred() {
        let signal = create_signal(0u32);
        let seen = Rc::new(Cell::new(0u32));
        let seen_clone = seen.clone();
        let reader = signal.reader();
        create_effect(move || seen_clone.set(reader.get()));

        let writer = signal.writer();
        std::thread::spawn(move || writer.set(3))
            .join()
            .expect("writer thread panicked");

        // Value is published immediately, the effect waits for the flush.
        assert_eq!(signal.get_untracked(), 3);
        assert_eq!(seen.get(), 0);

        assert_eq!(flush_bg_writes(), 1);
        assert_eq!(seen.get(), 3);
    }
}

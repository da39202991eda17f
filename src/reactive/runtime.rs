use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};

use super::invalidation::publish_staged_bg_writes;

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

struct EffectSlot {
    /// Taken out while the effect runs so the runtime is not borrowed during the callback.
    callback: Option<Box<dyn FnMut()>>,
    dependencies: HashSet<SignalId>,
}

/// Per-thread reactive runtime.
///
/// Effects always run on the thread that created them. Signals remember the
/// thread whose runtime allocated their id; writes from any other thread are
/// routed through [`super::invalidation`] and replayed here by
/// [`super::flush_bg_writes`].
#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: BTreeSet<EffectId>,
    effects: Vec<Option<EffectSlot>>,
    signal_subscribers: HashMap<SignalId, HashSet<EffectId>>,
    next_signal_id: SignalId,
    batch_depth: usize,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_signal(&mut self) -> SignalId {
        let id = self.next_signal_id;
        self.next_signal_id += 1;
        id
    }

    fn allocate_effect(&mut self, callback: Box<dyn FnMut()>) -> EffectId {
        let id = self.effects.len();
        self.effects.push(Some(EffectSlot {
            callback: Some(callback),
            dependencies: HashSet::new(),
        }));
        id
    }

    pub fn track_read(&mut self, signal_id: SignalId) {
        let Some(effect_id) = self.current_effect else {
            return;
        };
        let Some(Some(slot)) = self.effects.get_mut(effect_id) else {
            return;
        };
        slot.dependencies.insert(signal_id);
        self.signal_subscribers
            .entry(signal_id)
            .or_default()
            .insert(effect_id);
    }

    /// Queue every subscriber of `signal_id`. Returns `true` when the caller
    /// should flush (not inside a batch and not already flushing).
    pub fn notify_write(&mut self, signal_id: SignalId) -> bool {
        if let Some(subscribers) = self.signal_subscribers.get(&signal_id) {
            self.pending_effects.extend(subscribers.iter().copied());
        }
        self.batch_depth == 0 && !self.flushing && !self.pending_effects.is_empty()
    }

    pub fn dispose_effect(&mut self, effect_id: EffectId) {
        let Some(slot) = self.effects.get_mut(effect_id).and_then(Option::take) else {
            return;
        };
        for signal_id in slot.dependencies {
            if let Some(subscribers) = self.signal_subscribers.get_mut(&signal_id) {
                subscribers.remove(&effect_id);
            }
        }
        self.pending_effects.remove(&effect_id);
    }

    pub fn is_effect_alive(&self, effect_id: EffectId) -> bool {
        matches!(self.effects.get(effect_id), Some(Some(_)))
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Try to access the runtime.
///
/// Does nothing if the runtime is already borrowed or the thread-local has
/// been torn down (thread exit).
pub fn try_with_runtime<F>(f: F)
where
    F: FnOnce(&mut Runtime),
{
    let _ = RUNTIME.try_with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            f(&mut runtime);
        }
    });
}

/// Register an effect and run it once to collect its dependencies.
pub(crate) fn register_effect(callback: Box<dyn FnMut()>) -> EffectId {
    let id = with_runtime(|rt| rt.allocate_effect(callback));
    run_effect(id);
    id
}

fn run_effect(effect_id: EffectId) {
    let taken = with_runtime(|rt| {
        let slot = rt.effects.get_mut(effect_id)?.as_mut()?;
        let callback = slot.callback.take()?;
        let old_deps = std::mem::take(&mut slot.dependencies);
        for signal_id in old_deps {
            if let Some(subscribers) = rt.signal_subscribers.get_mut(&signal_id) {
                subscribers.remove(&effect_id);
            }
        }
        let prev = rt.current_effect.replace(effect_id);
        Some((callback, prev))
    });

    let Some((mut callback, prev)) = taken else {
        return;
    };

    callback();

    with_runtime(|rt| {
        rt.current_effect = prev;
        // The effect may have been disposed by its own callback.
        if let Some(Some(slot)) = rt.effects.get_mut(effect_id) {
            slot.callback = Some(callback);
        }
    });
}

/// Run queued effects until none remain.
pub(crate) fn flush_effects() {
    let already_flushing = with_runtime(|rt| std::mem::replace(&mut rt.flushing, true));
    if already_flushing {
        return;
    }
    while let Some(effect_id) = with_runtime(|rt| rt.pending_effects.pop_first()) {
        run_effect(effect_id);
    }
    with_runtime(|rt| rt.flushing = false);
}

/// Notify subscribers of a signal written on this thread.
pub(crate) fn notify_signal_write(signal_id: SignalId) {
    let mut should_flush = false;
    try_with_runtime(|rt| should_flush = rt.notify_write(signal_id));
    if should_flush {
        flush_effects();
    }
}

/// Group several writes so dependent effects run once, after the closure.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let result = f();
    let (outermost, should_flush) = with_runtime(|rt| {
        rt.batch_depth -= 1;
        (rt.batch_depth == 0, rt.batch_depth == 0 && !rt.flushing)
    });
    if outermost {
        publish_staged_bg_writes();
    }
    if should_flush {
        flush_effects();
    }
    result
}

/// Whether a [`batch`] is open on this thread.
pub(crate) fn is_batching() -> bool {
    RUNTIME
        .try_with(|rt| rt.try_borrow().is_ok_and(|rt| rt.batch_depth > 0))
        .unwrap_or(false)
}

/// Drop every effect on this thread. Ids are never reused, so stale
/// `Signal`/`Effect` handles stay inert.
pub(crate) fn reset_runtime() {
    try_with_runtime(|rt| {
        rt.effects.iter_mut().for_each(|slot| *slot = None);
        rt.pending_effects.clear();
        rt.signal_subscribers.clear();
        rt.current_effect = None;
        rt.batch_depth = 0;
        rt.flushing = false;
    });
}

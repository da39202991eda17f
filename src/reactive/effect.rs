use std::marker::PhantomData;

use super::owner::register_effect as register_with_owner;
use super::runtime::{register_effect, with_runtime, EffectId};

/// Handle to a running effect.
///
/// Effects belong to the owner that was current when they were created and
/// are disposed with it. The handle can be copied freely; dropping it does
/// not stop the effect. Effects are bound to their creating thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
    _not_send: PhantomData<*const ()>,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = register_effect(Box::new(f));
        register_with_owner(id);
        Self {
            id,
            _not_send: PhantomData,
        }
    }

    /// Stop the effect before its owner is disposed.
    pub fn dispose(self) {
        with_runtime(|rt| rt.dispose_effect(self.id));
    }

    pub fn is_alive(&self) -> bool {
        with_runtime(|rt| rt.is_effect_alive(self.id))
    }
}

pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::create_signal;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_effect_tracks_signal() {
        let signal = create_signal(1);
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let reader = signal.reader();
        create_effect(move || log_clone.borrow_mut().push(reader.get()));

        signal.set(2);
        signal.set(3);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_disposed_effect_stops() {
        let signal = create_signal(1);
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let reader = signal.reader();
        let effect = create_effect(move || log_clone.borrow_mut().push(reader.get()));

        effect.dispose();
        assert!(!effect.is_alive());
        signal.set(2);
        assert_eq!(*log.borrow(), vec![1]);
    }
}

//! Reactive ownership system for automatic resource cleanup.
//!
//! An owner is the reactive side of an activation: effects and cleanup
//! callbacks registered while it is current are torn down together when it
//! is disposed.
//!
//! # Overview
//!
//! - Every effect can belong to an owner
//! - Owners form a tree structure (child owners are disposed before parents)
//! - When an owner is disposed, all owned effects and cleanup callbacks are cleaned up
//! - `on_cleanup` allows registering custom cleanup logic (timers, background tasks, etc.)
//!
//! # Example
//!
//! ```ignore
//! let (driver, owner_id) = with_owner(|| {
//!     let mut driver = SequenceDriver::new();
//!     driver.start();
//!     driver
//! });
//!
//! // Deactivation: the driver's cleanup cancels the timeline.
//! dispose_owner(owner_id);
//! ```

use std::cell::RefCell;

use super::runtime::{with_runtime, EffectId};

/// Unique identifier for an owner in the owner arena.
pub type OwnerId = usize;

/// An owner that manages the lifecycle of reactive primitives.
struct Owner {
    effects: Vec<EffectId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    children: Vec<OwnerId>,
}

impl Owner {
    fn new() -> Self {
        Self {
            effects: Vec::new(),
            cleanups: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Arena-based storage for owners.
#[derive(Default)]
struct OwnerArena {
    owners: Vec<Option<Owner>>,
}

impl OwnerArena {
    fn allocate(&mut self) -> OwnerId {
        let id = self.owners.len();
        self.owners.push(Some(Owner::new()));
        id
    }

    fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.owners.get_mut(id).and_then(|o| o.as_mut())
    }

    fn take(&mut self, id: OwnerId) -> Option<Owner> {
        self.owners.get_mut(id).and_then(|o| o.take())
    }
}

thread_local! {
    static CURRENT_OWNER: RefCell<Option<OwnerId>> = const { RefCell::new(None) };
    static OWNERS: RefCell<OwnerArena> = RefCell::new(OwnerArena::default());
}

/// Execute a closure within a new owner scope.
///
/// All effects and cleanups registered within the closure belong to this
/// owner. If another owner is current, the new one becomes its child.
///
/// Returns a tuple of the closure's return value and the owner ID.
pub fn with_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    let parent = current_owner();

    let owner_id = OWNERS.with(|owners| {
        let mut owners = owners.borrow_mut();
        let id = owners.allocate();
        if let Some(parent_owner) = parent.and_then(|p| owners.get_mut(p)) {
            parent_owner.children.push(id);
        }
        id
    });

    let prev_owner = CURRENT_OWNER.with(|current| current.borrow_mut().replace(owner_id));
    let result = f();
    CURRENT_OWNER.with(|current| *current.borrow_mut() = prev_owner);

    (result, owner_id)
}

/// Execute a closure with an existing owner as the current one.
///
/// Effects and cleanups registered inside belong to `id`. If `id` has been
/// disposed they are registered nowhere.
pub fn run_in_owner<T>(id: OwnerId, f: impl FnOnce() -> T) -> T {
    let prev_owner = CURRENT_OWNER.with(|current| current.borrow_mut().replace(id));
    let result = f();
    CURRENT_OWNER.with(|current| *current.borrow_mut() = prev_owner);
    result
}

/// Get the current owner ID, if any.
pub fn current_owner() -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| *current.borrow())
}

/// Whether `id` refers to an owner that has not been disposed yet.
pub fn is_owner_alive(id: OwnerId) -> bool {
    OWNERS.with(|owners| matches!(owners.borrow().owners.get(id), Some(Some(_))))
}

/// Dispose an owner and all its resources.
///
/// This will:
/// 1. Recursively dispose all child owners (depth-first)
/// 2. Run all cleanup callbacks in reverse order
/// 3. Dispose all effects
///
/// Disposing an owner twice is a no-op.
pub fn dispose_owner(id: OwnerId) {
    let Some(owner) = OWNERS.with(|owners| owners.borrow_mut().take(id)) else {
        return;
    };

    for child_id in owner.children {
        dispose_owner(child_id);
    }

    for cleanup in owner.cleanups.into_iter().rev() {
        cleanup();
    }

    for effect_id in owner.effects {
        with_runtime(|rt| rt.dispose_effect(effect_id));
    }
}

/// Register a cleanup callback to run when the current owner is disposed.
///
/// Cleanup callbacks are run in reverse order (LIFO). Outside an owner scope
/// the callback is dropped without running.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    let Some(owner_id) = current_owner() else {
        return;
    };
    OWNERS.with(|owners| {
        if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
            owner.cleanups.push(Box::new(f));
        }
    });
}

/// Register an effect with the current owner.
pub(crate) fn register_effect(id: EffectId) {
    let Some(owner_id) = current_owner() else {
        return;
    };
    OWNERS.with(|owners| {
        if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
            owner.effects.push(id);
        }
    });
}

/// Drop every owner on this thread without running cleanups.
pub(crate) fn reset_owners() {
    CURRENT_OWNER.with(|current| *current.borrow_mut() = None);
    OWNERS.with(|owners| *owners.borrow_mut() = OwnerArena::default());
}

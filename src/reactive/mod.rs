pub mod effect;
pub mod invalidation;
pub mod memo;
pub mod owner;
pub mod runtime;
pub mod service;
pub mod signal;

pub use effect::{create_effect, Effect};
pub use invalidation::{flush_bg_writes, take_frame_request};
pub use memo::{create_memo, Memo};
pub use owner::{
    current_owner, dispose_owner, is_owner_alive, on_cleanup, run_in_owner, with_owner, OwnerId,
};
pub use runtime::batch;
pub use service::{create_service, ServiceContext, ServiceHandle};
pub use signal::{create_signal, ReadSignal, Signal, WriteSignal};

/// Reset all reactive state owned by the calling thread.
///
/// Called when the host [`App`](crate::App) shuts down so a later run on the
/// same thread starts clean. Owners are dropped without running cleanups;
/// dispose them first.
pub(crate) fn reset_reactive() {
    owner::reset_owners();
    runtime::reset_runtime();
    invalidation::reset_invalidation();
}

//! The animated app-store header.
//!
//! A search bar that morphs into a logo, then search text, then a
//! notification bell with a badge and a count, driven by a fixed timeline.
//!
//! - [`SequenceDriver`] plays the [`TIMELINE`] once per activation and owns
//!   the observable [`Phase`] and `BellTriggered` values
//! - [`presenter`] maps that state to visible elements and their declared
//!   motions
//! - [`BellPlayer`] is the seam to the bell sub-animation

pub mod bell;
pub mod driver;
pub mod phase;
pub mod presenter;
pub mod timeline;

pub use bell::{BellPlayer, LogBellPlayer};
pub use driver::{CancelHandle, DriverStatus, SequenceDriver};
pub use phase::Phase;
pub use presenter::{
    visible_elements, Element, ElementChange, HeaderPresenter, HeaderView, Presenter,
    TextPresenter, VisibleElements,
};
pub use timeline::{state_at, total_duration, Step, TIMELINE};

//! Declarative motion descriptors.
//!
//! The header never interpolates anything itself. When an element appears or
//! disappears it hands the animation framework a list of [`Motion`]s, each a
//! target plus a [`Transition`].

mod spring;
mod timing;

pub use spring::SpringConfig;
pub use timing::TimingFunction;

/// Configuration for how a property should animate when it changes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Duration of the animation in milliseconds, `None` for springs
    pub duration_ms: Option<u32>,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before animation starts in milliseconds
    pub delay_ms: u32,
}

impl Transition {
    /// A tween of `duration_ms` using the standard curve
    pub const fn tween(duration_ms: u32) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            timing: TimingFunction::FastOutSlowIn,
            delay_ms: 0,
        }
    }

    /// Create a spring-based transition with the given configuration
    pub const fn spring(config: SpringConfig) -> Self {
        Self {
            duration_ms: None,
            timing: TimingFunction::Spring(config),
            delay_ms: 0,
        }
    }

    /// The transition the framework applies to fades when none is declared
    pub const fn framework_default() -> Self {
        Self::spring(SpringConfig::MEDIUM_LOW)
    }

    /// The transition the framework applies to slides when none is declared
    pub const fn framework_default_offset() -> Self {
        Self::spring(SpringConfig::MEDIUM_LOW_OFFSET)
    }

    /// Set the delay before the animation starts
    pub const fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the timing function
    pub const fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::framework_default()
    }
}

/// Which edge a horizontal slide travels from or to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// The property a motion animates and its endpoint
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionKind {
    /// Alpha from or to fully transparent
    Fade,
    /// Scale from or to zero around the center
    Scale,
    /// Horizontal offset of one density unit beyond `Edge`
    SlideHorizontal(Edge),
}

/// One declared animation: what moves, and how
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub kind: MotionKind,
    pub transition: Transition,
}

impl Motion {
    pub const fn fade(transition: Transition) -> Self {
        Self {
            kind: MotionKind::Fade,
            transition,
        }
    }

    pub const fn scale(transition: Transition) -> Self {
        Self {
            kind: MotionKind::Scale,
            transition,
        }
    }

    pub const fn slide(edge: Edge, transition: Transition) -> Self {
        Self {
            kind: MotionKind::SlideHorizontal(edge),
            transition,
        }
    }

    /// Upper bound of this motion's running time, `None` if spring driven.
    pub fn duration_ms(&self) -> Option<u32> {
        self.transition
            .duration_ms
            .map(|d| d.saturating_add(self.transition.delay_ms))
    }
}

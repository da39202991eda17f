//! Timing functions (easing curves) declared for transitions.
//!
//! These are descriptors handed to the animation framework. Nothing in this
//! crate evaluates them; the framework owns interpolation.
//!
//! ## Built-in Easing Functions
//!
//! - [`TimingFunction::Linear`] - Constant speed (no easing)
//! - [`TimingFunction::FastOutSlowIn`] - The standard tween curve
//! - [`TimingFunction::CubicBezier`] - CSS-style cubic bezier curve
//! - [`TimingFunction::Spring`] - Physics-based spring, no fixed duration

use super::spring::SpringConfig;

/// Timing function that controls the animation curve
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// Accelerates quickly and decelerates gently; cubic-bezier(0.4, 0, 0.2, 1)
    #[default]
    FastOutSlowIn,
    /// CSS cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Spring physics simulation
    Spring(SpringConfig),
}

impl TimingFunction {
    /// Control points of the curve, `None` for springs.
    pub fn control_points(&self) -> Option<(f32, f32, f32, f32)> {
        match *self {
            TimingFunction::Linear => Some((0.0, 0.0, 1.0, 1.0)),
            TimingFunction::FastOutSlowIn => Some((0.4, 0.0, 0.2, 1.0)),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
            TimingFunction::Spring(_) => None,
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(self, TimingFunction::Spring(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_points() {
        assert_eq!(
            TimingFunction::Linear.control_points(),
            Some((0.0, 0.0, 1.0, 1.0))
        );
    }

    #[test]
    fn test_spring_has_no_points() {
        let spring = TimingFunction::Spring(SpringConfig::MEDIUM_LOW);
        assert!(spring.is_spring());
        assert_eq!(spring.control_points(), None);
    }
}

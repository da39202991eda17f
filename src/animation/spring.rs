/// Configuration for a spring-driven transition.
///
/// Springs have no fixed duration; the animation framework runs them until
/// they settle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Stiffness of the spring
    pub stiffness: f32,
    /// Damping ratio, 1.0 is critically damped (no overshoot)
    pub damping_ratio: f32,
    /// Distance from the target at which the spring counts as settled
    pub visibility_threshold: f32,
}

impl SpringConfig {
    /// Spring used for fades that declare no explicit transition
    pub const MEDIUM_LOW: Self = Self {
        stiffness: 400.0,
        damping_ratio: 1.0,
        visibility_threshold: 0.01,
    };

    /// Same spring tuned for pixel offsets (slides)
    pub const MEDIUM_LOW_OFFSET: Self = Self {
        stiffness: 400.0,
        damping_ratio: 1.0,
        visibility_threshold: 1.0,
    };

    /// Whether the spring settles without overshooting its target
    pub fn is_overdamped(&self) -> bool {
        self.damping_ratio >= 1.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::MEDIUM_LOW
    }
}

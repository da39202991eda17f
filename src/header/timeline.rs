//! The fixed script the header plays once per activation.

use std::time::Duration;

use super::phase::Phase;

/// One scripted step: wait, then switch phase (and maybe ring the bell).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Delay measured from the completion of the previous step.
    pub wait: Duration,
    pub phase: Phase,
    /// Set `BellTriggered` together with `phase`.
    pub rings_bell: bool,
}

impl Step {
    const fn to(wait_ms: u64, phase: Phase) -> Self {
        Self {
            wait: Duration::from_millis(wait_ms),
            phase,
            rings_bell: false,
        }
    }

    const fn ringing(mut self) -> Self {
        self.rings_bell = true;
        self
    }
}

/// Phase before the first step fires.
pub const INITIAL_PHASE: Phase = Phase::LogoShown;

pub static TIMELINE: [Step; 6] = [
    Step::to(800, Phase::Undefined),
    Step::to(800, Phase::SearchTextShown),
    Step::to(2000, Phase::NotificationShown),
    Step::to(1000, Phase::NotificationTextShown).ringing(),
    Step::to(2000, Phase::NotificationShown),
    Step::to(500, Phase::SearchTextShown),
];

/// Time from start until the last step has fired.
pub fn total_duration() -> Duration {
    TIMELINE.iter().map(|step| step.wait).sum()
}

/// Offsets from start at which each step fires.
pub fn step_offsets() -> impl Iterator<Item = (Duration, &'static Step)> {
    TIMELINE.iter().scan(Duration::ZERO, |elapsed, step| {
        *elapsed += step.wait;
        Some((*elapsed, step))
    })
}

/// `(Phase, BellTriggered)` a run shows `elapsed` after start.
///
/// A step whose offset equals `elapsed` counts as fired.
pub fn state_at(elapsed: Duration) -> (Phase, bool) {
    step_offsets()
        .take_while(|(offset, _)| *offset <= elapsed)
        .fold((INITIAL_PHASE, false), |(_, bell), (_, step)| {
            (step.phase, bell || step.rings_bell)
        })
}

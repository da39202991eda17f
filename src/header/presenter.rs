//! Presentation side of the header.
//!
//! Maps `(Phase, BellTriggered)` to what is on screen. None of this feeds
//! back into the driver: each element derives its own visibility and
//! declares the motions the animation framework should play when it
//! appears or disappears.

use std::cell::Cell;
use std::io::Write;

use bitflags::bitflags;

use crate::animation::{Edge, Motion, Transition, TimingFunction};
use crate::reactive::{create_effect, create_memo, Memo, ReadSignal};

use super::driver::SequenceDriver;
use super::phase::Phase;

bitflags! {
    /// Elements of the header whose visibility depends on the phase.
    ///
    /// The search icon and the avatar are always shown and have no flag.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct VisibleElements: u8 {
        /// Logo image and "Google Play" wordmark
        const LOGO        = 0b0001;
        /// "Search for apps & ..." and the mic icon
        const SEARCH_TEXT = 0b0010;
        /// Green pill holding the bell
        const BADGE       = 0b0100;
        /// Notification count inside the pill
        const BADGE_TEXT  = 0b1000;
    }
}

/// A phase-dependent header element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Logo,
    SearchText,
    Badge,
    BadgeText,
}

const LOGO_ENTER: &[Motion] = &[Motion::fade(Transition::framework_default())];
const LOGO_EXIT: &[Motion] = &[
    Motion::fade(Transition::tween(800)),
    Motion::scale(Transition::tween(650)),
];
const SEARCH_TEXT_ENTER: &[Motion] = &[Motion::fade(Transition::tween(800))];
const SEARCH_TEXT_EXIT: &[Motion] = &[Motion::fade(Transition::framework_default())];
const BADGE_ENTER: &[Motion] = &[
    Motion::fade(Transition::tween(500)),
    Motion::slide(
        Edge::End,
        Transition::tween(5000).timing(TimingFunction::Linear),
    ),
];
const SLIDING_FADE: &[Motion] = &[
    Motion::fade(Transition::framework_default()),
    Motion::slide(Edge::End, Transition::framework_default_offset()),
];

impl Element {
    pub const ALL: [Element; 4] = [
        Element::Logo,
        Element::SearchText,
        Element::Badge,
        Element::BadgeText,
    ];

    pub fn flag(&self) -> VisibleElements {
        match self {
            Element::Logo => VisibleElements::LOGO,
            Element::SearchText => VisibleElements::SEARCH_TEXT,
            Element::Badge => VisibleElements::BADGE,
            Element::BadgeText => VisibleElements::BADGE_TEXT,
        }
    }

    pub fn is_visible_in(&self, phase: Phase) -> bool {
        match self {
            Element::Logo => phase == Phase::LogoShown,
            Element::SearchText => phase == Phase::SearchTextShown,
            Element::Badge => matches!(
                phase,
                Phase::NotificationShown | Phase::NotificationTextShown
            ),
            Element::BadgeText => phase == Phase::NotificationTextShown,
        }
    }

    /// Motions played when the element appears.
    pub fn enter_motions(&self) -> &'static [Motion] {
        match self {
            Element::Logo => LOGO_ENTER,
            Element::SearchText => SEARCH_TEXT_ENTER,
            Element::Badge => BADGE_ENTER,
            Element::BadgeText => SLIDING_FADE,
        }
    }

    /// Motions played when the element disappears.
    pub fn exit_motions(&self) -> &'static [Motion] {
        match self {
            Element::Logo => LOGO_EXIT,
            Element::SearchText => SEARCH_TEXT_EXIT,
            Element::Badge | Element::BadgeText => SLIDING_FADE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Element::Logo => "logo",
            Element::SearchText => "search-text",
            Element::Badge => "badge",
            Element::BadgeText => "badge-text",
        }
    }
}

/// Set of elements shown in `phase`.
pub fn visible_elements(phase: Phase) -> VisibleElements {
    Element::ALL
        .iter()
        .filter(|element| element.is_visible_in(phase))
        .fold(VisibleElements::empty(), |set, element| set | element.flag())
}

/// Snapshot of everything a renderer needs for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderView {
    pub phase: Phase,
    /// Whether the bell animation has been started.
    pub bell_triggered: bool,
    pub visible: VisibleElements,
}

impl HeaderView {
    pub fn from_state(phase: Phase, bell_triggered: bool) -> Self {
        Self {
            phase,
            bell_triggered,
            visible: visible_elements(phase),
        }
    }

    /// Read the driver's current state (tracked when called inside an effect).
    pub fn capture(driver: &SequenceDriver) -> Self {
        let (phase, bell_triggered) = driver.state();
        Self::from_state(phase, bell_triggered)
    }

    pub fn shows(&self, element: Element) -> bool {
        self.visible.contains(element.flag())
    }
}

/// Something that draws header frames.
pub trait Presenter {
    fn present(&mut self, view: &HeaderView);
}

impl<F: FnMut(&HeaderView)> Presenter for F {
    fn present(&mut self, view: &HeaderView) {
        self(view)
    }
}

/// Draws the header as one line of text, skipping frames that would print
/// the same line again.
pub struct TextPresenter<W: Write> {
    out: W,
    last: Option<String>,
}

impl TextPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// One-line rendering of `view`.
    pub fn render(view: &HeaderView) -> String {
        let mut parts = vec!["(Q)".to_string()];
        if view.shows(Element::Logo) {
            parts.push("|> Google Play".to_string());
        }
        if view.shows(Element::SearchText) {
            parts.push("Search for apps & ...  [mic]".to_string());
        }
        if view.shows(Element::Badge) {
            let bell = if view.bell_triggered { "bell~" } else { "bell" };
            let count = if view.shows(Element::BadgeText) { " 100" } else { "" };
            parts.push(format!("[{bell}{count}]"));
        }
        parts.push("(@)".to_string());
        format!("[ {} ]", parts.join("  "))
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, view: &HeaderView) {
        let line = Self::render(view);
        if self.last.as_deref() == Some(line.as_str()) {
            return;
        }
        if let Err(err) = writeln!(self.out, "{line}") {
            log::warn!("failed to write header frame: {err}");
        }
        self.last = Some(line);
    }
}

/// An element appearing or disappearing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementChange {
    pub element: Element,
    pub visible: bool,
    pub motions: &'static [Motion],
}

/// Per-element visibility views over a driver.
///
/// Mount it inside the activation's owner so its effects are disposed with
/// the activation.
pub struct HeaderPresenter {
    visibility: Vec<(Element, Memo<bool>)>,
}

impl HeaderPresenter {
    /// Derive a visibility memo per element from `phase` and report every
    /// change to `on_change`. The initial visibility is not reported.
    pub fn mount<F>(phase: ReadSignal<Phase>, on_change: F) -> Self
    where
        F: Fn(ElementChange) + Clone + 'static,
    {
        let visibility = Element::ALL
            .iter()
            .map(|&element| {
                let phase = phase.clone();
                let visible = create_memo(move || element.is_visible_in(phase.get()));

                let observed = visible.clone();
                let on_change = on_change.clone();
                let previous = Cell::new(None);
                create_effect(move || {
                    let now = observed.get();
                    if previous.replace(Some(now)).is_some() {
                        let motions = if now {
                            element.enter_motions()
                        } else {
                            element.exit_motions()
                        };
                        log::debug!(
                            "{} {} ({} motions)",
                            element.label(),
                            if now { "enters" } else { "exits" },
                            motions.len()
                        );
                        on_change(ElementChange {
                            element,
                            visible: now,
                            motions,
                        });
                    }
                });

                (element, visible)
            })
            .collect();

        Self { visibility }
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.visibility
            .iter()
            .find(|(e, _)| *e == element)
            .is_some_and(|(_, memo)| memo.get_untracked())
    }

    pub fn visible(&self) -> VisibleElements {
        self.visibility
            .iter()
            .filter(|(_, memo)| memo.get_untracked())
            .fold(VisibleElements::empty(), |set, (e, _)| set | e.flag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::create_signal;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_visibility_table() {
        use VisibleElements as V;
        assert_eq!(visible_elements(Phase::LogoShown), V::LOGO);
        assert_eq!(visible_elements(Phase::Undefined), V::empty());
        assert_eq!(visible_elements(Phase::SearchTextShown), V::SEARCH_TEXT);
        assert_eq!(visible_elements(Phase::NotificationShown), V::BADGE);
        assert_eq!(
            visible_elements(Phase::NotificationTextShown),
            V::BADGE | V::BADGE_TEXT
        );
    }

    #[test]
    fn test_badge_text_implies_badge() {
        for phase in Phase::ALL {
            let visible = visible_elements(phase);
            if visible.contains(VisibleElements::BADGE_TEXT) {
                assert!(visible.contains(VisibleElements::BADGE));
            }
        }
    }

    #[test]
    fn test_declared_motions() {
        let durations: Vec<_> = Element::Logo
            .exit_motions()
            .iter()
            .map(Motion::duration_ms)
            .collect();
        assert_eq!(durations, vec![Some(800), Some(650)]);

        assert_eq!(
            Element::SearchText.enter_motions()[0].duration_ms(),
            Some(800)
        );

        let badge = Element::Badge.enter_motions();
        assert_eq!(badge[0].duration_ms(), Some(500));
        assert_eq!(badge[1].duration_ms(), Some(5000));
        assert_eq!(badge[1].transition.timing, TimingFunction::Linear);

        assert!(Element::BadgeText
            .exit_motions()
            .iter()
            .all(|m| m.transition.timing.is_spring()));
    }

    #[test]
    fn test_text_render() {
        let logo = HeaderView::from_state(Phase::LogoShown, false);
        assert_eq!(
            TextPresenter::<Vec<u8>>::render(&logo),
            "[ (Q)  |> Google Play  (@) ]"
        );

        let badge = HeaderView::from_state(Phase::NotificationTextShown, true);
        assert_eq!(
            TextPresenter::<Vec<u8>>::render(&badge),
            "[ (Q)  [bell~ 100]  (@) ]"
        );
    }

    #[test]
    fn test_text_presenter_skips_repeats() {
        let mut presenter = TextPresenter::new(Vec::new());
        let view = HeaderView::from_state(Phase::Undefined, false);
        presenter.present(&view);
        presenter.present(&view);
        presenter.present(&HeaderView::from_state(Phase::SearchTextShown, false));

        let out = String::from_utf8(presenter.into_inner()).expect("utf8 output");
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_closure_presenter() {
        let mut frames = Vec::new();
        let mut presenter = |view: &HeaderView| frames.push(view.phase);
        presenter.present(&HeaderView::from_state(Phase::Undefined, false));
        assert_eq!(frames, vec![Phase::Undefined]);
    }

    #[test]
    fn test_header_presenter_reports_changes() {
        let phase = create_signal(Phase::LogoShown);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let presenter = HeaderPresenter::mount(phase.reader(), move |change: ElementChange| {
            sink.borrow_mut().push((change.element, change.visible))
        });
        assert!(changes.borrow().is_empty());
        assert!(presenter.is_visible(Element::Logo));

        phase.set(Phase::NotificationTextShown);
        assert_eq!(
            *changes.borrow(),
            vec![
                (Element::Logo, false),
                (Element::Badge, true),
                (Element::BadgeText, true),
            ]
        );
        assert_eq!(
            presenter.visible(),
            VisibleElements::BADGE | VisibleElements::BADGE_TEXT
        );

        phase.set(Phase::NotificationShown);
        assert_eq!(changes.borrow().last(), Some(&(Element::BadgeText, false)));
    }
}

//! Overview / detail lifecycle.
//!
//! `Overview` → `Transitioning` (animated, one progress step per frame) →
//! `Detail`. Any click while transitioning or in detail collapses straight
//! back to `Overview`; collapse is not animated.

use crate::catalog::BodyId;
use log::info;

pub(crate) const DEFAULT_EXPAND_STEP: f32 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Overview,
    /// `frames` counts ticks since the selection; progress is `frames * step`.
    Transitioning { body: BodyId, frames: u32 },
    Detail { body: BodyId },
}

/// Result of hit-testing one click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    ToggleSidebar,
    SelectBody(BodyId),
    Dismiss,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewState {
    mode: Mode,
    sidebar_visible: bool,
    step: f32,
}

impl ViewState {
    pub(crate) fn new(step: f32) -> Self {
        Self {
            mode: Mode::Overview,
            sidebar_visible: true,
            step: step.clamp(1e-4, 1.0),
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    pub(crate) fn selected(&self) -> Option<BodyId> {
        match self.mode {
            Mode::Overview => None,
            Mode::Transitioning { body, .. } | Mode::Detail { body } => Some(body),
        }
    }

    /// Orbits only move while nothing is selected.
    pub(crate) fn motion_enabled(&self) -> bool {
        matches!(self.mode, Mode::Overview)
    }

    /// Interpolation fraction in [0, 1].
    pub(crate) fn progress(&self) -> f32 {
        match self.mode {
            Mode::Overview => 0.0,
            Mode::Transitioning { frames, .. } => {
                if self.settled(frames) {
                    1.0
                } else {
                    frames as f32 * self.step
                }
            }
            Mode::Detail { .. } => 1.0,
        }
    }

    fn settled(&self, frames: u32) -> bool {
        // tolerate float error so 50 steps of 0.02 land on 1
        frames as f32 * self.step >= 1.0 - 1e-5
    }

    /// Advance the transition by one frame.
    pub(crate) fn tick(self) -> Self {
        match self.mode {
            Mode::Transitioning { body, frames } => {
                let frames = frames.saturating_add(1);
                let mode = if self.settled(frames) {
                    info!("view: body {} expanded after {frames} frames", body.0);
                    Mode::Detail { body }
                } else {
                    Mode::Transitioning { body, frames }
                };
                Self { mode, ..self }
            }
            _ => self,
        }
    }

    pub(crate) fn apply(self, action: Action) -> Self {
        match action {
            Action::None => self,
            Action::ToggleSidebar => {
                log::debug!("view: sidebar {}", if self.sidebar_visible { "hidden" } else { "shown" });
                Self { sidebar_visible: !self.sidebar_visible, ..self }
            }
            Action::SelectBody(body) => match self.mode {
                Mode::Overview => {
                    info!("view: overview -> transitioning (body {})", body.0);
                    Self { mode: Mode::Transitioning { body, frames: 0 }, ..self }
                }
                _ => self,
            },
            Action::Dismiss => match self.mode {
                Mode::Overview => self,
                _ => {
                    info!("view: {:?} -> overview", self.mode);
                    Self { mode: Mode::Overview, ..self }
                }
            },
        }
    }
}

/// Linear size interpolation between the orbit and expanded renderings.
pub(crate) fn interpolate_size(base: f32, expanded: f32, progress: f32) -> f32 {
    base + (expanded - base) * progress
}

#[cfg(test)]
mod tests {
    use super::*;

    const EARTH: BodyId = BodyId(3);

    #[test]
    fn select_enters_transition_at_zero() {
        let v = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::SelectBody(EARTH));
        assert_eq!(v.mode(), Mode::Transitioning { body: EARTH, frames: 0 });
        assert_eq!(v.progress(), 0.0);
        assert_eq!(v.selected(), Some(EARTH));
        assert!(!v.motion_enabled());
    }

    #[test]
    fn exactly_fifty_frames_to_detail() {
        let mut v = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::SelectBody(EARTH));
        let mut last = v.progress();
        for i in 1..50 {
            v = v.tick();
            assert!(matches!(v.mode(), Mode::Transitioning { .. }), "settled early at {i}");
            let p = v.progress();
            assert!(p >= last && p < 1.0);
            last = p;
        }
        v = v.tick();
        assert_eq!(v.mode(), Mode::Detail { body: EARTH });
        assert_eq!(v.progress(), 1.0);
        // staying in detail keeps progress pinned
        assert_eq!(v.tick().progress(), 1.0);
    }

    #[test]
    fn dismiss_from_any_selected_state() {
        let base = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::SelectBody(EARTH));
        let mid = base.tick().tick();
        let mut detail = base;
        for _ in 0..60 {
            detail = detail.tick();
        }
        for v in [base, mid, detail] {
            let out = v.apply(Action::Dismiss);
            assert_eq!(out.mode(), Mode::Overview);
            assert_eq!(out.selected(), None);
            assert_eq!(out.progress(), 0.0);
            assert!(out.motion_enabled());
        }
    }

    #[test]
    fn toggle_in_detail_keeps_mode() {
        let mut v = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::SelectBody(EARTH));
        for _ in 0..50 {
            v = v.tick();
        }
        let t = v.apply(Action::ToggleSidebar);
        assert_eq!(t.mode(), v.mode());
        assert_eq!(t.selected(), Some(EARTH));
        assert!(!t.sidebar_visible());
    }

    #[test]
    fn select_is_ignored_outside_overview() {
        let v = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::SelectBody(EARTH)).tick();
        assert_eq!(v.apply(Action::SelectBody(BodyId(5))), v);
    }

    #[test]
    fn overview_tick_is_identity() {
        let v = ViewState::new(DEFAULT_EXPAND_STEP);
        assert_eq!(v.tick(), v);
    }

    #[test]
    fn size_interpolation_is_linear() {
        assert_eq!(interpolate_size(20.0, 624.0, 0.0), 20.0);
        assert_eq!(interpolate_size(20.0, 624.0, 1.0), 624.0);
        assert!((interpolate_size(20.0, 624.0, 0.5) - 322.0).abs() < 1e-4);
    }
}

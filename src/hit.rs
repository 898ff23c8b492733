use crate::catalog::BodyId;
use crate::draw::{Point, Rect};
use crate::view::{Action, Mode, ViewState};

pub(crate) const ROW_START: i32 = 80;
pub(crate) const ROW_SPACING: i32 = 60;
pub(crate) const ROW_HEIGHT: i32 = 50;
pub(crate) const ICON_SIZE: f32 = 40.0;
pub(crate) const SUN_SIZE: f32 = 90.0;

/// Fixed screen geometry, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Layout {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) sidebar_width: i32,
    pub(crate) toggle: Rect,
}

impl Layout {
    pub(crate) fn new(width: i32, height: i32, sidebar_width: i32) -> Self {
        Self {
            width,
            height,
            sidebar_width,
            toggle: Rect::new(10, 10, 50, 40),
        }
    }

    pub(crate) fn center(&self) -> Point {
        Point::new((self.width / 2) as f32, (self.height / 2) as f32)
    }

    /// Text baseline of sidebar row `i`.
    pub(crate) fn row_anchor(&self, i: usize) -> i32 {
        ROW_START + i as i32 * ROW_SPACING
    }

    /// Clickable band of sidebar row `i`; the highlight uses the same box.
    pub(crate) fn row_rect(&self, i: usize) -> Rect {
        Rect::new(10, self.row_anchor(i) - 10, self.sidebar_width - 20, ROW_HEIGHT)
    }

    pub(crate) fn row_at(&self, x: i32, y: i32, rows: usize) -> Option<usize> {
        (0..rows).find(|&i| self.row_rect(i).contains(x, y))
    }

    pub(crate) fn sidebar_rect(&self) -> Rect {
        Rect::new(0, 0, self.sidebar_width, self.height)
    }

    pub(crate) fn detail_panel_rect(&self) -> Rect {
        Rect::new(self.width - self.sidebar_width, 0, self.sidebar_width, self.height)
    }

    /// Square edge of the fully expanded body.
    pub(crate) fn expanded_size(&self) -> f32 {
        (self.height * 4 / 5) as f32
    }
}

/// Maps one frame's click to an action. Rules are checked in priority order
/// and the first match wins.
pub(crate) fn hit_test(
    pointer: (i32, i32),
    clicked: bool,
    view: &ViewState,
    layout: &Layout,
    rows: usize,
) -> Action {
    if !clicked {
        return Action::None;
    }
    let (x, y) = pointer;
    if layout.toggle.contains(x, y) {
        return Action::ToggleSidebar;
    }
    if !matches!(view.mode(), Mode::Overview) {
        return Action::Dismiss;
    }
    if view.sidebar_visible() {
        if let Some(i) = layout.row_at(x, y, rows) {
            return Action::SelectBody(BodyId(i));
        }
    }
    Action::None
}

/// Row under the pointer, highlighted while browsing the overview.
pub(crate) fn hover_row(pointer: (i32, i32), view: &ViewState, layout: &Layout, rows: usize) -> Option<BodyId> {
    if !matches!(view.mode(), Mode::Overview) || !view.sidebar_visible() {
        return None;
    }
    if layout.toggle.contains(pointer.0, pointer.1) {
        return None;
    }
    layout.row_at(pointer.0, pointer.1, rows).map(BodyId)
}

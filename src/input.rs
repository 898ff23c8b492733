use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Click { col: u16, row: u16 },
    Move { col: u16, row: u16 },
    Quit,
}

/// Everything drained from the event queue during one frame, in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameEvents {
    /// last known pointer cell
    pub(crate) pointer: Option<(u16, u16)>,
    /// first click of the frame; later ones are dropped
    pub(crate) click: Option<(u16, u16)>,
    pub(crate) quit: bool,
}

impl FrameEvents {
    pub(crate) fn push(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Click { col, row } => {
                if self.click.is_none() {
                    self.click = Some((col, row));
                }
                self.pointer = Some((col, row));
            }
            InputEvent::Move { col, row } => self.pointer = Some((col, row)),
            InputEvent::Quit => self.quit = true,
        }
    }
}

pub(crate) fn map_event(ev: &Event) -> Option<InputEvent> {
    match ev {
        Event::Mouse(m) => match m.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click { col: m.column, row: m.row }),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                Some(InputEvent::Move { col: m.column, row: m.row })
            }
            _ => None,
        },
        Event::Key(KeyEvent { code, modifiers, kind, .. }) => {
            if *kind != KeyEventKind::Press {
                return None;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Quit),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Drains pending terminal events without blocking the frame.
pub(crate) fn collect_nonblocking(max_frame_time: Duration) -> anyhow::Result<FrameEvents> {
    let mut out = FrameEvents::default();
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    let mut n = 0;
    while event::poll(timeout)? {
        let ev = event::read()?;
        if let Some(e) = map_event(&ev) {
            out.push(e);
        }
        n += 1;
        if n >= 64 {
            break;
        }
    }
    Ok(out)
}

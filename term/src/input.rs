//! Keyboard and mouse input from the terminal.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use kioku_core::{Coord2, InputEvent, InputSource};

use crate::render::BoardLayout;

/// Polls crossterm without blocking and maps its events onto board input.
///
/// Arrow keys move a cursor that is reported as hover, so the keyboard can play the
/// same way the mouse does.
pub struct TerminalInput {
    layout: BoardLayout,
    cursor: Coord2,
    resized: bool,
    error: Option<io::Error>,
}

impl TerminalInput {
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            cursor: (0, 0),
            resized: false,
            error: None,
        }
    }

    /// Surfaces the first read error since the last call.
    pub fn take_error(&mut self) -> io::Result<()> {
        self.error.take().map_or(Ok(()), Err)
    }

    /// Whether the terminal was resized since the last call.
    pub fn take_resized(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    pub fn map_event(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) => self.map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse),
            Event::Resize(..) => {
                self.resized = true;
                None
            }
            _ => None,
        }
    }

    fn map_key(&mut self, key: KeyEvent) -> Option<InputEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let (width, height) = self.layout.size();
        let (x, y) = self.cursor;
        let moved = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(InputEvent::Quit);
            }
            KeyCode::Char('q') | KeyCode::Esc => return Some(InputEvent::Quit),
            KeyCode::Char('h') => return Some(InputEvent::RequestHint),
            KeyCode::Char('r') => return Some(InputEvent::Restart),
            KeyCode::Enter | KeyCode::Char(' ') => return Some(InputEvent::Select(self.cursor)),
            KeyCode::Left => (x.saturating_sub(1), y),
            KeyCode::Right => (x.saturating_add(1).min(width.saturating_sub(1)), y),
            KeyCode::Up => (x, y.saturating_sub(1)),
            KeyCode::Down => (x, y.saturating_add(1).min(height.saturating_sub(1))),
            _ => return None,
        };
        self.cursor = moved;
        Some(InputEvent::Hover(Some(moved)))
    }

    fn map_mouse(&mut self, mouse: MouseEvent) -> Option<InputEvent> {
        let cell = self.layout.cell_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let coords = cell?;
                self.cursor = coords;
                Some(InputEvent::Select(coords))
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(InputEvent::Hover(cell)),
            _ => None,
        }
    }

    fn record(&mut self, err: io::Error) {
        self.error.get_or_insert(err);
    }
}

impl InputSource for TerminalInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(err) => {
                    self.record(err);
                    return None;
                }
            }
            match event::read() {
                Ok(event) => {
                    if let Some(input) = self.map_event(event) {
                        return Some(input);
                    }
                }
                Err(err) => {
                    self.record(err);
                    return None;
                }
            }
        }
    }
}

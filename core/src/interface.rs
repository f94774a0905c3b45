use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a single cell shows this frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellContent {
    Covered,
    Icon(Icon),
    /// Mid-slide, `cover` goes from `0.0` (face-up) to `1.0` (covered)
    Sliding { icon: Icon, cover: f32 },
}

impl CellContent {
    /// Chooses the content for a cover fraction, snapping the ends.
    pub fn with_cover(icon: Icon, cover: f32) -> Self {
        if cover >= 1.0 {
            Self::Covered
        } else if cover <= 0.0 {
            Self::Icon(icon)
        } else {
            Self::Sliding { icon, cover }
        }
    }

    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    #[default]
    Normal,
    Flash,
}

/// Numbers shown next to the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: Points,
    pub streak: u32,
    pub round: u32,
    pub pairs_left: CellCount,
    pub hint_available: bool,
}

/// Drawing surface, called once per frame with the whole board.
pub trait Renderer {
    fn begin_frame(&mut self, _backdrop: Backdrop) {}

    fn draw_cell(&mut self, coords: Coord2, content: CellContent);

    fn draw_highlight(&mut self, coords: Coord2);

    fn draw_score_hud(&mut self, hud: Hud);

    fn end_frame(&mut self) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Select(Coord2),
    /// Pointer moved over a cell, or off the board
    Hover(Option<Coord2>),
    RequestHint,
    Restart,
    Quit,
}

/// Events are polled until `None` once per frame.
pub trait InputSource {
    fn next_event(&mut self) -> Option<InputEvent>;
}

impl InputSource for VecDeque<InputEvent> {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

impl<S: InputSource + ?Sized> InputSource for &mut S {
    fn next_event(&mut self) -> Option<InputEvent> {
        (**self).next_event()
    }
}

/// Emitted for the application around the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    RoundStarted { round: u32 },
    RoundWon { final_score: Points, round: u32 },
}

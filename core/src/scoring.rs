use serde::{Deserialize, Serialize};

use crate::Points;

const BASE_POINTS: Points = 1;

/// Points for a match that brought the streak to `streak`: 1, 2, 4, 8, ...
///
/// A streak of zero earns nothing, huge streaks saturate.
pub fn award(streak: u32) -> Points {
    match streak {
        0 => 0,
        n => BASE_POINTS.checked_shl(n - 1).unwrap_or(Points::MAX),
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    score: Points,
    streak: u32,
}

impl ScoreState {
    pub const fn new() -> Self {
        Self {
            score: 0,
            streak: 0,
        }
    }

    /// Keeps the score but starts a new streak.
    pub const fn carried(self) -> Self {
        Self {
            score: self.score,
            streak: 0,
        }
    }

    pub const fn score(&self) -> Points {
        self.score
    }

    pub const fn streak(&self) -> u32 {
        self.streak
    }

    /// Extends the streak and adds its award, returns the points earned.
    pub fn record_match(&mut self) -> Points {
        self.streak = self.streak.saturating_add(1);
        let earned = award(self.streak);
        self.score = self.score.saturating_add(earned);
        earned
    }

    pub fn record_mismatch(&mut self) {
        self.streak = 0;
    }
}

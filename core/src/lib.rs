#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use animation::*;
pub use board::*;
pub use error::*;
pub use generator::*;
pub use hint::*;
pub use icon::*;
pub use interface::*;
pub use reveal::*;
pub use round::*;
pub use scoring::*;
pub use session::*;
pub use types::*;

mod animation;
mod board;
mod error;
mod generator;
mod hint;
mod icon;
mod interface;
mod reveal;
mod round;
mod scoring;
mod session;
mod types;

/// Whether the running score survives into the next round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScorePolicy {
    #[default]
    ResetEachRound,
    CarryOver,
}

/// Animation timings in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub reveal_ms: u32,
    pub cover_ms: u32,
    pub mismatch_hold_ms: u32,
    pub win_flash_ms: u32,
    pub win_flash_count: u8,
    pub win_rest_ms: u32,
    pub round_pause_ms: u32,
    pub hint_on_ms: u32,
    pub hint_off_ms: u32,
    pub hint_flash_count: u8,
    pub preview_group_size: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_ms: 267,
            cover_ms: 267,
            mismatch_hold_ms: 1000,
            win_flash_ms: 200,
            win_flash_count: 12,
            win_rest_ms: 1500,
            round_pause_ms: 1200,
            hint_on_ms: 150,
            hint_off_ms: 100,
            hint_flash_count: 4,
            preview_group_size: 8,
        }
    }
}

impl TimingConfig {
    /// Every animation takes a single frame, handy for driving a session in tests.
    pub const fn instant() -> Self {
        Self {
            reveal_ms: 0,
            cover_ms: 0,
            mismatch_hold_ms: 0,
            win_flash_ms: 0,
            win_flash_count: 1,
            win_rest_ms: 0,
            round_pause_ms: 0,
            hint_on_ms: 0,
            hint_off_ms: 0,
            hint_flash_count: 1,
            preview_group_size: 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: Coord2,
    pub pool: IconPool,
    pub timing: TimingConfig,
    pub score_policy: ScorePolicy,
    /// Flash the board in groups when a round starts.
    pub preview: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: (10, 10),
            pool: IconPool::default(),
            timing: TimingConfig::default(),
            score_policy: ScorePolicy::default(),
            preview: true,
        }
    }
}

impl GameConfig {
    pub fn new(size: Coord2) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn pair_count(&self) -> CellCount {
        self.total_cells() / 2
    }

    /// Checks the board can be filled with whole pairs of distinct icons.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        let total = check_cell_count(self.size)?;
        let needed = usize::from(total / 2);
        let available = self.pool.capacity();
        if available < needed {
            return Err(ConfigError::InsufficientIcons { needed, available });
        }
        Ok(())
    }
}

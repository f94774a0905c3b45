use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Cover slides off the cells
    RevealIn,
    /// Cells stay face-up
    Hold,
    /// Cover slides back over the cells
    CoverOut,
    /// Backdrop is lit
    WinFlourish,
    /// Cells are highlighted
    HintFlash,
    /// Nothing moves
    Pause,
}

/// One timed phase over a set of cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub phase: Phase,
    pub cells: Vec<Coord2>,
    pub duration_ms: u32,
}

impl Step {
    pub fn new(phase: Phase, cells: impl Into<Vec<Coord2>>, duration_ms: u32) -> Self {
        Self {
            phase,
            cells: cells.into(),
            duration_ms,
        }
    }
}

/// Completion handle returned when a sequence is queued.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceId(u32);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct QueuedStep {
    id: SequenceId,
    step: Step,
    last: bool,
}

/// Runs timed visual phases one after another, advanced by frame ticks.
///
/// The board counts as locked while anything is queued. Only the front step advances on
/// a tick and time left over after it finishes is dropped, so every step is visible for
/// at least one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationSequencer {
    queue: VecDeque<QueuedStep>,
    elapsed_ms: u32,
    next_id: u32,
}

impl AnimationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(
        &mut self,
        phase: Phase,
        cells: impl Into<Vec<Coord2>>,
        duration_ms: u32,
    ) -> SequenceId {
        self.run_sequence([Step::new(phase, cells, duration_ms)])
    }

    /// Queues steps that complete together under one id. An empty list still takes a frame.
    pub fn run_sequence(&mut self, steps: impl IntoIterator<Item = Step>) -> SequenceId {
        let id = SequenceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let start = self.queue.len();
        self.queue.extend(steps.into_iter().map(|step| QueuedStep {
            id,
            step,
            last: false,
        }));
        if self.queue.len() == start {
            self.queue.push_back(QueuedStep {
                id,
                step: Step::new(Phase::Pause, Vec::new(), 0),
                last: true,
            });
        } else if let Some(queued) = self.queue.back_mut() {
            queued.last = true;
        }
        log::trace!("Queued sequence {:?}, {} steps pending", id, self.queue.len());
        id
    }

    pub fn is_locked(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Whether `id` still has steps waiting.
    pub fn is_running(&self, id: SequenceId) -> bool {
        self.queue.iter().any(|queued| queued.id == id)
    }

    /// Advances the front step, returns the sequence it completed, if any.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<SequenceId> {
        let front = self.queue.front()?;
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < front.step.duration_ms {
            return None;
        }

        self.elapsed_ms = 0;
        let finished = self.queue.pop_front()?;
        log::trace!("Finished {:?} step of {:?}", finished.step.phase, finished.id);
        finished.last.then_some(finished.id)
    }

    /// Drops every queued step, which releases the lock.
    pub fn clear(&mut self) {
        if self.is_locked() {
            log::debug!("Abandoning {} animation steps", self.queue.len());
        }
        self.queue.clear();
        self.elapsed_ms = 0;
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            current: self.queue.front().map(|queued| (&queued.step, self.elapsed_ms)),
        }
    }
}

/// What the current step wants drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    current: Option<(&'a Step, u32)>,
}

impl Frame<'_> {
    pub fn phase(&self) -> Option<Phase> {
        self.current.map(|(step, _)| step.phase)
    }

    pub fn cells(&self) -> &[Coord2] {
        match self.current {
            Some((step, _)) => &step.cells,
            None => &[],
        }
    }

    /// Fraction of the current step already played, zero-length steps count as done.
    pub fn progress(&self) -> f32 {
        match self.current {
            None => 1.0,
            Some((step, _)) if step.duration_ms == 0 => 1.0,
            Some((step, elapsed)) => (elapsed as f32 / step.duration_ms as f32).min(1.0),
        }
    }

    /// How much of the cell is covered, `0.0` face-up to `1.0` covered, when this frame
    /// overrides it.
    pub fn cover_at(&self, coords: Coord2) -> Option<f32> {
        if !self.cells().contains(&coords) {
            return None;
        }
        match self.phase()? {
            Phase::RevealIn => Some(1.0 - self.progress()),
            Phase::Hold => Some(0.0),
            Phase::CoverOut => Some(self.progress()),
            Phase::WinFlourish | Phase::HintFlash | Phase::Pause => None,
        }
    }

    pub fn highlights(&self) -> &[Coord2] {
        match self.phase() {
            Some(Phase::HintFlash) => self.cells(),
            _ => &[],
        }
    }

    pub fn backdrop(&self) -> Backdrop {
        match self.phase() {
            Some(Phase::WinFlourish) => Backdrop::Flash,
            _ => Backdrop::Normal,
        }
    }
}

/// Second tile slides open, the turn settles once it is up.
pub fn match_steps(timing: &TimingConfig, second: Coord2) -> Vec<Step> {
    alloc::vec![Step::new(Phase::RevealIn, [second], timing.reveal_ms)]
}

/// Second tile slides open, both stay up for a moment, then both are covered again.
pub fn mismatch_steps(timing: &TimingConfig, cells: [Coord2; 2]) -> Vec<Step> {
    alloc::vec![
        Step::new(Phase::RevealIn, [cells[1]], timing.reveal_ms),
        Step::new(Phase::Hold, cells, timing.mismatch_hold_ms),
        Step::new(Phase::CoverOut, cells, timing.cover_ms),
    ]
}

/// Highlight blinks on both tiles of the hinted pair.
pub fn hint_steps(timing: &TimingConfig, pair: (Coord2, Coord2)) -> Vec<Step> {
    (0..timing.hint_flash_count)
        .flat_map(|_| {
            [
                Step::new(Phase::HintFlash, [pair.0, pair.1], timing.hint_on_ms),
                Step::new(Phase::Pause, Vec::new(), timing.hint_off_ms),
            ]
        })
        .collect()
}

/// Backdrop alternates plain and lit, starting plain, then the finished board rests.
pub fn win_steps(timing: &TimingConfig) -> Vec<Step> {
    (0..timing.win_flash_count)
        .map(|flip| {
            let phase = if flip % 2 == 0 {
                Phase::Pause
            } else {
                Phase::WinFlourish
            };
            Step::new(phase, Vec::new(), timing.win_flash_ms)
        })
        .chain([Step::new(Phase::Pause, Vec::new(), timing.win_rest_ms)])
        .collect()
}

/// Each group of cells briefly flips open and closed, one group after another.
pub fn preview_steps(timing: &TimingConfig, groups: &[Vec<Coord2>]) -> Vec<Step> {
    groups
        .iter()
        .flat_map(|group| {
            [
                Step::new(Phase::RevealIn, group.clone(), timing.reveal_ms),
                Step::new(Phase::CoverOut, group.clone(), timing.cover_ms),
            ]
        })
        .collect()
}

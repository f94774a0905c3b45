use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::*;

/// What the frontend loop should do after a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Work owed to the round once a sequence finishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FollowUp {
    Settle,
    NextRound,
}

/// Owns the current round and everything the frame loop needs to drive it.
///
/// Input is only applied when no animation holds the board, and at most one turn
/// transition happens per tick. Won rounds are replaced in place once the win sequence
/// finishes, restarting does the same without waiting.
#[derive(Debug)]
pub struct GameSession<R> {
    config: GameConfig,
    rng: R,
    round: GameRound,
    round_number: u32,
    sequencer: AnimationSequencer,
    follow_up: Option<(SequenceId, FollowUp)>,
    hover: Option<Coord2>,
    notifications: Vec<Notification>,
}

impl<R: Rng> GameSession<R> {
    /// Starts the first round, fails when `config` cannot produce a board.
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self> {
        let round = GameRound::generate(&config, &mut rng, ScoreState::new())?;
        Self::from_round(config, rng, round)
    }

    /// Starts from an already dealt round, later rounds are generated from `config`.
    ///
    /// Fails when `config` could not deal those later rounds.
    pub fn from_round(config: GameConfig, rng: R, round: GameRound) -> Result<Self> {
        config.validate()?;
        let mut session = Self {
            config,
            rng,
            round,
            round_number: 1,
            sequencer: AnimationSequencer::new(),
            follow_up: None,
            hover: None,
            notifications: Vec::new(),
        };
        session.begin_round(false);
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> &GameRound {
        &self.round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }

    pub fn is_locked(&self) -> bool {
        self.sequencer.is_locked()
    }

    pub fn hover(&self) -> Option<Coord2> {
        self.hover
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        core::mem::take(&mut self.notifications)
    }

    /// Picks a tile, ignored while the board is locked.
    pub fn select(&mut self, coords: Coord2) -> SelectOutcome {
        if self.is_locked() {
            log::trace!("Board locked, dropping selection of {:?}", coords);
            return SelectOutcome::Ignored;
        }

        let outcome = self.round.select(coords);
        let timing = self.config.timing;
        match outcome {
            SelectOutcome::Ignored => {}
            SelectOutcome::FirstPick(first) => {
                self.sequencer.run(Phase::RevealIn, [first], timing.reveal_ms);
            }
            SelectOutcome::Matched { cells, .. } => {
                let id = self.sequencer.run_sequence(match_steps(&timing, cells[1]));
                self.follow_up = Some((id, FollowUp::Settle));
            }
            SelectOutcome::Mismatched { cells } => {
                let id = self.sequencer.run_sequence(mismatch_steps(&timing, cells));
                self.follow_up = Some((id, FollowUp::Settle));
            }
        }
        outcome
    }

    /// Flashes the pending tile together with its partner.
    pub fn request_hint(&mut self) -> Result<(Coord2, Coord2)> {
        if self.is_locked() {
            return Err(HintRejection::Locked.into());
        }
        let pair = self.round.hint()?;
        self.sequencer.run_sequence(hint_steps(&self.config.timing, pair));
        log::debug!("Hint for {:?} points at {:?}", pair.0, pair.1);
        Ok(pair)
    }

    /// Throws away the round and any running animation and deals a new board.
    pub fn restart(&mut self) -> Result<()> {
        log::debug!("Restarting round {}", self.round_number);
        self.sequencer.clear();
        self.follow_up = None;
        self.round = GameRound::generate(&self.config, &mut self.rng, ScoreState::new())?;
        self.round_number = self.round_number.wrapping_add(1);
        self.begin_round(false);
        Ok(())
    }

    /// Runs one frame: animation, then input, then drawing.
    pub fn tick<I, D>(&mut self, elapsed_ms: u32, input: &mut I, renderer: &mut D) -> Result<Flow>
    where
        I: InputSource + ?Sized,
        D: Renderer + ?Sized,
    {
        let mut transitioned = self.advance(elapsed_ms)?;

        while let Some(event) = input.next_event() {
            match event {
                InputEvent::Quit => {
                    log::debug!("Quit requested");
                    return Ok(Flow::Quit);
                }
                InputEvent::Restart => {
                    self.restart()?;
                    transitioned = true;
                }
                InputEvent::Hover(coords) => {
                    self.hover = coords.filter(|&coords| self.round.board().contains(coords));
                }
                InputEvent::Select(_) | InputEvent::RequestHint if transitioned => {
                    log::trace!("Dropping {:?}, round already moved this frame", event);
                }
                InputEvent::Select(coords) => {
                    transitioned = self.select(coords).has_update();
                }
                InputEvent::RequestHint => {
                    if let Err(err) = self.request_hint() {
                        log::warn!("{}", err);
                    }
                }
            }
        }

        self.render(renderer);
        Ok(Flow::Continue)
    }

    /// Draws the current round with whatever the running animation overrides.
    pub fn render<D: Renderer + ?Sized>(&self, renderer: &mut D) {
        let frame = self.sequencer.frame();
        renderer.begin_frame(frame.backdrop());

        for (coords, icon) in self.round.board().iter() {
            let content = match frame.cover_at(coords) {
                Some(cover) => CellContent::with_cover(icon, cover),
                None if self.round.is_face_up(coords) => CellContent::Icon(icon),
                None => CellContent::Covered,
            };
            renderer.draw_cell(coords, content);
        }

        for &coords in frame.highlights() {
            renderer.draw_highlight(coords);
        }
        if let Some(coords) = self.hover {
            if !self.is_locked() && !self.round.is_face_up(coords) {
                renderer.draw_highlight(coords);
            }
        }

        renderer.draw_score_hud(Hud {
            score: self.round.score(),
            streak: self.round.streak(),
            round: self.round_number,
            pairs_left: self.round.pairs_left(),
            hint_available: !self.is_locked() && self.round.pending().is_some(),
        });
        renderer.end_frame();
    }

    /// Advances the sequencer and applies what a finished sequence owes the round.
    fn advance(&mut self, elapsed_ms: u32) -> Result<bool> {
        let Some(done) = self.sequencer.tick(elapsed_ms) else {
            return Ok(false);
        };
        let Some((id, follow_up)) = self.follow_up else {
            return Ok(false);
        };
        if id != done {
            return Ok(false);
        }
        self.follow_up = None;

        match follow_up {
            FollowUp::Settle => {
                if self.round.settle().is_won() {
                    self.notifications.push(Notification::RoundWon {
                        final_score: self.round.score(),
                        round: self.round_number,
                    });
                    let id = self.sequencer.run_sequence(win_steps(&self.config.timing));
                    self.follow_up = Some((id, FollowUp::NextRound));
                }
            }
            FollowUp::NextRound => self.next_round()?,
        }
        Ok(true)
    }

    fn next_round(&mut self) -> Result<()> {
        let score = match self.config.score_policy {
            ScorePolicy::ResetEachRound => ScoreState::new(),
            ScorePolicy::CarryOver => self.round.score_state().carried(),
        };
        self.round = GameRound::generate(&self.config, &mut self.rng, score)?;
        self.round_number = self.round_number.wrapping_add(1);
        self.begin_round(true);
        Ok(())
    }

    /// Announces the round and queues its intro, which locks input like any animation.
    fn begin_round(&mut self, after_win: bool) {
        log::debug!(
            "Round {} started on a {}x{} board",
            self.round_number,
            self.round.size().0,
            self.round.size().1
        );
        self.notifications.push(Notification::RoundStarted {
            round: self.round_number,
        });

        let timing = self.config.timing;
        let mut steps = Vec::new();
        if after_win {
            steps.push(Step::new(Phase::Pause, Vec::new(), timing.round_pause_ms));
        }
        if self.config.preview {
            let mut cells: Vec<Coord2> = iter_cells(self.round.size()).collect();
            cells.shuffle(&mut self.rng);
            let groups: Vec<Vec<Coord2>> = cells
                .chunks(usize::from(timing.preview_group_size.max(1)))
                .map(<[Coord2]>::to_vec)
                .collect();
            steps.extend(preview_steps(&timing, &groups));
        }
        if !steps.is_empty() {
            self.sequencer.run_sequence(steps);
        }
    }
}

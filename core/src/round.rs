use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> OnePending
/// - OnePending -> Resolving
/// - Resolving -> Idle
/// - Resolving -> Won
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the first tile of a turn
    #[default]
    Idle,
    /// One tile is face-up, waiting for its partner
    OnePending(Coord2),
    /// Two tiles were compared and their animation is in flight
    Resolving { cells: [Coord2; 2], matched: bool },
    /// Every cell is revealed
    Won,
}

impl TurnPhase {
    pub const fn accepts_selection(self) -> bool {
        matches!(self, Self::Idle | Self::OnePending(_))
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Tiles picked in the current turn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Empty,
    One(Coord2),
    Two(Coord2, Coord2),
}

impl Selection {
    pub fn contains(self, coords: Coord2) -> bool {
        match self {
            Self::Empty => false,
            Self::One(first) => first == coords,
            Self::Two(first, second) => first == coords || second == coords,
        }
    }

    pub const fn first(self) -> Option<Coord2> {
        match self {
            Self::One(first) | Self::Two(first, _) => Some(first),
            Self::Empty => None,
        }
    }
}

/// Outcome of selecting a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Selection was not allowed, nothing changed
    Ignored,
    /// First tile of the turn is now face-up
    FirstPick(Coord2),
    /// Both tiles share an icon and are now revealed for good
    Matched {
        cells: [Coord2; 2],
        points: Points,
        clears_board: bool,
    },
    /// Icons differ, both tiles go back under cover
    Mismatched { cells: [Coord2; 2] },
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the round
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// One playthrough from a freshly dealt board to a win or a restart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRound {
    board: Board,
    reveal: RevealState,
    selection: Selection,
    score: ScoreState,
    phase: TurnPhase,
    turns: u32,
}

impl GameRound {
    pub fn new(board: Board, score: ScoreState) -> Self {
        let reveal = RevealState::new(board.size());
        Self {
            board,
            reveal,
            selection: Selection::Empty,
            score,
            phase: TurnPhase::Idle,
            turns: 0,
        }
    }

    /// Deals a new board for `config` and starts from `score`.
    pub fn generate<R: Rng + ?Sized>(
        config: &GameConfig,
        rng: &mut R,
        score: ScoreState,
    ) -> Result<Self> {
        Ok(Self::new(generate_board(config, rng)?, score))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn reveal_state(&self) -> &RevealState {
        &self.reveal
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn score_state(&self) -> ScoreState {
        self.score
    }

    pub fn score(&self) -> Points {
        self.score.score()
    }

    pub fn streak(&self) -> u32 {
        self.score.streak()
    }

    /// Resolved turns so far, matches and mismatches alike.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn pairs_left(&self) -> CellCount {
        (self.board.total_cells() - self.reveal.revealed_count()) / 2
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.reveal.is_revealed(coords)
    }

    /// Whether the tile currently shows its icon, either matched or picked this turn.
    pub fn is_face_up(&self, coords: Coord2) -> bool {
        self.reveal.is_revealed(coords) || self.selection.contains(coords)
    }

    /// First tile of the turn while its partner has not been picked.
    pub fn pending(&self) -> Option<Coord2> {
        match self.phase {
            TurnPhase::OnePending(first) => Some(first),
            _ => None,
        }
    }

    pub fn select(&mut self, coords: Coord2) -> SelectOutcome {
        if !self.board.contains(coords) || self.reveal.is_revealed(coords) {
            log::trace!("Ignoring selection of {:?}", coords);
            return SelectOutcome::Ignored;
        }

        match self.phase {
            TurnPhase::Idle => {
                self.selection = Selection::One(coords);
                self.phase = TurnPhase::OnePending(coords);
                log::trace!("First pick at {:?}", coords);
                SelectOutcome::FirstPick(coords)
            }
            TurnPhase::OnePending(first) if first == coords => {
                log::trace!("Ignoring repeated pick of {:?}", coords);
                SelectOutcome::Ignored
            }
            TurnPhase::OnePending(first) => self.resolve(first, coords),
            TurnPhase::Resolving { .. } | TurnPhase::Won => SelectOutcome::Ignored,
        }
    }

    /// Compares the two picks and commits the result right away, animations only follow.
    fn resolve(&mut self, first: Coord2, second: Coord2) -> SelectOutcome {
        let cells = [first, second];
        self.selection = Selection::Two(first, second);
        self.turns = self.turns.saturating_add(1);

        if self.board[first] == self.board[second] {
            self.reveal.reveal(first);
            self.reveal.reveal(second);
            let points = self.score.record_match();
            let clears_board = self.reveal.all_revealed();
            self.phase = TurnPhase::Resolving {
                cells,
                matched: true,
            };
            log::debug!(
                "Matched {:?} and {:?} for {} points, streak {}",
                first,
                second,
                points,
                self.score.streak()
            );
            SelectOutcome::Matched {
                cells,
                points,
                clears_board,
            }
        } else {
            self.score.record_mismatch();
            self.phase = TurnPhase::Resolving {
                cells,
                matched: false,
            };
            log::debug!("Mismatch between {:?} and {:?}", first, second);
            SelectOutcome::Mismatched { cells }
        }
    }

    /// Ends the resolving turn, the round is won once every cell is revealed.
    pub fn settle(&mut self) -> TurnPhase {
        if let TurnPhase::Resolving { .. } = self.phase {
            self.selection = Selection::Empty;
            self.phase = if self.reveal.all_revealed() {
                log::debug!("Round won with score {}", self.score.score());
                TurnPhase::Won
            } else {
                TurnPhase::Idle
            };
        }
        self.phase
    }

    /// Pending tile and the covered tile that matches it.
    pub fn hint(&self) -> Result<(Coord2, Coord2)> {
        let from = self.pending().ok_or(HintRejection::NoPendingSelection)?;
        let partner =
            find_pair(&self.board, &self.reveal, from)?.ok_or(HintRejection::NoCoveredPartner)?;
        Ok((from, partner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Icon = Icon::new(Shape::Diamond, Color::Cyan);
    const B: Icon = Icon::new(Shape::Triangle, Color::Gold);

    /// ```text
    /// A B
    /// A B
    /// ```
    fn round() -> GameRound {
        let board = Board::from_columns(&[[A, A], [B, B]]).unwrap();
        GameRound::new(board, ScoreState::new())
    }

    #[test]
    fn matching_pairs_score_and_win() {
        let mut round = round();

        assert_eq!(round.select((0, 0)), SelectOutcome::FirstPick((0, 0)));
        assert_eq!(round.phase(), TurnPhase::OnePending((0, 0)));
        assert_eq!(
            round.select((0, 1)),
            SelectOutcome::Matched {
                cells: [(0, 0), (0, 1)],
                points: 1,
                clears_board: false
            }
        );
        assert!(round.is_revealed((0, 0)) && round.is_revealed((0, 1)));
        assert_eq!(round.settle(), TurnPhase::Idle);
        assert_eq!((round.score(), round.streak()), (1, 1));

        round.select((1, 0));
        let outcome = round.select((1, 1));
        assert!(matches!(outcome, SelectOutcome::Matched { points: 2, clears_board: true, .. }));
        assert_eq!(round.settle(), TurnPhase::Won);
        assert_eq!((round.score(), round.streak()), (3, 2));
        assert_eq!(round.turns(), 2);
        assert_eq!(round.pairs_left(), 0);
    }

    #[test]
    fn mismatch_recovers_both_tiles() {
        let mut round = round();
        round.select((0, 0));
        assert_eq!(
            round.select((1, 0)),
            SelectOutcome::Mismatched {
                cells: [(0, 0), (1, 0)]
            }
        );
        assert!(round.is_face_up((0, 0)) && round.is_face_up((1, 0)));
        assert!(!round.is_revealed((0, 0)) && !round.is_revealed((1, 0)));

        assert_eq!(round.settle(), TurnPhase::Idle);
        assert!(!round.is_face_up((0, 0)) && !round.is_face_up((1, 0)));
        assert_eq!(round.selection(), Selection::Empty);
        assert_eq!(round.streak(), 0);
        assert_eq!(round.turns(), 1);
    }

    #[test]
    fn mismatch_breaks_streak_but_keeps_score() {
        const C: Icon = Icon::new(Shape::Lines, Color::Pink);
        let board = Board::from_columns(&[[A], [B], [A], [C], [B], [C]]).unwrap();
        let mut round = GameRound::new(board, ScoreState::new());

        round.select((0, 0));
        round.select((2, 0));
        round.settle();
        assert_eq!((round.score(), round.streak()), (1, 1));

        round.select((1, 0));
        round.select((3, 0));
        round.settle();
        assert_eq!((round.score(), round.streak()), (1, 0));
        assert!(round.is_revealed((0, 0)) && round.is_revealed((2, 0)));
    }

    #[test]
    fn invalid_selections_are_ignored() {
        let mut round = round();

        assert_eq!(round.select((2, 0)), SelectOutcome::Ignored);

        round.select((0, 0));
        assert_eq!(round.select((0, 0)), SelectOutcome::Ignored);
        assert_eq!(round.phase(), TurnPhase::OnePending((0, 0)));

        round.select((0, 1));
        assert_eq!(round.select((1, 0)), SelectOutcome::Ignored);
        round.settle();

        assert_eq!(round.select((0, 1)), SelectOutcome::Ignored);
        assert_eq!(round.phase(), TurnPhase::Idle);
    }

    #[test]
    fn final_pair_still_needs_two_picks() {
        let mut round = round();
        round.select((0, 0));
        round.select((0, 1));
        round.settle();

        assert_eq!(round.select((1, 1)), SelectOutcome::FirstPick((1, 1)));
        assert_eq!(round.phase(), TurnPhase::OnePending((1, 1)));
    }

    #[test]
    fn hint_requires_pending_tile() {
        let mut round = round();
        let before = round.clone();

        assert_eq!(
            round.hint(),
            Err(GameError::InvalidHintRequest(HintRejection::NoPendingSelection))
        );
        assert_eq!(round, before);

        round.select((1, 1));
        assert_eq!(round.hint(), Ok(((1, 1), (1, 0))));
    }

    #[test]
    fn hint_reports_missing_partner() {
        let mut round = round();
        round.select((1, 1));
        round.reveal.reveal((1, 0));

        assert_eq!(
            round.hint(),
            Err(GameError::InvalidHintRequest(HintRejection::NoCoveredPartner))
        );
    }
}

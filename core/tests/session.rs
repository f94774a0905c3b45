use std::collections::{HashMap, VecDeque};

use kioku_core::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const A: Icon = Icon::new(Shape::Donut, Color::Red);
const B: Icon = Icon::new(Shape::Ball, Color::Lime);

#[derive(Default)]
struct RecordingRenderer {
    cells: HashMap<Coord2, CellContent>,
    highlights: Vec<Coord2>,
    hud: Hud,
    backdrop: Backdrop,
    frames: usize,
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, backdrop: Backdrop) {
        self.cells.clear();
        self.highlights.clear();
        self.backdrop = backdrop;
    }

    fn draw_cell(&mut self, coords: Coord2, content: CellContent) {
        self.cells.insert(coords, content);
    }

    fn draw_highlight(&mut self, coords: Coord2) {
        self.highlights.push(coords);
    }

    fn draw_score_hud(&mut self, hud: Hud) {
        self.hud = hud;
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

struct Harness {
    session: GameSession<SmallRng>,
    renderer: RecordingRenderer,
}

impl Harness {
    /// ```text
    /// A B
    /// A B
    /// ```
    fn two_by_two(timing: TimingConfig) -> Self {
        let config = GameConfig {
            timing,
            preview: false,
            ..GameConfig::new((2, 2))
        };
        let board = Board::from_columns(&[[A, A], [B, B]]).unwrap();
        let round = GameRound::new(board, ScoreState::new());
        Self {
            session: GameSession::from_round(config, SmallRng::seed_from_u64(1), round).unwrap(),
            renderer: RecordingRenderer::default(),
        }
    }

    fn tick(&mut self, elapsed_ms: u32, events: &[InputEvent]) -> Flow {
        let mut input: VecDeque<InputEvent> = events.iter().copied().collect();
        let flow = self
            .session
            .tick(elapsed_ms, &mut input, &mut self.renderer)
            .unwrap();
        assert!(input.is_empty(), "events must be drained every frame");
        flow
    }

    fn settle(&mut self) {
        for _ in 0..10_000 {
            if !self.session.is_locked() {
                return;
            }
            self.tick(16, &[]);
        }
        panic!("animation never finished");
    }

    fn cell(&self, coords: Coord2) -> CellContent {
        self.renderer.cells[&coords]
    }

    fn pick(&mut self, coords: Coord2) {
        self.tick(16, &[InputEvent::Select(coords)]);
        self.settle();
    }
}

#[test]
fn matching_both_pairs_wins_the_round() {
    let mut harness = Harness::two_by_two(TimingConfig::instant());
    harness.session.take_notifications();

    harness.pick((0, 0));
    harness.pick((0, 1));
    let round = harness.session.round();
    assert_eq!((round.score(), round.streak()), (1, 1));
    assert!(round.is_revealed((0, 0)) && round.is_revealed((0, 1)));
    assert_eq!(round.phase(), TurnPhase::Idle);

    harness.pick((1, 0));
    harness.tick(16, &[InputEvent::Select((1, 1))]);
    // RevealIn finishes on the next frame, which settles the turn
    harness.tick(16, &[]);
    let round = harness.session.round();
    assert_eq!((round.score(), round.streak()), (3, 2));
    assert_eq!(round.phase(), TurnPhase::Won);
    assert_eq!(
        harness.session.take_notifications(),
        [Notification::RoundWon {
            final_score: 3,
            round: 1
        }]
    );
    assert!(harness.session.is_locked());

    harness.settle();
    assert_eq!(harness.session.round_number(), 2);
    assert_eq!(harness.session.round().phase(), TurnPhase::Idle);
    assert_eq!(harness.session.round().score(), 0);
    assert_eq!(
        harness.session.take_notifications(),
        [Notification::RoundStarted { round: 2 }]
    );
    assert!(
        harness
            .renderer
            .cells
            .values()
            .all(|content| content.is_covered())
    );
}

#[test]
fn mismatch_covers_both_tiles_again() {
    let mut harness = Harness::two_by_two(TimingConfig::default());

    harness.pick((0, 0));
    harness.pick((1, 0));

    let round = harness.session.round();
    assert!(!round.is_revealed((0, 0)) && !round.is_revealed((1, 0)));
    assert_eq!(round.streak(), 0);
    assert_eq!(round.phase(), TurnPhase::Idle);
    assert!(harness.cell((0, 0)).is_covered());
    assert!(harness.cell((1, 0)).is_covered());
}

#[test]
fn mismatch_shows_both_icons_during_hold() {
    let timing = TimingConfig::default();
    let mut harness = Harness::two_by_two(timing);

    harness.pick((0, 0));
    assert_eq!(harness.cell((0, 0)), CellContent::Icon(A));

    harness.tick(16, &[InputEvent::Select((1, 0))]);
    harness.tick(timing.reveal_ms, &[]);
    harness.tick(timing.mismatch_hold_ms / 2, &[]);

    assert_eq!(harness.cell((0, 0)), CellContent::Icon(A));
    assert_eq!(harness.cell((1, 0)), CellContent::Icon(B));
    assert!(matches!(
        harness.session.round().phase(),
        TurnPhase::Resolving { matched: false, .. }
    ));
}

#[test]
fn reveal_slides_over_several_frames() {
    let timing = TimingConfig::default();
    let mut harness = Harness::two_by_two(timing);

    harness.tick(16, &[InputEvent::Select((0, 0))]);
    assert_eq!(harness.cell((0, 0)), CellContent::Covered);

    harness.tick(timing.reveal_ms / 2, &[]);
    match harness.cell((0, 0)) {
        CellContent::Sliding { icon, cover } => {
            assert_eq!(icon, A);
            assert!(cover > 0.4 && cover < 0.6, "cover was {cover}");
        }
        other => panic!("expected sliding tile, got {other:?}"),
    }

    harness.settle();
    assert_eq!(harness.cell((0, 0)), CellContent::Icon(A));
}

#[test]
fn input_during_lock_is_dropped_not_queued() {
    let mut harness = Harness::two_by_two(TimingConfig::default());

    harness.pick((0, 0));
    harness.tick(16, &[InputEvent::Select((1, 0))]);
    assert!(harness.session.is_locked());

    harness.tick(16, &[InputEvent::Select((0, 1)), InputEvent::RequestHint]);
    harness.settle();

    let round = harness.session.round();
    assert_eq!(round.phase(), TurnPhase::Idle);
    assert_eq!(round.selection(), Selection::Empty);
    assert!(!round.is_revealed((0, 1)));
}

#[test]
fn only_one_transition_per_tick() {
    let mut harness = Harness::two_by_two(TimingConfig::instant());

    harness.tick(16, &[InputEvent::Select((0, 0)), InputEvent::Select((0, 1))]);
    harness.settle();

    assert_eq!(harness.session.round().phase(), TurnPhase::OnePending((0, 0)));
    assert!(!harness.session.round().is_revealed((0, 1)));
}

#[test]
fn hint_without_pending_tile_is_rejected() {
    let mut harness = Harness::two_by_two(TimingConfig::default());
    let before = harness.session.round().clone();

    assert_eq!(
        harness.session.request_hint(),
        Err(GameError::InvalidHintRequest(
            HintRejection::NoPendingSelection
        ))
    );
    assert_eq!(harness.session.round(), &before);
    assert!(!harness.session.is_locked());

    harness.tick(16, &[InputEvent::RequestHint]);
    assert_eq!(harness.session.round(), &before);
    assert!(harness.renderer.highlights.is_empty());
}

#[test]
fn hint_flashes_pending_tile_and_partner() {
    let mut harness = Harness::two_by_two(TimingConfig::default());
    harness.pick((1, 1));

    harness.tick(16, &[InputEvent::RequestHint]);
    assert_eq!(harness.renderer.highlights, [(1, 1), (1, 0)]);
    assert!(harness.cell((1, 0)).is_covered());
    assert!(harness.session.is_locked());

    harness.settle();
    assert_eq!(harness.session.round().pending(), Some((1, 1)));
    assert!(!harness.session.round().is_revealed((1, 0)));
}

#[test]
fn hover_highlights_covered_tiles_only() {
    let mut harness = Harness::two_by_two(TimingConfig::instant());

    harness.tick(16, &[InputEvent::Hover(Some((1, 0)))]);
    assert_eq!(harness.renderer.highlights, [(1, 0)]);

    harness.pick((1, 0));
    assert!(harness.renderer.highlights.is_empty());

    harness.tick(16, &[InputEvent::Hover(Some((9, 9)))]);
    assert_eq!(harness.session.hover(), None);
}

#[test]
fn restart_discards_round_and_lock() {
    let mut harness = Harness::two_by_two(TimingConfig::default());
    harness.pick((0, 0));
    harness.pick((0, 1));
    harness.pick((1, 0));
    harness.tick(16, &[InputEvent::Select((1, 1))]);
    assert!(harness.session.is_locked());
    harness.session.take_notifications();

    harness.tick(16, &[InputEvent::Restart]);

    assert!(!harness.session.is_locked());
    assert_eq!(harness.session.round_number(), 2);
    assert_eq!(harness.session.round().score(), 0);
    assert_eq!(harness.session.round().streak(), 0);
    assert_eq!(harness.session.round().reveal_state().revealed_count(), 0);
    assert_eq!(
        harness.session.take_notifications(),
        [Notification::RoundStarted { round: 2 }]
    );
}

#[test]
fn carry_over_keeps_score_between_rounds() {
    let config = GameConfig {
        timing: TimingConfig::instant(),
        preview: false,
        score_policy: ScorePolicy::CarryOver,
        ..GameConfig::new((2, 2))
    };
    let board = Board::from_columns(&[[A, A], [B, B]]).unwrap();
    let mut harness = Harness {
        session: GameSession::from_round(
            config,
            SmallRng::seed_from_u64(3),
            GameRound::new(board, ScoreState::new()),
        )
        .unwrap(),
        renderer: RecordingRenderer::default(),
    };

    for coords in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        harness.pick(coords);
    }

    assert_eq!(harness.session.round_number(), 2);
    assert_eq!(harness.session.round().score(), 3);
    assert_eq!(harness.session.round().streak(), 0);
    assert_eq!(harness.renderer.hud.score, 3);
    assert_eq!(harness.renderer.hud.round, 2);
}

#[test]
fn win_flourish_flashes_backdrop() {
    let timing = TimingConfig::default();
    let mut harness = Harness::two_by_two(timing);
    harness.pick((0, 0));
    harness.pick((0, 1));
    harness.pick((1, 0));
    harness.tick(16, &[InputEvent::Select((1, 1))]);
    harness.tick(timing.reveal_ms, &[]);
    assert_eq!(harness.session.round().phase(), TurnPhase::Won);

    assert_eq!(harness.renderer.backdrop, Backdrop::Normal);
    harness.tick(timing.win_flash_ms, &[]);
    assert_eq!(harness.renderer.backdrop, Backdrop::Flash);
    harness.tick(timing.win_flash_ms, &[]);
    assert_eq!(harness.renderer.backdrop, Backdrop::Normal);
}

#[test]
fn random_play_never_hides_revealed_tiles() {
    let config = GameConfig {
        timing: TimingConfig::instant(),
        ..GameConfig::new((4, 4))
    };
    let mut session = GameSession::new(config, SmallRng::seed_from_u64(11)).unwrap();
    let mut player = SmallRng::seed_from_u64(12);
    let mut renderer = RecordingRenderer::default();
    let mut seen: Vec<Coord2> = Vec::new();
    let mut round_number = session.round_number();
    let mut wins = 0;

    for _ in 0..5_000 {
        let coords = (player.random_range(0..4), player.random_range(0..4));
        let mut input = VecDeque::from([InputEvent::Select(coords)]);
        session.tick(16, &mut input, &mut renderer).unwrap();

        if session.round_number() != round_number {
            round_number = session.round_number();
            seen.clear();
        }
        for &coords in &seen {
            assert!(session.round().is_revealed(coords), "{coords:?} was hidden again");
        }
        seen = iter_cells((4, 4))
            .filter(|&coords| session.round().is_revealed(coords))
            .collect();

        wins += session
            .take_notifications()
            .iter()
            .filter(|notification| matches!(notification, Notification::RoundWon { .. }))
            .count();
    }

    assert!(wins > 0, "random play should clear at least one board");
}

#[test]
fn quit_ends_the_loop_without_rendering() {
    let mut harness = Harness::two_by_two(TimingConfig::default());
    let frames = harness.renderer.frames;

    assert_eq!(harness.tick(16, &[InputEvent::Quit]), Flow::Quit);
    assert_eq!(harness.renderer.frames, frames);
}

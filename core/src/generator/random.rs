use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Seeded generation strategy, the same seed and config always give the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: &GameConfig) -> Result<Board> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        generate_board(config, &mut rng)
    }
}

/// Deals a fresh board from `config.pool` using `rng`.
///
/// The pool is shuffled and cut to one icon per pair, the cut is doubled and shuffled
/// again, and the result is dealt column by column.
pub fn generate_board<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Board> {
    config.validate()?;

    let size = config.size;
    let pairs = usize::from(config.pair_count());

    let mut icons = config.pool.icons();
    icons.shuffle(rng);
    icons.truncate(pairs);

    let mut deck: Vec<Icon> = Vec::with_capacity(pairs * 2);
    deck.extend_from_slice(&icons);
    deck.extend_from_slice(&icons);
    deck.shuffle(rng);

    let height = usize::from(size.1);
    let grid = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| deck[x * height + y]);

    log::debug!(
        "Generated {}x{} board with {} pairs out of {} icons",
        size.0,
        size.1,
        pairs,
        config.pool.capacity()
    );
    Ok(Board::from_grid(size, grid))
}

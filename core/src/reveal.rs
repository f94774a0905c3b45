use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells that have been matched and stay face-up for the rest of the round.
///
/// Flags only ever go from `false` to `true`, a new round starts from a fresh tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealState {
    revealed: Array2<bool>,
    revealed_count: Saturating<CellCount>,
}

impl RevealState {
    pub fn new(size: Coord2) -> Self {
        Self {
            revealed: Array2::default(size.to_nd_index()),
            revealed_count: Saturating(0),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.revealed.dim();
        (width as Coord, height as Coord)
    }

    /// Out-of-bounds cells read as not revealed.
    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.revealed
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    /// Marks a cell revealed, returns whether it changed.
    pub fn reveal(&mut self, coords: Coord2) -> bool {
        match self.revealed.get_mut(coords.to_nd_index()) {
            Some(flag) if !*flag => {
                *flag = true;
                self.revealed_count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn all_revealed(&self) -> bool {
        usize::from(self.revealed_count.0) == self.revealed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_covered() {
        let state = RevealState::new((2, 3));
        assert_eq!(state.size(), (2, 3));
        assert!(iter_cells((2, 3)).all(|coords| !state.is_revealed(coords)));
        assert!(!state.all_revealed());
    }

    #[test]
    fn reveal_is_one_way_and_counted_once() {
        let mut state = RevealState::new((2, 1));

        assert!(state.reveal((0, 0)));
        assert!(!state.reveal((0, 0)));
        assert_eq!(state.revealed_count(), 1);
        assert!(state.is_revealed((0, 0)));

        assert!(state.reveal((1, 0)));
        assert!(state.all_revealed());
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut state = RevealState::new((2, 2));
        assert!(!state.reveal((5, 0)));
        assert!(!state.is_revealed((5, 0)));
        assert_eq!(state.revealed_count(), 0);
    }
}

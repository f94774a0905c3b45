use alloc::collections::BTreeMap;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed grid of icons where every icon used sits on exactly two cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    icons: Array2<Icon>,
    size: Coord2,
}

impl Board {
    /// Wraps an already paired grid, only the generator constructs boards this way.
    pub(crate) fn from_grid(size: Coord2, icons: Array2<Icon>) -> Self {
        Self { icons, size }
    }

    /// Builds a board from explicit columns, `columns[x][y]`.
    ///
    /// Fails when the columns are ragged, the board is empty or odd, or any icon does not
    /// appear exactly twice.
    pub fn from_columns<C: AsRef<[Icon]>>(columns: &[C]) -> Result<Self> {
        let width = columns.len();
        let height = columns.first().map_or(0, |column| column.as_ref().len());
        if columns.iter().any(|column| column.as_ref().len() != height) {
            return Err(ConfigError::InvalidBoardShape.into());
        }
        let size: Coord2 = (
            width.try_into().map_err(|_| ConfigError::InvalidBoardShape)?,
            height.try_into().map_err(|_| ConfigError::InvalidBoardShape)?,
        );
        check_cell_count(size)?;

        let icons = Array2::from_shape_fn((width, height), |(x, y)| columns[x].as_ref()[y]);
        let board = Self { icons, size };
        board.check_pairing()?;
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn pair_count(&self) -> CellCount {
        self.total_cells() / 2
    }

    pub fn icon_at(&self, coords: Coord2) -> Icon {
        self[coords]
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Cells with their icons in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Icon)> + '_ {
        iter_cells(self.size).map(|coords| (coords, self[coords]))
    }

    /// Checks that every icon on the board appears on exactly two cells.
    pub fn check_pairing(&self) -> core::result::Result<(), ConfigError> {
        let mut counts: BTreeMap<Icon, u16> = BTreeMap::new();
        for &icon in self.icons.iter() {
            *counts.entry(icon).or_default() += 1;
        }
        if counts.values().all(|&count| count == 2) {
            Ok(())
        } else {
            Err(ConfigError::UnpairedIcon)
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Icon;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.icons[coords.to_nd_index()]
    }
}

/// Rejects sizes that cannot hold whole pairs.
pub(crate) fn check_cell_count(size: Coord2) -> core::result::Result<CellCount, ConfigError> {
    let total = mult(size.0, size.1);
    if total == 0 {
        Err(ConfigError::EmptyBoard)
    } else if total % 2 != 0 {
        Err(ConfigError::OddCellCount(total))
    } else {
        Ok(total)
    }
}

use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board has no cells")]
    EmptyBoard,
    #[error("Board must have an even number of cells, got {0}")]
    OddCellCount(CellCount),
    #[error("Icon pool too small, needed {needed} distinct icons but only {available} available")]
    InsufficientIcons { needed: usize, available: usize },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Every icon must appear on exactly two cells")]
    UnpairedIcon,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum HintRejection {
    #[error("No tile is pending")]
    NoPendingSelection,
    #[error("Tile is already revealed")]
    AlreadyRevealed,
    #[error("Pending tile has no covered partner")]
    NoCoveredPartner,
    #[error("Board is locked by an animation")]
    Locked,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Invalid hint request: {0}")]
    InvalidHintRequest(HintRejection),
    #[error("Invalid coordinates")]
    InvalidCoords,
}

impl From<HintRejection> for GameError {
    fn from(rejection: HintRejection) -> Self {
        Self::InvalidHintRequest(rejection)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

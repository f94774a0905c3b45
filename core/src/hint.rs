use crate::*;

/// Finds the partner of the covered tile at `from`.
///
/// Scans column-major and returns the first other cell with the same icon that is not
/// revealed yet. Asking from a revealed or out-of-bounds cell is rejected.
pub fn find_pair(board: &Board, reveal: &RevealState, from: Coord2) -> Result<Option<Coord2>> {
    let from = board.validate_coords(from)?;
    if reveal.is_revealed(from) {
        return Err(HintRejection::AlreadyRevealed.into());
    }

    let icon = board[from];
    Ok(board
        .iter()
        .find(|&(coords, other)| coords != from && other == icon && !reveal.is_revealed(coords))
        .map(|(coords, _)| coords))
}

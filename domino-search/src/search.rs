use domino_core::{Board, Tile};

/// Plays `tile`, runs `f`, and undoes the move again.
///
/// Keeps the play/undo pairing in one place so no search branch can
/// forget the backtrack.
pub(crate) fn with_move<T>(board: &mut Board, tile: Tile, f: impl FnOnce(&mut Board) -> T) -> T {
    board.play_tile(tile);
    let result = f(board);
    board
        .unplay_tile()
        .expect("a move that was just played can be undone");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use domino_core::TileSet;

    #[test]
    fn with_move_backtracks() {
        let set1 = TileSet::with_tiles(6, &[Tile::new(3, 5).unwrap()]).unwrap();
        let set2 = TileSet::with_tiles(6, &[Tile::new(5, 6).unwrap()]).unwrap();
        let mut board = Board::with_start(set1, set2, Tile::new(3, 3).unwrap());
        let key = board.hash_value();

        let ends = with_move(&mut board, Tile::new(3, 5).unwrap(), |b| b.board_ends());
        assert_eq!(ends, Tile::new(3, 5).unwrap());
        assert_eq!(board.hash_value(), key);
    }
}

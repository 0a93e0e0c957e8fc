use crate::board::{Board, GameState, HistEntry, Placement, PlayerId};
use crate::error::Error;
use crate::tile::Tile;
use crate::tileset::TileSet;

/// A checked domino game that additionally tracks, for each player, the
/// set of tiles the opponent may still hold.
///
/// Wraps [`Board`] and layers two things on top: full legality checks
/// on every move, and maintenance of the candidate sets that feed the
/// players' hidden-information searches. The candidate set of a player
/// is everything the opponent cannot rule out: it shrinks when the
/// player places a tile and, on a pass, loses every tile matching the
/// board ends for good. Undoing a pass therefore rebuilds the candidate
/// set from scratch by replaying the whole history, which makes heavy
/// unplay sequences expensive; search loops use a bare [`Board`]
/// instead.
#[derive(Clone, Debug)]
pub struct BoardPlus {
    board: Board,
    cands: [TileSet; 2],
}

impl BoardPlus {
    /// Creates a checked board over the two players' sets.
    pub fn new(set1: TileSet, set2: TileSet) -> Result<Self, Error> {
        let cands = Self::build_candidates(&set1, &set2)?;
        Ok(BoardPlus { board: Board::new(set1, set2), cands })
    }

    /// Creates a checked board with `start_tile` already placed.
    pub fn with_start(set1: TileSet, set2: TileSet, start_tile: Tile) -> Result<Self, Error> {
        let cands = Self::build_candidates(&set1, &set2)?;
        Ok(BoardPlus { board: Board::with_start(set1, set2, start_tile), cands })
    }

    fn build_candidates(set1: &TileSet, set2: &TileSet) -> Result<[TileSet; 2], Error> {
        Ok([
            Self::candidate_pool(set1, set2)?,
            Self::candidate_pool(set2, set1)?,
        ])
    }

    /// The initial pool of tiles `owner` may hold, from the opponent's
    /// point of view: every tile the opponent does not hold itself,
    /// minus doubles above both players' largest double. The opening
    /// rule makes such doubles impossible: whoever held one would have
    /// had to open with it.
    fn candidate_pool(owner: &TileSet, other: &TileSet) -> Result<TileSet, Error> {
        let m = owner.max_value();
        let n = owner
            .largest_double()
            .max_value()
            .max(other.largest_double().max_value());
        let mut pool = TileSet::new(m)?;
        for j in 0..=m {
            for i in 0..=j {
                let tile = Tile::new(i, j)?;
                if !other.contains(&tile) && !(i == j && i > n) {
                    pool.add(tile)?;
                }
            }
        }
        Ok(pool)
    }

    fn check_played_tile(&self, tile: &Tile) -> Result<(), Error> {
        let player = self.board.current_player();
        let set = self.board.player_set(player);
        let ends = self.board.board_ends();

        if self.board.state() == GameState::Ended {
            return Err(Error::GameOver);
        }
        if !tile.is_empty() && !set.contains(tile) {
            return Err(Error::TileNotHeld { player, tile: *tile });
        }
        if ends.is_empty() {
            if !tile.is_double() || *tile != set.largest_double() {
                return Err(Error::IllegalOpening { player, tile: *tile });
            }
        } else {
            if tile.is_empty() && set.matches(&ends) {
                return Err(Error::IllegalPass { player });
            }
            if !tile.is_empty() && !tile.left_matches(&ends) {
                return Err(Error::EndsMismatch { tile: *tile, ends });
            }
        }
        Ok(())
    }

    /// Plays `tile` for the current player, after checking legality.
    ///
    /// The opening move must be the player's largest double; a pass is
    /// only legal with no matching tile in hand; a placed tile must
    /// match an end with its left value.
    pub fn play_tile(&mut self, tile: Tile) -> Result<GameState, Error> {
        self.check_played_tile(&tile)?;
        let id = self.board.current_player().index();
        let state = self.board.play_tile(tile);

        if tile.is_empty() {
            // The pass proves the player holds nothing matching the ends.
            self.cands[id].remove_matches(&self.board.board_ends());
        } else {
            self.cands[id].remove(&tile);
        }
        Ok(state)
    }

    /// Undoes the last move.
    ///
    /// A placed tile returns to its owner's set and candidate pool.
    /// Undoing a pass cannot simply re-add tiles, so the passer's
    /// candidate pool is rebuilt by replaying the remaining history.
    pub fn unplay_tile(&mut self) -> Result<(), Error> {
        let h = *self.board.history().last().ok_or(Error::EmptyHistory)?;
        self.board.unplay_tile()?;

        if let Some(player) = h.player {
            let id = player.index();
            if h.tile.is_empty() {
                self.cands[id] = self.rebuild_candidates(player)?;
            } else {
                self.cands[id].add(h.tile)?;
            }
        }
        Ok(())
    }

    /// Rebuilds the candidate pool of `player` from the current history:
    /// the initial pool minus every played tile, with each of the
    /// player's surviving passes eliminating the tiles matching the ends
    /// it was made against.
    fn rebuild_candidates(&self, player: PlayerId) -> Result<TileSet, Error> {
        let other = player.toggle();
        let history = self.board.history();
        let m = self.board.player_set(player).max_value();
        let n = match history.first() {
            Some(h) if h.player.is_some() => h.tile.max_value(),
            _ => m,
        };

        let mut pool = TileSet::new(m)?;
        let other_set = self.board.player_set(other);
        for j in 0..=m {
            for i in 0..=j {
                let tile = Tile::new(i, j)?;
                if !other_set.contains(&tile) && !(i == j && i > n) {
                    pool.add(tile)?;
                }
            }
        }
        for h in history {
            if h.player == Some(player) && h.tile.is_empty() {
                pool.remove_matches(&h.ends);
            } else {
                pool.remove(&h.tile);
            }
        }
        Ok(pool)
    }

    /// Read-only view of the game as seen by `player`: their own set,
    /// the opponent's candidate pool, and everything public.
    pub fn view(&self, player: PlayerId) -> BoardView<'_> {
        BoardView {
            player,
            own: self.board.player_set(player),
            cand: &self.cands[player.toggle().index()],
            snake: self.board.board_tiles().copied().collect(),
            history: self.board.history(),
            num_tiles: [
                self.board.num_tiles(PlayerId::First),
                self.board.num_tiles(PlayerId::Second),
            ],
        }
    }

    pub fn candidate_set(&self, player: PlayerId) -> &TileSet {
        &self.cands[player.index()]
    }

    pub fn current_player(&self) -> PlayerId {
        self.board.current_player()
    }

    pub fn state(&self) -> GameState {
        self.board.state()
    }

    pub fn board_ends(&self) -> Tile {
        self.board.board_ends()
    }

    pub fn current_player_moves(&self) -> Vec<Tile> {
        self.board.current_player_moves()
    }

    pub fn num_tiles(&self, id: PlayerId) -> usize {
        self.board.num_tiles(id)
    }

    pub fn player_set(&self, id: PlayerId) -> &TileSet {
        self.board.player_set(id)
    }

    pub fn history(&self) -> &[HistEntry] {
        self.board.history()
    }

    pub fn current_score(&self) -> i32 {
        self.board.current_score()
    }

    pub fn hash_value(&self) -> u64 {
        self.board.hash_value()
    }
}

impl std::fmt::Display for BoardPlus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.board.fmt(f)
    }
}

/// What one player is allowed to see of the game.
///
/// Borrows the player's own set and the opponent's candidate pool from
/// the underlying [`BoardPlus`]; the snake and tile counts are copied
/// out, so a view is cheap and cannot mutate the game.
#[derive(Debug)]
pub struct BoardView<'a> {
    player: PlayerId,
    own: &'a TileSet,
    cand: &'a TileSet,
    snake: Vec<Tile>,
    history: &'a [HistEntry],
    num_tiles: [usize; 2],
}

impl<'a> BoardView<'a> {
    pub fn player_id(&self) -> PlayerId {
        self.player
    }

    /// The viewing player's own tile set.
    pub fn player_set(&self) -> &TileSet {
        self.own
    }

    /// Tiles the opponent may still hold.
    pub fn opponent_candidates(&self) -> &TileSet {
        self.cand
    }

    /// True number of tiles in either player's set. Public knowledge:
    /// both players can count each other's tiles.
    pub fn num_tiles(&self, id: PlayerId) -> usize {
        self.num_tiles[id.index()]
    }

    pub fn board_tiles(&self) -> &[Tile] {
        &self.snake
    }

    pub fn history(&self) -> &[HistEntry] {
        self.history
    }

    /// Tiles the viewing player could put on the current ends.
    pub fn playable_tiles(&self) -> Vec<Tile> {
        self.own.matching_tiles(&self.board_ends())
    }

    /// Whose turn it is, derived from the history.
    pub fn current_player(&self) -> PlayerId {
        match self.history.last() {
            Some(h) => match h.player {
                Some(p) => p.toggle(),
                // Only the seeded starting tile has no owner.
                None => PlayerId::First,
            },
            None => PlayerId::First,
        }
    }

    pub fn board_ends(&self) -> Tile {
        match self.history.last() {
            Some(h) => h.ends,
            None => Tile::EMPTY,
        }
    }

    pub fn was_last_turn_pass(&self) -> bool {
        matches!(self.history.last(), Some(h) if h.side == Placement::Unplaced)
    }

    pub fn last_played_tile(&self) -> Tile {
        match self.history.last() {
            Some(h) => h.tile,
            None => Tile::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(max: i32, pairs: &[(i32, i32)]) -> TileSet {
        let tiles: Vec<Tile> = pairs.iter().map(|&(l, r)| Tile::new(l, r).unwrap()).collect();
        TileSet::with_tiles(max, &tiles).unwrap()
    }

    fn tile(l: i32, r: i32) -> Tile {
        Tile::new(l, r).unwrap()
    }

    #[test]
    fn initial_candidates_exclude_opponent_tiles_and_high_doubles() {
        let board = BoardPlus::new(
            set(6, &[(3, 3), (2, 5)]),
            set(6, &[(4, 4), (0, 1)]),
        )
        .unwrap();
        // Neither player holds a double above 4|4, so 5|5 and 6|6 are
        // impossible: their holder would have to open with them.
        let cand1 = board.candidate_set(PlayerId::First);
        assert!(!cand1.contains(&tile(5, 5)));
        assert!(!cand1.contains(&tile(6, 6)));
        // First's candidates exclude what Second actually holds.
        assert!(!cand1.contains(&tile(4, 4)));
        assert!(!cand1.contains(&tile(0, 1)));
        assert!(cand1.contains(&tile(3, 3)));
        assert!(cand1.contains(&tile(2, 5)));
        assert_eq!(cand1.len(), 28 - 2 - 2);
    }

    #[test]
    fn opening_must_be_the_largest_double() {
        let mut board = BoardPlus::new(
            set(6, &[(3, 3), (2, 2), (2, 5)]),
            set(6, &[(0, 1)]),
        )
        .unwrap();
        assert!(matches!(
            board.play_tile(tile(2, 2)),
            Err(Error::IllegalOpening { .. })
        ));
        assert!(matches!(
            board.play_tile(tile(2, 5)),
            Err(Error::IllegalOpening { .. })
        ));
        assert!(board.play_tile(tile(3, 3)).is_ok());
    }

    #[test]
    fn rejects_foreign_and_mismatched_tiles() {
        let mut board = BoardPlus::with_start(
            set(6, &[(3, 5), (0, 1)]),
            set(6, &[(2, 6)]),
            tile(3, 3),
        )
        .unwrap();
        assert!(matches!(
            board.play_tile(tile(2, 6)),
            Err(Error::TileNotHeld { .. })
        ));
        // 0|1 matches neither end.
        assert!(matches!(
            board.play_tile(tile(0, 1)),
            Err(Error::EndsMismatch { .. })
        ));
        // 5|3 played with the non-matching value to the left.
        assert!(matches!(
            board.play_tile(tile(5, 3)),
            Err(Error::EndsMismatch { .. })
        ));
        assert!(board.play_tile(tile(3, 5)).is_ok());
    }

    #[test]
    fn pass_requires_no_playable_tile() {
        let mut board = BoardPlus::with_start(
            set(6, &[(3, 5), (0, 1)]),
            set(6, &[(2, 6)]),
            tile(3, 3),
        )
        .unwrap();
        assert!(matches!(
            board.play_tile(Tile::EMPTY),
            Err(Error::IllegalPass { .. })
        ));
        board.play_tile(tile(3, 5)).unwrap();
        // Second holds only 2|6 against ends 3|5.
        assert!(board.play_tile(Tile::EMPTY).is_ok());
    }

    #[test]
    fn play_shrinks_the_candidate_pool() {
        let mut board = BoardPlus::with_start(
            set(6, &[(3, 5), (0, 1)]),
            set(6, &[(2, 6)]),
            tile(3, 3),
        )
        .unwrap();
        assert!(board.candidate_set(PlayerId::First).contains(&tile(3, 5)));
        board.play_tile(tile(3, 5)).unwrap();
        assert!(!board.candidate_set(PlayerId::First).contains(&tile(3, 5)));
    }

    #[test]
    fn pass_eliminates_matching_candidates() {
        let mut board = BoardPlus::with_start(
            set(6, &[(3, 5), (0, 1)]),
            set(6, &[(2, 6)]),
            tile(3, 3),
        )
        .unwrap();
        board.play_tile(tile(3, 5)).unwrap();
        board.play_tile(Tile::EMPTY).unwrap();
        // Second could not answer ends 3|5: no candidate of theirs may
        // contain a 3 or a 5 any more.
        let cand2 = board.candidate_set(PlayerId::Second);
        for t in cand2.tiles() {
            assert!(!t.matches_value(3) && !t.matches_value(5), "left over: {}", t);
        }
    }

    #[test]
    fn unplaying_a_tile_restores_the_candidate() {
        let mut board = BoardPlus::with_start(
            set(6, &[(3, 5), (0, 1)]),
            set(6, &[(2, 6)]),
            tile(3, 3),
        )
        .unwrap();
        board.play_tile(tile(3, 5)).unwrap();
        board.unplay_tile().unwrap();
        assert!(board.candidate_set(PlayerId::First).contains(&tile(3, 5)));
        assert!(board.player_set(PlayerId::First).contains(&tile(3, 5)));
    }

    #[test]
    fn unplaying_a_pass_rebuilds_the_candidates() {
        let mut board = BoardPlus::new(
            set(6, &[(3, 3), (3, 5)]),
            set(6, &[(2, 6)]),
        )
        .unwrap();
        board.play_tile(tile(3, 3)).unwrap();
        let before: Vec<Tile> = board.candidate_set(PlayerId::Second).tiles();
        // Second cannot answer 3|3 and passes, which wipes every
        // 3-matching tile from their candidates; undo puts them back.
        board.play_tile(Tile::EMPTY).unwrap();
        assert_ne!(board.candidate_set(PlayerId::Second).tiles(), before);
        board.unplay_tile().unwrap();
        assert_eq!(board.candidate_set(PlayerId::Second).tiles(), before);
    }

    #[test]
    fn no_moves_after_game_over() {
        let mut board = BoardPlus::with_start(
            set(6, &[(0, 1)]),
            set(6, &[(0, 2)]),
            tile(5, 5),
        )
        .unwrap();
        board.play_tile(Tile::EMPTY).unwrap();
        board.play_tile(Tile::EMPTY).unwrap();
        assert_eq!(board.state(), GameState::Ended);
        assert!(matches!(board.play_tile(tile(0, 1)), Err(Error::GameOver)));
    }

    #[test]
    fn view_exposes_only_visible_information() {
        let mut board = BoardPlus::with_start(
            set(6, &[(3, 5), (0, 1)]),
            set(6, &[(2, 6), (5, 6)]),
            tile(3, 3),
        )
        .unwrap();
        board.play_tile(tile(3, 5)).unwrap();

        let view = board.view(PlayerId::Second);
        assert_eq!(view.player_id(), PlayerId::Second);
        assert_eq!(view.current_player(), PlayerId::Second);
        assert_eq!(view.board_ends(), Tile::from_values(5, 3));
        assert_eq!(view.num_tiles(PlayerId::First), 1);
        assert_eq!(view.num_tiles(PlayerId::Second), 2);
        assert_eq!(view.last_played_tile(), tile(3, 5));
        assert!(!view.was_last_turn_pass());
        // Second's view of First is the candidate pool, not the hand.
        assert!(view.opponent_candidates().len() > 1);
        assert_eq!(view.playable_tiles(), vec![tile(5, 6)]);
        // 3|5 took the left end of the double, stored swapped.
        assert_eq!(view.board_tiles(), &[Tile::from_values(5, 3), tile(3, 3)]);
    }

    #[test]
    fn view_on_a_fresh_board() {
        let board = BoardPlus::new(set(6, &[(3, 3)]), set(6, &[(1, 4)])).unwrap();
        let view = board.view(PlayerId::First);
        assert_eq!(view.current_player(), PlayerId::First);
        assert_eq!(view.board_ends(), Tile::EMPTY);
        assert_eq!(view.last_played_tile(), Tile::EMPTY);
        assert_eq!(view.playable_tiles(), vec![tile(3, 3)]);
    }
}

use domino_core::{BoardView, PlayerId, Tile, TileSet};

use crate::player::Player;

/// True if `t1` is strictly preferred over `t2` by the greedy ordering.
///
/// Prefers the heavier tile; among equals, the one whose trailing value
/// keeps more follow-ups in `set`; among those, the smaller trailing
/// value. Used directly by [`GreedyPlayer`] and as the tie-breaker in
/// every search strategy's root move selection.
pub(crate) fn greedy_prefer(t1: &Tile, t2: &Tile, set: &TileSet) -> bool {
    let n = t1.total_value() - t2.total_value();
    if n != 0 {
        return n > 0;
    }

    let n = set.match_count(t1.right()) - set.match_count(t2.right());
    if n != 0 {
        return n > 0;
    }

    t2.right() > t1.right()
}

/// Plays the heaviest playable tile; no lookahead.
#[derive(Default)]
pub struct GreedyPlayer;

impl GreedyPlayer {
    pub fn new() -> Self {
        GreedyPlayer
    }
}

impl Player for GreedyPlayer {
    fn init(&mut self, _set: &TileSet, _id: PlayerId, _verbose: bool) {}

    fn select_tile(&mut self, view: &BoardView<'_>) -> Tile {
        let own = view.player_set();
        let mut best = Tile::EMPTY;
        for t in view.playable_tiles() {
            if greedy_prefer(&t, &best, own) {
                best = t;
            }
        }
        best
    }

    fn name(&self) -> &'static str {
        "Greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domino_core::BoardPlus;

    fn set(max: i32, pairs: &[(i32, i32)]) -> TileSet {
        let tiles: Vec<Tile> = pairs.iter().map(|&(l, r)| Tile::new(l, r).unwrap()).collect();
        TileSet::with_tiles(max, &tiles).unwrap()
    }

    fn tile(l: i32, r: i32) -> Tile {
        Tile::new(l, r).unwrap()
    }

    #[test]
    fn prefers_the_heavier_tile() {
        let hand = set(6, &[(1, 2), (0, 1)]);
        assert!(greedy_prefer(&tile(1, 2), &tile(0, 1), &hand));
        assert!(!greedy_prefer(&tile(0, 1), &tile(1, 2), &hand));
        // Anything beats the empty tile.
        assert!(greedy_prefer(&tile(0, 1), &Tile::EMPTY, &hand));
    }

    #[test]
    fn breaks_weight_ties_by_follow_up_count() {
        // 2|3 and 1|4 weigh the same; the hand holds two more tiles
        // with a 3 and none with a 4.
        let hand = set(6, &[(2, 3), (1, 4), (3, 5), (0, 3)]);
        assert!(greedy_prefer(&tile(2, 3), &tile(1, 4), &hand));
        assert!(!greedy_prefer(&tile(1, 4), &tile(2, 3), &hand));
    }

    #[test]
    fn breaks_remaining_ties_by_smaller_trailing_value() {
        // An empty hand gives every trailing value the same follow-up
        // count, so equal weights fall through to the trailing value.
        let hand = set(6, &[]);
        assert!(greedy_prefer(&tile(5, 0), &tile(3, 2), &hand));
        assert!(!greedy_prefer(&tile(3, 2), &tile(5, 0), &hand));
        // A full tie is not a strict preference.
        assert!(!greedy_prefer(&tile(2, 3), &tile(2, 3), &hand));
    }

    #[test]
    fn selects_the_heaviest_playable_tile() {
        let board = BoardPlus::with_start(
            set(6, &[(1, 2), (1, 5), (0, 6)]),
            set(6, &[(0, 2)]),
            tile(1, 1),
        )
        .unwrap();
        let mut player = GreedyPlayer::new();
        player.init(board.player_set(PlayerId::First), PlayerId::First, false);
        let choice = player.select_tile(&board.view(PlayerId::First));
        assert_eq!(choice, tile(1, 5));
    }

    #[test]
    fn passes_when_nothing_matches() {
        let board = BoardPlus::with_start(
            set(6, &[(0, 2)]),
            set(6, &[(1, 5)]),
            tile(6, 6),
        )
        .unwrap();
        let mut player = GreedyPlayer::new();
        player.init(board.player_set(PlayerId::First), PlayerId::First, false);
        assert!(player.select_tile(&board.view(PlayerId::First)).is_empty());
    }
}

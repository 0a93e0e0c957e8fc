//! Play probabilities for the opponent's hidden hand.
//!
//! The opponent is modeled as holding `set_size` tiles drawn uniformly
//! from the candidate pool, and as picking uniformly among the playable
//! tiles of that hand (a tile equal to the board ends counts twice, once
//! per orientation). Marginalizing over all possible hands gives one
//! probability per candidate move plus one for the pass.

use domino_core::{Board, PlayerId, Tile};

/// A candidate opponent move with its probability.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TileProb {
    pub tile: Tile,
    pub prob: f64,
}

/// Binomial coefficient computed in floating point and truncated.
///
/// Exact for every argument the searches reach: a double-six game never
/// exceeds C(28, 14), far below the 2^53 integer limit of an f64.
pub(crate) fn choose(n: i64, k: i64) -> i64 {
    if k < 0 || k > n {
        return 0;
    }
    let k = if k > n / 2 { n - k } else { k };

    let mut den = 1.0f64;
    let mut num = 1.0f64;
    for i in 1..=k {
        den *= i as f64;
        num *= (n + 1 - i) as f64;
    }
    (num / den) as i64
}

/// Probability distribution over the opponent's possible moves at the
/// current chance node: every matching candidate tile, and the pass when
/// enough non-matching candidates remain to fill a whole hand.
///
/// The board must be at the opponent's turn, with the candidate pool as
/// their set; `set_size` is the number of tiles they actually hold.
pub(crate) fn tile_probabilities(board: &Board, set_size: usize) -> Vec<TileProb> {
    let ends = board.board_ends();
    let moves = board.current_player_moves();
    let first = moves[0];

    // A non-double candidate equal to the ends shows up twice in the
    // move list, once per orientation.
    let double_size: i64 = if !first.is_double() && first == ends { 1 } else { 0 };
    let single_size: i64 = if first.is_empty() {
        0
    } else {
        moves.len() as i64 - 2 * double_size
    };
    let cand_size = board.num_tiles(PlayerId::Second) as i64;
    let set_size = set_size as i64;

    let single_prob = tile_play_prob(true, single_size, double_size, set_size, cand_size);
    let double_prob = tile_play_prob(false, single_size, double_size, set_size, cand_size);

    let mut probs = Vec::with_capacity(moves.len() + 1);
    for t in moves {
        if !t.is_double() && t == ends {
            probs.push(TileProb { tile: t, prob: double_prob });
        } else if !t.is_empty() {
            probs.push(TileProb { tile: t, prob: single_prob });
        }
    }

    let nomatch = cand_size - single_size - double_size;
    if nomatch >= set_size {
        let pass_prob = choose(nomatch, set_size) as f64 / choose(cand_size, set_size) as f64;
        probs.push(TileProb { tile: Tile::EMPTY, prob: pass_prob });
    }

    probs
}

/// Probability that one specific matching candidate gets played.
///
/// Sums over the composition of the rest of the hand: `i` other
/// matching singles and `j` ends-duplicates drawn alongside the tile,
/// weighted by the hypergeometric probability of that hand and the
/// uniform pick among its `1 + i + 2j` (or `2 + i + 2j` for a
/// duplicate) playable orientations.
fn tile_play_prob(
    single: bool,
    mut single_size: i64,
    mut double_size: i64,
    mut set_size: i64,
    cand_size: i64,
) -> f64 {
    let n = choose(cand_size, set_size) as f64;
    let nomatch = cand_size - single_size - double_size;

    if single {
        single_size -= 1;
    } else {
        double_size -= 1;
    }
    set_size -= 1;

    let base = if single { 1 } else { 2 };
    let mut p = 0.0;
    for i in 0..=single_size {
        let mut j = 0;
        while j <= double_size && i + j <= set_size {
            let hands = choose(nomatch, set_size - i - j) * choose(single_size, i) * choose(double_size, j);
            let set_prob = hands as f64 / n;
            let pick_prob = 1.0 / (base + i + 2 * j) as f64;
            p += set_prob * pick_prob;
            j += 1;
        }
    }
    p
}

/// Panics unless the distribution sums to one. A drift beyond floating
/// rounding means the move accounting above is wrong.
pub(crate) fn assert_unit_mass(probs: &[TileProb]) {
    let mass: f64 = probs.iter().map(|p| p.prob).sum();
    if (mass - 1.0).abs() > 1e-12 {
        for p in probs {
            eprintln!("({}, {})", p.tile, p.prob);
        }
        panic!("move probabilities sum to {} instead of 1.0", mass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domino_core::TileSet;

    fn set(max: i32, pairs: &[(i32, i32)]) -> TileSet {
        let tiles: Vec<Tile> = pairs.iter().map(|&(l, r)| Tile::new(l, r).unwrap()).collect();
        TileSet::with_tiles(max, &tiles).unwrap()
    }

    fn tile(l: i32, r: i32) -> Tile {
        Tile::new(l, r).unwrap()
    }

    #[test]
    fn choose_small_values() {
        assert_eq!(choose(0, 0), 1);
        assert_eq!(choose(5, 0), 1);
        assert_eq!(choose(5, 5), 1);
        assert_eq!(choose(5, 2), 10);
        assert_eq!(choose(28, 7), 1_184_040);
        assert_eq!(choose(3, 5), 0);
        assert_eq!(choose(3, -1), 0);
    }

    /// Board at the opponent's turn: own hand as First, candidate pool
    /// as Second.
    fn chance_board(own: TileSet, cands: TileSet, start: Tile, played: Tile) -> Board {
        let mut board = Board::with_start(own, cands, start);
        board.play_tile(played);
        board
    }

    #[test]
    fn single_match_splits_with_the_pass() {
        // Candidates {0|2, 2|2}, ends 0|1, opponent holds 1 of the 2.
        // Only 0|2 matches: played iff held, so both outcomes are 1/2.
        let board = chance_board(
            set(2, &[(0, 1), (1, 2)]),
            set(2, &[(0, 2), (2, 2)]),
            tile(1, 1),
            tile(1, 0),
        );
        let probs = tile_probabilities(&board, 1);
        assert_unit_mass(&probs);
        assert_eq!(probs.len(), 2);
        assert_eq!(probs[0].tile, tile(0, 2));
        assert!((probs[0].prob - 0.5).abs() < 1e-12);
        assert!(probs[1].tile.is_empty());
        assert!((probs[1].prob - 0.5).abs() < 1e-12);
    }

    #[test]
    fn all_matching_candidates_leave_no_pass() {
        // Candidates {0|2, 2|2} against ends 2|1: both match, so a
        // 1-tile hand can never pass.
        let board = chance_board(
            set(2, &[(0, 1), (1, 2)]),
            set(2, &[(0, 2), (2, 2)]),
            tile(1, 1),
            tile(1, 2),
        );
        let probs = tile_probabilities(&board, 1);
        assert_unit_mass(&probs);
        assert_eq!(probs.len(), 2);
        assert!(probs.iter().all(|p| !p.tile.is_empty()));
        for p in &probs {
            assert!((p.prob - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn no_matching_candidates_is_a_certain_pass() {
        let board = chance_board(
            set(6, &[(5, 6), (6, 6)]),
            set(6, &[(0, 1), (0, 2), (1, 2)]),
            tile(6, 6),
            tile(6, 5),
        );
        let probs = tile_probabilities(&board, 2);
        assert_unit_mass(&probs);
        assert_eq!(probs.len(), 1);
        assert!(probs[0].tile.is_empty());
        assert!((probs[0].prob - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ends_duplicate_gets_its_own_probability() {
        // Ends 2|5; the candidate 2|5 matches with both orientations.
        let board = chance_board(
            set(6, &[(5, 5), (5, 2)]),
            set(6, &[(2, 5), (0, 1)]),
            tile(5, 5),
            tile(5, 2),
        );
        let probs = tile_probabilities(&board, 1);
        assert_unit_mass(&probs);
        // Two orientations of 2|5 plus the pass.
        assert_eq!(probs.len(), 3);
        assert_eq!(probs[0].tile, tile(2, 5));
        assert_eq!(probs[1].tile, tile(2, 5));
        assert!(probs[2].tile.is_empty());
        // Held with probability 1/2, then either orientation at 1/4.
        assert!((probs[0].prob - 0.25).abs() < 1e-12);
        assert!((probs[1].prob - 0.25).abs() < 1e-12);
        assert!((probs[2].prob - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mass_is_unit_for_larger_pools() {
        // Seven candidates, hand of three, mixed matches.
        let board = chance_board(
            set(6, &[(3, 3), (3, 5)]),
            set(6, &[(0, 3), (1, 3), (2, 3), (3, 4), (0, 1), (1, 2), (4, 5)]),
            tile(3, 3),
            tile(3, 5),
        );
        let probs = tile_probabilities(&board, 3);
        assert_unit_mass(&probs);
    }
}

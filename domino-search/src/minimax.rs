use domino_core::{Board, BoardView, GameState, PlayerId, Tile, TileSet};
use rustc_hash::FxHashMap;

use crate::greedy::greedy_prefer;
use crate::player::Player;
use crate::search::with_move;

/// Which minimax refinement to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinimaxKind {
    /// Exhaustive search.
    Plain,
    /// Alpha-beta pruning.
    AlphaBeta,
    /// Alpha-beta with a transposition table.
    Transposition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flag {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    value: i32,
    flag: Flag,
}

type Table = FxHashMap<u64, Entry>;

/// Pessimistic player: assumes the opponent holds, out of the candidate
/// pool, exactly the hand that hurts the most.
///
/// The search maximizes on its own turns and minimizes over every tile
/// the candidate pool could answer with, the pool's tile count standing
/// in for the opponent's hand size. The result is the guaranteed score:
/// whatever the opponent really holds, the game ends at least this well.
pub struct MinimaxPlayer {
    kind: MinimaxKind,
    myid: PlayerId,
    best_so_far: i32,
    verbose: bool,
}

impl MinimaxPlayer {
    pub fn new(kind: MinimaxKind) -> Self {
        MinimaxPlayer {
            kind,
            myid: PlayerId::First,
            best_so_far: i32::MIN,
            verbose: false,
        }
    }
}

impl Player for MinimaxPlayer {
    fn init(&mut self, set: &TileSet, id: PlayerId, verbose: bool) {
        self.myid = id;
        // Worst case: the opponent goes out while we sit on our full hand.
        self.best_so_far = -set.score();
        self.verbose = verbose;
    }

    fn select_tile(&mut self, view: &BoardView<'_>) -> Tile {
        let playable = view.playable_tiles();
        if playable.len() == 1 {
            return playable[0];
        }

        let ends = view.board_ends();
        let myset = view.player_set().clone();
        let opset = view.opponent_candidates().clone();
        let mysize = view.num_tiles(self.myid);
        let opsize = view.num_tiles(self.myid.toggle());

        if self.verbose {
            eprintln!("Opponent's candidate set: {} Size: {}", opset, opsize);
            eprintln!("My true set: {} Size: {}", myset, mysize);
        }

        let (tile, score) = select(self.kind, &myset, opset, ends, mysize, opsize, self.verbose);

        // The guaranteed score can only improve as moves reveal
        // information; a drop means the search model is inconsistent.
        assert!(
            score >= self.best_so_far,
            "guaranteed score dropped from {} to {}",
            self.best_so_far,
            score
        );
        self.best_so_far = score;
        tile
    }

    fn name(&self) -> &'static str {
        match self.kind {
            MinimaxKind::Plain => "MiniMax",
            MinimaxKind::AlphaBeta => "MiniMaxAB",
            MinimaxKind::Transposition => "MiniMaxTT",
        }
    }
}

fn select(
    kind: MinimaxKind,
    myset: &TileSet,
    opset: TileSet,
    ends: Tile,
    mysize: usize,
    opsize: usize,
    verbose: bool,
) -> (Tile, i32) {
    let mut board = match kind {
        MinimaxKind::Transposition => {
            Board::with_budgets(myset.clone(), opset, ends, mysize, opsize)
        }
        _ => Board::with_start(myset.clone(), opset, ends),
    };
    let mut table = Table::default();

    let mut best = Tile::EMPTY;
    let mut bestscore = i32::MIN;
    for t in myset.matching_tiles(&ends) {
        let score = with_move(&mut board, t, |b| match kind {
            MinimaxKind::Plain => minimax(b, opsize),
            MinimaxKind::AlphaBeta => minimax_ab(b, opsize, i32::MIN, i32::MAX),
            MinimaxKind::Transposition => {
                minimax_tt(b, opsize, i32::MIN, i32::MAX, &mut table).value
            }
        });
        if verbose {
            eprintln!("Evaluating: {} Score: {}", t, score);
        }
        if bestscore < score || (bestscore == score && greedy_prefer(&t, &best, myset)) {
            bestscore = score;
            best = t;
        }
    }
    if verbose {
        eprintln!("Selected tile: {} Score: {}", best, bestscore);
    }
    (best, bestscore)
}

/// Worst-case leaf value: the lightest `size`-tile hand the pool allows
/// for the opponent, minus our remaining pips.
fn eval(board: &Board, size: usize) -> i32 {
    let first = board.player_set(PlayerId::First).score();
    let second = if size == 0 {
        0
    } else {
        board.player_set(PlayerId::Second).min_score(size)
    };
    second - first
}

fn minimax(board: &mut Board, size: usize) -> i32 {
    if board.state() == GameState::Ended || size == 0 {
        eval(board, size)
    } else if board.current_player() == PlayerId::First {
        let mut score = i32::MIN;
        for t in board.current_player_moves() {
            score = score.max(with_move(board, t, |b| minimax(b, size)));
        }
        score
    } else {
        let moves = board.current_player_moves();
        let mut score = i32::MAX;
        for &t in &moves {
            let next = if t.is_empty() { size } else { size - 1 };
            score = score.min(with_move(board, t, |b| minimax(b, next)));
        }

        // The pool had matches, but the opponent's actual hand may hold
        // none of them: try the forced pass over the match-free pool.
        if !moves[0].is_empty() {
            let ends = board.board_ends();
            let saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
            if !saved.is_empty() && board.player_set(PlayerId::Second).len() >= size {
                score = score.min(with_move(board, Tile::EMPTY, |b| minimax(b, size)));
            }
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
        score
    }
}

fn minimax_ab(board: &mut Board, size: usize, mut alpha: i32, mut beta: i32) -> i32 {
    if board.state() == GameState::Ended || size == 0 {
        eval(board, size)
    } else if board.current_player() == PlayerId::First {
        let mut score = i32::MIN;
        for t in board.current_player_moves() {
            score = score.max(with_move(board, t, |b| minimax_ab(b, size, alpha, beta)));
            alpha = alpha.max(score);
            if beta <= alpha {
                break;
            }
        }
        score
    } else {
        let moves = board.current_player_moves();
        let mut score = i32::MAX;
        for &t in &moves {
            let next = if t.is_empty() { size } else { size - 1 };
            score = score.min(with_move(board, t, |b| minimax_ab(b, next, alpha, beta)));
            beta = beta.min(score);
            if beta <= alpha {
                break;
            }
        }

        if beta > alpha && !moves[0].is_empty() {
            let ends = board.board_ends();
            let saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
            if !saved.is_empty() && board.player_set(PlayerId::Second).len() >= size {
                score = score.min(with_move(board, Tile::EMPTY, |b| {
                    minimax_ab(b, size, alpha, beta)
                }));
                beta = beta.min(score);
            }
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
        score
    }
}

fn minimax_tt(board: &mut Board, size: usize, mut alpha: i32, mut beta: i32, table: &mut Table) -> Entry {
    let key = board.hash_value();
    if let Some(&e) = table.get(&key) {
        match e.flag {
            Flag::Exact => return e,
            Flag::LowerBound => {
                if e.value >= beta {
                    return e;
                }
                alpha = alpha.max(e.value);
            }
            Flag::UpperBound => {
                if e.value <= alpha {
                    return e;
                }
                beta = beta.min(e.value);
            }
        }
    }
    // Bound classification is relative to the narrowed window.
    let (a, b) = (alpha, beta);

    if board.state() == GameState::Ended || size == 0 {
        let e = Entry { value: eval(board, size), flag: Flag::Exact };
        table.insert(key, e);
        return e;
    }

    let value;
    if board.current_player() == PlayerId::First {
        let mut v = i32::MIN;
        for t in board.current_player_moves() {
            v = v.max(with_move(board, t, |bd| minimax_tt(bd, size, alpha, beta, table)).value);
            alpha = alpha.max(v);
            if beta <= alpha {
                break;
            }
        }
        value = v;
    } else {
        let moves = board.current_player_moves();
        let mut v = i32::MAX;
        for &t in &moves {
            let next = if t.is_empty() { size } else { size - 1 };
            v = v.min(with_move(board, t, |bd| minimax_tt(bd, next, alpha, beta, table)).value);
            beta = beta.min(v);
            if beta <= alpha {
                break;
            }
        }

        if beta > alpha && !moves[0].is_empty() {
            let ends = board.board_ends();
            let saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
            if !saved.is_empty() && board.player_set(PlayerId::Second).len() >= size {
                v = v.min(with_move(board, Tile::EMPTY, |bd| {
                    minimax_tt(bd, size, alpha, beta, table)
                })
                .value);
            }
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
        value = v;
    }

    let flag = if value <= a {
        Flag::UpperBound
    } else if value >= b {
        Flag::LowerBound
    } else {
        Flag::Exact
    };
    let e = Entry { value, flag };
    table.insert(key, e);
    e
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

    /// Hand {0|1, 1|2} against candidates {0|2, 2|2} over ends 1|1,
    /// opponent holding one tile.
    ///
    /// Playing 1|0 lets the opponent answer 0|2 and leaves us stuck
    /// with 1|2 (worst case -3); playing 1|2 leaves every answer at -1.
    fn scenario() -> (TileSet, TileSet, Tile, usize, usize) {
        (
            set(2, &[(0, 1), (1, 2)]),
            set(2, &[(0, 2), (2, 2)]),
            tile(1, 1),
            2,
            1,
        )
    }

    #[test]
    fn picks_the_guaranteed_best_tile() {
        let (myset, opset, ends, mysize, opsize) = scenario();
        let (best, score) = select(MinimaxKind::Plain, &myset, opset, ends, mysize, opsize, false);
        assert_eq!(best, tile(1, 2));
        assert_eq!(score, -1);
    }

    #[test]
    fn alpha_beta_agrees_with_plain() {
        let (myset, opset, ends, mysize, opsize) = scenario();
        let plain = select(MinimaxKind::Plain, &myset, opset.clone(), ends, mysize, opsize, false);
        let ab = select(MinimaxKind::AlphaBeta, &myset, opset, ends, mysize, opsize, false);
        assert_eq!(plain, ab);
    }

    #[test]
    fn transposition_table_agrees_with_plain() {
        let (myset, opset, ends, mysize, opsize) = scenario();
        let plain = select(MinimaxKind::Plain, &myset, opset.clone(), ends, mysize, opsize, false);
        let tt = select(MinimaxKind::Transposition, &myset, opset, ends, mysize, opsize, false);
        assert_eq!(plain, tt);
    }

    #[test]
    fn variants_agree_on_a_wider_position() {
        let myset = set(4, &[(0, 1), (1, 2), (2, 4), (3, 4)]);
        let opset = set(4, &[(0, 2), (0, 3), (0, 4), (1, 3), (2, 2), (4, 4)]);
        let ends = tile(1, 4);
        let plain = select(MinimaxKind::Plain, &myset, opset.clone(), ends, 4, 3, false);
        let ab = select(MinimaxKind::AlphaBeta, &myset, opset.clone(), ends, 4, 3, false);
        let tt = select(MinimaxKind::Transposition, &myset, opset, ends, 4, 3, false);
        assert_eq!(plain.0, ab.0);
        assert_eq!(plain.1, ab.1);
        assert_eq!(plain.0, tt.0);
        assert_eq!(plain.1, tt.1);
    }

    #[test]
    fn tiny_full_set_is_hand_computable() {
        // The whole max-1 set: 0|1 on the board, we hold the doubles,
        // the pool is empty of surprises. Shedding 0|0 first leaves us
        // stuck with 1|1 (-2); shedding 1|1 first ends level.
        let myset = set(1, &[(0, 0), (1, 1)]);
        let opset = set(1, &[(0, 1)]);
        let (best, score) =
            select(MinimaxKind::Plain, &myset, opset, tile(0, 1), 2, 1, false);
        assert_eq!(best, tile(1, 1));
        assert_eq!(score, 0);
    }

    #[test]
    fn opponent_pass_branch_is_searched() {
        // The pool holds one matching tile, but the opponent's single
        // tile may just as well be the non-matching 2|2: after our 1|0
        // the pessimistic line is the 0|2 answer ending us with 1|2.
        let (myset, opset, ends, _, opsize) = scenario();
        let mut board = Board::with_start(myset, opset, ends);
        board.play_tile(tile(1, 0));
        assert_eq!(minimax(&mut board, opsize), -3);
    }
}

use domino_core::{Board, BoardView, GameState, PlayerId, Tile, TileSet};
use rustc_hash::FxHashMap;

use crate::greedy::greedy_prefer;
use crate::player::Player;
use crate::search::with_move;

/// Which maximax refinement to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaximaxKind {
    /// Exhaustive search.
    Plain,
    /// Prunes branches whose optimistic bound cannot beat the best
    /// score found so far.
    Pruning,
    /// Pruning plus a transposition table.
    Transposition,
}

type Table = FxHashMap<u64, i32>;

/// Optimistic player: assumes the opponent holds, out of the candidate
/// pool, exactly the hand that helps the most.
///
/// Every node maximizes, the opponent's included. The result is the
/// best score still reachable under some assignment of the hidden hand,
/// an upper bound on the game's outcome.
pub struct MaximaxPlayer {
    kind: MaximaxKind,
    myid: PlayerId,
    best_so_far: i32,
    verbose: bool,
}

impl MaximaxPlayer {
    pub fn new(kind: MaximaxKind) -> Self {
        MaximaxPlayer {
            kind,
            myid: PlayerId::First,
            best_so_far: i32::MAX,
            verbose: false,
        }
    }
}

impl Player for MaximaxPlayer {
    fn init(&mut self, _set: &TileSet, id: PlayerId, verbose: bool) {
        self.myid = id;
        self.best_so_far = i32::MAX;
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

        // The optimistic bound can only shrink as the game reveals what
        // the opponent holds; an increase means the model is broken.
        assert!(
            score <= self.best_so_far,
            "optimistic score rose from {} to {}",
            self.best_so_far,
            score
        );
        self.best_so_far = score;
        tile
    }

    fn name(&self) -> &'static str {
        match self.kind {
            MaximaxKind::Plain => "MaxiMax",
            MaximaxKind::Pruning => "MaxiMaxPR",
            MaximaxKind::Transposition => "MaxiMaxTT",
        }
    }
}

fn select(
    kind: MaximaxKind,
    myset: &TileSet,
    opset: TileSet,
    ends: Tile,
    mysize: usize,
    opsize: usize,
    verbose: bool,
) -> (Tile, i32) {
    let mut board = match kind {
        MaximaxKind::Transposition => {
            Board::with_budgets(myset.clone(), opset, ends, mysize, opsize)
        }
        _ => Board::with_start(myset.clone(), opset, ends),
    };
    let mut table = Table::default();

    let mut best = Tile::EMPTY;
    let mut bestscore = i32::MIN;
    for t in myset.matching_tiles(&ends) {
        let score = with_move(&mut board, t, |b| match kind {
            MaximaxKind::Plain => maximax(b, opsize),
            MaximaxKind::Pruning => maximax_pr(b, opsize, bestscore),
            MaximaxKind::Transposition => maximax_tt(b, opsize, bestscore, &mut table),
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

/// Best-case leaf value: the heaviest `size`-tile hand the pool allows
/// for the opponent, minus our remaining pips.
fn eval(board: &Board, size: usize) -> i32 {
    let first = board.player_set(PlayerId::First).score();
    let second = if size == 0 {
        0
    } else {
        board.player_set(PlayerId::Second).max_score(size)
    };
    second - first
}

/// Upper bound on any leaf reachable from here: our pip count can only
/// drop, the opponent's hand can only lighten.
fn bound(board: &Board, size: usize) -> i32 {
    board.player_set(PlayerId::Second).max_score(size)
}

fn maximax(board: &mut Board, size: usize) -> i32 {
    if board.state() == GameState::Ended || size == 0 {
        eval(board, size)
    } else if board.current_player() == PlayerId::First {
        let mut score = i32::MIN;
        for t in board.current_player_moves() {
            score = score.max(with_move(board, t, |b| maximax(b, size)));
        }
        score
    } else {
        let moves = board.current_player_moves();
        let mut score = i32::MIN;
        for &t in &moves {
            let next = if t.is_empty() { size } else { size - 1 };
            score = score.max(with_move(board, t, |b| maximax(b, next)));
        }

        // The opponent's real hand may hold none of the matches: the
        // forced pass is a line of its own.
        if !moves[0].is_empty() {
            let ends = board.board_ends();
            let saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
            if !saved.is_empty() && board.player_set(PlayerId::Second).len() >= size {
                score = score.max(with_move(board, Tile::EMPTY, |b| maximax(b, size)));
            }
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
        score
    }
}

fn maximax_pr(board: &mut Board, size: usize, mut bestscore: i32) -> i32 {
    if board.state() == GameState::Ended || size == 0 {
        return eval(board, size);
    }
    let cap = bound(board, size);
    if cap < bestscore {
        return cap;
    }

    if board.current_player() == PlayerId::First {
        let mut score = i32::MIN;
        for t in board.current_player_moves() {
            score = score.max(with_move(board, t, |b| maximax_pr(b, size, bestscore)));
            bestscore = bestscore.max(score);
        }
        score
    } else {
        let moves = board.current_player_moves();
        let mut score = i32::MIN;
        for &t in &moves {
            let next = if t.is_empty() { size } else { size - 1 };
            score = score.max(with_move(board, t, |b| maximax_pr(b, next, bestscore)));
            bestscore = bestscore.max(score);
        }

        if !moves[0].is_empty() {
            let ends = board.board_ends();
            let saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
            if !saved.is_empty() && board.player_set(PlayerId::Second).len() >= size {
                score = score.max(with_move(board, Tile::EMPTY, |b| {
                    maximax_pr(b, size, bestscore)
                }));
            }
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
        score
    }
}

fn maximax_tt(board: &mut Board, size: usize, mut bestscore: i32, table: &mut Table) -> i32 {
    let key = board.hash_value();
    if let Some(&score) = table.get(&key) {
        return score;
    }
    if board.state() == GameState::Ended || size == 0 {
        let score = eval(board, size);
        table.insert(key, score);
        return score;
    }
    // Pruned values are bounds, not exact scores; they stay out of the
    // table.
    let cap = bound(board, size);
    if cap < bestscore {
        return cap;
    }

    let score;
    if board.current_player() == PlayerId::First {
        let mut v = i32::MIN;
        for t in board.current_player_moves() {
            v = v.max(with_move(board, t, |b| maximax_tt(b, size, bestscore, table)));
            bestscore = bestscore.max(v);
        }
        score = v;
    } else {
        let moves = board.current_player_moves();
        let mut v = i32::MIN;
        for &t in &moves {
            let next = if t.is_empty() { size } else { size - 1 };
            v = v.max(with_move(board, t, |b| maximax_tt(b, next, bestscore, table)));
            bestscore = bestscore.max(v);
        }

        if !moves[0].is_empty() {
            let ends = board.board_ends();
            let saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
            if !saved.is_empty() && board.player_set(PlayerId::Second).len() >= size {
                v = v.max(with_move(board, Tile::EMPTY, |b| {
                    maximax_tt(b, size, bestscore, table)
                }));
            }
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
        score = v;
    }
    table.insert(key, score);
    score
}

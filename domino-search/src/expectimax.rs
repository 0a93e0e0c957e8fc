use domino_core::{Board, BoardView, GameState, PlayerId, Tile, TileSet};
use rustc_hash::FxHashMap;

use crate::greedy::greedy_prefer;
use crate::player::Player;
use crate::probability::{assert_unit_mass, tile_probabilities};
use crate::search::with_move;

/// Which expectimax refinement to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpectimaxKind {
    /// Exhaustive search.
    Plain,
    /// With a transposition table.
    Transposition,
}

type Table = FxHashMap<u64, f64>;

/// Realistic player: maximizes the expected score over the uniform
/// distribution of hands the opponent could hold.
///
/// Own turns maximize; opponent turns are chance nodes weighing every
/// candidate move, pass included, by its play probability.
pub struct ExpectimaxPlayer {
    kind: ExpectimaxKind,
    myid: PlayerId,
    verbose: bool,
}

impl ExpectimaxPlayer {
    pub fn new(kind: ExpectimaxKind) -> Self {
        ExpectimaxPlayer {
            kind,
            myid: PlayerId::First,
            verbose: false,
        }
    }
}

impl Player for ExpectimaxPlayer {
    fn init(&mut self, _set: &TileSet, id: PlayerId, verbose: bool) {
        self.myid = id;
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

        let (tile, _) = select(self.kind, &myset, opset, ends, mysize, opsize, self.verbose);
        tile
    }

    fn name(&self) -> &'static str {
        match self.kind {
            ExpectimaxKind::Plain => "ExpectiMax",
            ExpectimaxKind::Transposition => "ExpectiMaxTT",
        }
    }
}

fn select(
    kind: ExpectimaxKind,
    myset: &TileSet,
    opset: TileSet,
    ends: Tile,
    mysize: usize,
    opsize: usize,
    verbose: bool,
) -> (Tile, f64) {
    let mut board = match kind {
        ExpectimaxKind::Transposition => {
            Board::with_budgets(myset.clone(), opset, ends, mysize, opsize)
        }
        ExpectimaxKind::Plain => Board::with_start(myset.clone(), opset, ends),
    };
    let mut table = Table::default();

    let mut best = Tile::EMPTY;
    let mut bestscore = f64::MIN;
    for t in myset.matching_tiles(&ends) {
        let score = with_move(&mut board, t, |b| match kind {
            ExpectimaxKind::Plain => expectimax(b, opsize),
            ExpectimaxKind::Transposition => expectimax_tt(b, opsize, &mut table),
        });
        if verbose {
            eprintln!("Evaluating: {} Score: {:.3}", t, score);
        }
        if bestscore < score || (bestscore == score && greedy_prefer(&t, &best, myset)) {
            bestscore = score;
            best = t;
        }
    }
    if verbose {
        eprintln!("Selected tile: {} Score: {:.3}", best, bestscore);
    }
    (best, bestscore)
}

/// Expected leaf value: the mean pip weight of a `size`-tile hand drawn
/// from the pool, minus our remaining pips.
fn eval(board: &Board, size: usize) -> f64 {
    let first = board.player_set(PlayerId::First).score() as f64;
    let second = if size == 0 {
        0.0
    } else {
        let op = board.player_set(PlayerId::Second);
        op.score() as f64 * size as f64 / op.len() as f64
    };
    second - first
}

fn expectimax(board: &mut Board, size: usize) -> f64 {
    if board.state() == GameState::Ended || size == 0 {
        eval(board, size)
    } else if board.current_player() == PlayerId::First {
        let mut score = f64::MIN;
        for t in board.current_player_moves() {
            score = score.max(with_move(board, t, |b| expectimax(b, size)));
        }
        score
    } else {
        chance_node(board, size, &mut |b, next| expectimax(b, next))
    }
}

fn expectimax_tt(board: &mut Board, size: usize, table: &mut Table) -> f64 {
    let key = board.hash_value();
    if let Some(&score) = table.get(&key) {
        return score;
    }

    let score = if board.state() == GameState::Ended || size == 0 {
        eval(board, size)
    } else if board.current_player() == PlayerId::First {
        let mut score = f64::MIN;
        for t in board.current_player_moves() {
            score = score.max(with_move(board, t, |b| expectimax_tt(b, size, table)));
        }
        score
    } else {
        chance_node(board, size, &mut |b, next| expectimax_tt(b, next, table))
    };
    table.insert(key, score);
    score
}

/// Weighs every possible opponent move by its probability. The pass
/// child is searched over the match-free pool, restored afterwards.
fn chance_node(
    board: &mut Board,
    size: usize,
    recurse: &mut dyn FnMut(&mut Board, usize) -> f64,
) -> f64 {
    let probs = tile_probabilities(board, size);
    assert_unit_mass(&probs);

    let mut score = 0.0;
    for p in &probs {
        let mut saved = Vec::new();
        if p.tile.is_empty() && probs.len() > 1 {
            let ends = board.board_ends();
            saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
        }
        let next = if p.tile.is_empty() { size } else { size - 1 };
        score += p.prob * with_move(board, p.tile, |b| recurse(b, next));
        if !saved.is_empty() {
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
    }
    score
}

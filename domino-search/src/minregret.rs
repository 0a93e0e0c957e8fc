use domino_core::{Board, BoardView, GameState, PlayerId, Tile, TileSet};
use rustc_hash::FxHashMap;

use crate::greedy::greedy_prefer;
use crate::player::Player;
use crate::probability::{assert_unit_mass, choose, tile_probabilities};
use crate::search::with_move;

/// Which minregret refinement to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinregretKind {
    /// Exhaustive search.
    Plain,
    /// With a transposition table.
    Transposition,
}

/// Outcome statistics of a search line, split by sign.
///
/// `pprob`/`nprob` are the probabilities of ending with a win or a
/// loss; `pscore`/`nscore` the expected score mass on each side. A
/// drawn leaf counts towards both probabilities. The split is what the
/// regret comparison needs: a move is regretted for losing mass where
/// the alternative wins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegretScore {
    pub pprob: f64,
    pub nprob: f64,
    pub pscore: f64,
    pub nscore: f64,
}

impl RegretScore {
    fn merge(&mut self, other: RegretScore) {
        self.pprob += other.pprob;
        self.nprob += other.nprob;
        self.pscore += other.pscore;
        self.nscore += other.nscore;
    }

    fn merge_weighted(&mut self, other: RegretScore, prob: f64) {
        self.pprob += prob * other.pprob;
        self.nprob += prob * other.nprob;
        self.pscore += prob * other.pscore;
        self.nscore += prob * other.nscore;
    }

    /// Expected score over all outcomes.
    pub fn expected(&self) -> f64 {
        self.pscore + self.nscore
    }
}

impl std::fmt::Display for RegretScore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "EU: {:.3} E+: {:.3} E-: {:.3} P+: {:.3} P-: {:.3}",
            self.expected(),
            self.pscore,
            self.nscore,
            self.pprob,
            self.nprob
        )
    }
}

/// Regret of playing the move scored `a` instead of the one scored `b`:
/// the win mass `b` offers where `a` loses, against the loss mass `a`
/// carries where `b` wins.
pub(crate) fn regret(a: &RegretScore, b: &RegretScore) -> f64 {
    a.nprob * b.pscore - b.pprob * a.nscore
}

type Table = FxHashMap<u64, RegretScore>;

/// Risk-averse player: picks the move whose worst regret against any
/// alternative is smallest.
///
/// Every line is scored by its sign-split outcome distribution over
/// the opponent's possible hands; pairwise regrets between the root
/// moves then decide the play.
pub struct MinregretPlayer {
    kind: MinregretKind,
    myid: PlayerId,
    verbose: bool,
}

impl MinregretPlayer {
    pub fn new(kind: MinregretKind) -> Self {
        MinregretPlayer {
            kind,
            myid: PlayerId::First,
            verbose: false,
        }
    }
}

impl Player for MinregretPlayer {
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

        select(self.kind, &myset, opset, ends, mysize, opsize, self.verbose)
    }

    fn name(&self) -> &'static str {
        match self.kind {
            MinregretKind::Plain => "MinRegret",
            MinregretKind::Transposition => "MinRegretTT",
        }
    }
}

fn select(
    kind: MinregretKind,
    myset: &TileSet,
    opset: TileSet,
    ends: Tile,
    mysize: usize,
    opsize: usize,
    verbose: bool,
) -> Tile {
    let mut board = match kind {
        MinregretKind::Transposition => {
            Board::with_budgets(myset.clone(), opset, ends, mysize, opsize)
        }
        MinregretKind::Plain => Board::with_start(myset.clone(), opset, ends),
    };
    let mut table = Table::default();

    let moves = myset.matching_tiles(&ends);
    let scores: Vec<RegretScore> = moves
        .iter()
        .map(|&t| {
            let s = with_move(&mut board, t, |b| match kind {
                MinregretKind::Plain => minregret(b, opsize),
                MinregretKind::Transposition => minregret_tt(b, opsize, &mut table),
            });
            if verbose {
                eprintln!("Evaluating: {} Score: {}", t, s);
            }
            s
        })
        .collect();

    let mut minregret = f64::MAX;
    let mut bestindx = 0;
    let mut tile = Tile::EMPTY;
    for (i, &t) in moves.iter().enumerate() {
        let mut maxregret = f64::MIN;
        for j in 0..moves.len() {
            if i != j {
                maxregret = maxregret.max(regret(&scores[i], &scores[j]));
            }
        }
        if minregret > maxregret
            || (minregret == maxregret
                && (scores[i].expected() > scores[bestindx].expected()
                    || (scores[i].expected() == scores[bestindx].expected()
                        && greedy_prefer(&t, &tile, myset))))
        {
            minregret = maxregret;
            bestindx = i;
            tile = t;
        }
    }
    if verbose {
        eprintln!(
            "Selected tile: {} Regret: {:.3} EU: {:.3}",
            tile,
            minregret,
            scores[bestindx].expected()
        );
    }
    tile
}

/// Index of the move with the smallest worst-case regret, ties broken
/// towards the higher expectation.
fn best_index(scores: &[RegretScore]) -> usize {
    let mut minregret = f64::MAX;
    let mut bestindx = 0;
    for i in 0..scores.len() {
        let mut maxregret = f64::MIN;
        for j in 0..scores.len() {
            if i != j {
                maxregret = maxregret.max(regret(&scores[i], &scores[j]));
            }
        }
        if minregret > maxregret
            || (minregret == maxregret && scores[i].expected() > scores[bestindx].expected())
        {
            minregret = maxregret;
            bestindx = i;
        }
    }
    bestindx
}

/// Sign-split outcome distribution of the finished line: our pips are
/// fixed, the opponent's hand runs over every `size`-subset of the
/// pool, each equally likely.
fn eval(board: &mut Board, size: usize) -> RegretScore {
    let my_score = -board.player_set(PlayerId::First).score();
    if size == 0 {
        if my_score == 0 {
            return RegretScore { pprob: 1.0, nprob: 1.0, pscore: 0.0, nscore: 0.0 };
        }
        return RegretScore { pprob: 0.0, nprob: 1.0, pscore: 0.0, nscore: my_score as f64 };
    }
    let n = choose(board.player_set(PlayerId::Second).len() as i64, size as i64);
    hand_scores(board.player_set_mut(PlayerId::Second), size, my_score, 1.0 / n as f64)
}

/// Enumerates every `size`-subset of `opset` exactly once by cumulative
/// removal, scoring `base` plus the subset's pip weight at probability
/// `prob` per hand.
fn hand_scores(opset: &mut TileSet, size: usize, base: i32, prob: f64) -> RegretScore {
    if size == 0 {
        return if base > 0 {
            RegretScore { pprob: prob, nprob: 0.0, pscore: prob * base as f64, nscore: 0.0 }
        } else if base < 0 {
            RegretScore { pprob: 0.0, nprob: prob, pscore: 0.0, nscore: prob * base as f64 }
        } else {
            RegretScore { pprob: prob, nprob: prob, pscore: 0.0, nscore: 0.0 }
        };
    }

    let mut score = RegretScore::default();
    let tiles = opset.tiles();
    for t in &tiles {
        opset.remove(t);
        score.merge(hand_scores(opset, size - 1, base + t.total_value(), prob));
    }
    opset
        .add_all(&tiles)
        .expect("removed candidates can be restored");
    score
}

fn minregret(board: &mut Board, size: usize) -> RegretScore {
    if board.state() == GameState::Ended || size == 0 {
        eval(board, size)
    } else if board.current_player() == PlayerId::First {
        let moves = board.current_player_moves();
        let scores: Vec<RegretScore> = moves
            .iter()
            .map(|&t| with_move(board, t, |b| minregret(b, size)))
            .collect();
        scores[best_index(&scores)]
    } else {
        chance_node(board, size, &mut |b, next| minregret(b, next))
    }
}

fn minregret_tt(board: &mut Board, size: usize, table: &mut Table) -> RegretScore {
    let key = board.hash_value();
    if let Some(&score) = table.get(&key) {
        return score;
    }

    let score = if board.state() == GameState::Ended || size == 0 {
        eval(board, size)
    } else if board.current_player() == PlayerId::First {
        let moves = board.current_player_moves();
        let scores: Vec<RegretScore> = moves
            .iter()
            .map(|&t| with_move(board, t, |b| minregret_tt(b, size, table)))
            .collect();
        scores[best_index(&scores)]
    } else {
        chance_node(board, size, &mut |b, next| minregret_tt(b, next, table))
    };
    table.insert(key, score);
    score
}

/// Weighs every possible opponent move by its probability, merging the
/// sign-split children. The pass child runs over the match-free pool.
fn chance_node(
    board: &mut Board,
    size: usize,
    recurse: &mut dyn FnMut(&mut Board, usize) -> RegretScore,
) -> RegretScore {
    let probs = tile_probabilities(board, size);
    assert_unit_mass(&probs);

    let mut score = RegretScore::default();
    for p in &probs {
        let mut saved = Vec::new();
        if p.tile.is_empty() && probs.len() > 1 {
            let ends = board.board_ends();
            saved = board.player_set_mut(PlayerId::Second).remove_matches(&ends);
        }
        let next = if p.tile.is_empty() { size } else { size - 1 };
        let child = with_move(board, p.tile, |b| recurse(b, next));
        score.merge_weighted(child, p.prob);
        if !saved.is_empty() {
            board
                .player_set_mut(PlayerId::Second)
                .add_all(&saved)
                .expect("removed candidates can be restored");
        }
    }
    score
}

use std::collections::VecDeque;

use crate::error::Error;
use crate::tile::Tile;
use crate::tileset::TileSet;
use xoshirandom::Xoshiro256PlusPlus;

/// Identifier of one of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerId {
    First,
    Second,
}

impl PlayerId {
    /// The other player.
    pub fn toggle(&self) -> PlayerId {
        match self {
            PlayerId::First => PlayerId::Second,
            PlayerId::Second => PlayerId::First,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PlayerId::First => 0,
            PlayerId::Second => 1,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PlayerId::First => write!(f, "first"),
            PlayerId::Second => write!(f, "second"),
        }
    }
}

/// Whether the game is still in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Open,
    Ended,
}

/// Where a move's tile landed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// First tile of the snake.
    Center,
    /// Attached to the left end.
    Left,
    /// Attached to the right end.
    Right,
    /// Not placed at all: a pass.
    Unplaced,
}

/// One entry of the move history.
#[derive(Clone, Copy, Debug)]
pub struct HistEntry {
    /// Where the tile was placed.
    pub side: Placement,
    /// Who played it. `None` for a seeded starting tile that belongs to
    /// neither player.
    pub player: Option<PlayerId>,
    /// The tile, in played orientation; empty for a pass.
    pub tile: Tile,
    /// The board ends after the move (unchanged by a pass).
    pub ends: Tile,
}

/// State and mechanics of a two-player domino game.
///
/// Holds both players' tile sets, the snake of played tiles, the full
/// move history and the per-player hand budgets. Moves are applied
/// without legality checks, which keeps play/undo cheap inside search
/// loops; [`BoardPlus`](crate::board_plus::BoardPlus) layers the checked
/// interface on top.
///
/// The board keeps its own Zobrist tables for the turn, the board ends
/// and the hand budgets, seeded from the two sets' keys so that boards
/// built over the same sets hash compatibly.
#[derive(Clone, Debug)]
pub struct Board {
    sets: [TileSet; 2],
    snake: VecDeque<Tile>,
    history: Vec<HistEntry>,
    current_player: PlayerId,
    state: GameState,
    /// Remaining playable tiles per player. Tracks the hand budget, not
    /// the set size: search boards pair a small hand with a large
    /// candidate pool.
    size: [usize; 2],
    ends_keys: Vec<u64>,
    turn_keys: [u64; 2],
    size_keys: [Vec<u64>; 2],
}

impl Board {
    /// Creates a board over the two players' sets, empty snake, first
    /// player to move.
    pub fn new(set1: TileSet, set2: TileSet) -> Self {
        let size = [set1.len(), set2.len()];
        let n = set1.max_value().max(set2.max_value());
        let nends = ((n + 1) * (n + 2) / 2) as usize;
        let nsizes = size[0].max(size[1]) + 1;

        // Seed from the sets' keys so identical deals yield identical
        // tables, and boards over the same sets hash comparably.
        let seed = set1.hash_value().wrapping_add(set2.hash_value());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let mut ends_keys = vec![0u64; nends];
        rng.fill_u64(&mut ends_keys);
        let mut turn_keys = [0u64; 2];
        rng.fill_u64(&mut turn_keys);
        let mut size_keys = [vec![0u64; nsizes], vec![0u64; nsizes]];
        rng.fill_u64(&mut size_keys[0]);
        rng.fill_u64(&mut size_keys[1]);

        Board {
            sets: [set1, set2],
            snake: VecDeque::new(),
            history: Vec::new(),
            current_player: PlayerId::First,
            state: GameState::Open,
            size,
            ends_keys,
            turn_keys,
            size_keys,
        }
    }

    /// Creates a board with `start_tile` already placed. The starting
    /// tile belongs to neither player.
    pub fn with_start(set1: TileSet, set2: TileSet, start_tile: Tile) -> Self {
        let mut board = Board::new(set1, set2);
        board.snake.push_back(start_tile);
        board.history.push(HistEntry {
            side: Placement::Center,
            player: None,
            tile: start_tile,
            ends: start_tile,
        });
        board
    }

    /// Creates a board with a starting tile and per-player hand budgets.
    ///
    /// Budgets are clamped to the set sizes. Search uses this to model
    /// "the opponent holds `k` of these candidate tiles".
    pub fn with_budgets(
        set1: TileSet,
        set2: TileSet,
        start_tile: Tile,
        size1: usize,
        size2: usize,
    ) -> Self {
        let mut board = Board::with_start(set1, set2, start_tile);
        board.size[0] = size1.min(board.sets[0].len());
        board.size[1] = size2.min(board.sets[1].len());
        board
    }

    /// Plays `tile` for the current player, without legality checks.
    ///
    /// An empty tile is a pass; a pass answered by a pass ends the game.
    /// A non-empty tile attaches by its left value to whichever end it
    /// matches (the left end first), or opens the snake. The game also
    /// ends when the mover's hand budget reaches zero.
    pub fn play_tile(&mut self, tile: Tile) -> GameState {
        let ends = self.board_ends();

        if tile.is_empty() {
            if self.was_last_turn_pass() {
                self.state = GameState::Ended;
            }
            self.history.push(HistEntry {
                side: Placement::Unplaced,
                player: Some(self.current_player),
                tile,
                ends,
            });
        } else {
            let side = if tile.left_matches_value(ends.left()) {
                self.snake.push_front(tile.swapped());
                Placement::Left
            } else if tile.left_matches_value(ends.right()) {
                self.snake.push_back(tile);
                Placement::Right
            } else {
                self.snake.push_back(tile);
                Placement::Center
            };
            self.history.push(HistEntry {
                side,
                player: Some(self.current_player),
                tile,
                ends: self.board_ends(),
            });
            let idx = self.current_player.index();
            self.sets[idx].remove(&tile);
            self.size[idx] -= 1;
            if self.size[idx] == 0 {
                self.state = GameState::Ended;
            }
        }

        self.current_player = self.current_player.toggle();
        self.state
    }

    /// Undoes the last move, restoring the played tile to its owner.
    ///
    /// The seeded starting tile cannot be undone.
    pub fn unplay_tile(&mut self) -> Result<(), Error> {
        if self.history.is_empty()
            || (self.history.len() == 1 && self.history[0].player.is_none())
        {
            return Err(Error::EmptyHistory);
        }

        let h = self.history.pop().ok_or(Error::EmptyHistory)?;
        if let Some(player) = h.player {
            let idx = player.index();
            match h.side {
                Placement::Left => {
                    if let Some(t) = self.snake.pop_front() {
                        self.sets[idx].add(t)?;
                    }
                }
                Placement::Right | Placement::Center => {
                    if let Some(t) = self.snake.pop_back() {
                        self.sets[idx].add(t)?;
                    }
                }
                Placement::Unplaced => {}
            }
            if !h.tile.is_empty() {
                self.size[idx] += 1;
            }
        }
        self.state = GameState::Open;
        self.current_player = self.current_player.toggle();
        Ok(())
    }

    /// Tiles the current player can put on the board ends, per
    /// [`TileSet::matching_tiles`]. An empty tile in the answer stands
    /// for a pass (or, on an empty answer from an empty board, for "no
    /// double to open with").
    pub fn current_player_moves(&self) -> Vec<Tile> {
        self.sets[self.current_player.index()].matching_tiles(&self.board_ends())
    }

    fn was_last_turn_pass(&self) -> bool {
        matches!(self.history.last(), Some(h) if h.side == Placement::Unplaced)
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Number of tiles in the player's set.
    pub fn num_tiles(&self, id: PlayerId) -> usize {
        self.sets[id.index()].len()
    }

    /// Remaining hand budget of the player.
    pub fn num_hand_tiles(&self, id: PlayerId) -> usize {
        self.size[id.index()]
    }

    pub fn player_set(&self, id: PlayerId) -> &TileSet {
        &self.sets[id.index()]
    }

    /// Mutable access to a player's set. Search uses this to carve
    /// hypothetical tiles out of the opponent's candidate pool and must
    /// restore them before backtracking.
    pub fn player_set_mut(&mut self, id: PlayerId) -> &mut TileSet {
        &mut self.sets[id.index()]
    }

    /// The move history, oldest first.
    pub fn history(&self) -> &[HistEntry] {
        &self.history
    }

    /// The snake of placed tiles, left end first.
    pub fn board_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.snake.iter()
    }

    /// The two exposed values of the snake as a tile, or the empty tile
    /// on an empty board.
    pub fn board_ends(&self) -> Tile {
        match (self.snake.front(), self.snake.back()) {
            (Some(first), Some(last)) => Tile::from_values(first.left(), last.right()),
            _ => Tile::EMPTY,
        }
    }

    /// Score of the game from the first player's perspective: the pip
    /// count still held by the second player minus the first player's.
    pub fn current_score(&self) -> i32 {
        self.sets[PlayerId::Second.index()].score() - self.sets[PlayerId::First.index()].score()
    }

    /// Zobrist key of the full game state: both sets, both hand
    /// budgets, the turn and the board ends.
    pub fn hash_value(&self) -> u64 {
        let mut key = 0u64;
        key ^= self.sets[0].hash_value();
        key ^= self.sets[1].hash_value();
        key ^= self.size_keys[0][self.size[0]];
        key ^= self.size_keys[1][self.size[1]];
        key ^= self.turn_keys[self.current_player.index()];

        let ends = self.board_ends();
        if !ends.is_empty() {
            key ^= self.ends_keys[ends.pair_index()];
        }
        key
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "P1 [{}]: {} P2 [{}]: {} BoardEnds: {} Turn: {}",
            self.size[0],
            self.sets[0],
            self.size[1],
            self.sets[1],
            self.board_ends(),
            self.current_player
        )
    }
}

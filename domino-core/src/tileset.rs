use crate::error::Error;
use crate::tile::Tile;
use xoshirandom::Xoshiro256PlusPlus;

/// A set of distinct domino tiles with values bounded by a maximum.
///
/// Backed by a presence table indexed by [`Tile::pair_index`], so
/// membership, insertion and removal are O(1) and iteration always
/// yields tiles in canonical ascending order. This makes everything
/// downstream (move ordering, display, hashing) deterministic.
///
/// The set carries per-value match counts, a running pip score and a
/// Zobrist key maintained incrementally. The key table is seeded from
/// `max_value`, so two sets holding the same tiles hash equal exactly
/// when their maximum values agree as well.
#[derive(Clone, Debug)]
pub struct TileSet {
    present: Vec<bool>,
    count: Vec<i32>,
    max_value: i32,
    size: usize,
    score: i32,
    keys: Vec<u64>,
    key: u64,
}

impl TileSet {
    /// Creates an empty set accepting values in `[0, max_value]`.
    pub fn new(max_value: i32) -> Result<Self, Error> {
        if max_value < 0 {
            return Err(Error::InvalidMaxValue(max_value));
        }
        let ntiles = ((max_value + 1) * (max_value + 2) / 2) as usize;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(max_value as u64);
        let mut keys = vec![0u64; ntiles];
        rng.fill_u64(&mut keys);
        Ok(TileSet {
            present: vec![false; ntiles],
            count: vec![0; (max_value + 1) as usize],
            max_value,
            size: 0,
            score: 0,
            keys,
            key: 0,
        })
    }

    /// Creates a set holding the given tiles.
    pub fn with_tiles(max_value: i32, tiles: &[Tile]) -> Result<Self, Error> {
        let mut set = TileSet::new(max_value)?;
        set.add_all(tiles)?;
        Ok(set)
    }

    /// Creates the full set of all tiles with values in `[0, max_value]`.
    pub fn full(max_value: i32) -> Result<Self, Error> {
        let mut set = TileSet::new(max_value)?;
        for y in 0..=max_value {
            for x in 0..=y {
                set.add(Tile::new(x, y)?)?;
            }
        }
        Ok(set)
    }

    /// Adds `tile` to the set.
    ///
    /// Empty tiles, tiles exceeding the set's maximum value and
    /// duplicates are rejected.
    pub fn add(&mut self, tile: Tile) -> Result<(), Error> {
        if tile.is_empty() || tile.max_value() > self.max_value {
            return Err(Error::OutOfRange { tile, max_value: self.max_value });
        }
        let idx = tile.pair_index();
        if self.present[idx] {
            return Err(Error::DuplicateTile(tile));
        }
        self.present[idx] = true;
        self.count[tile.left() as usize] += 1;
        self.count[tile.right() as usize] += 1;
        self.size += 1;
        self.score += tile.total_value();
        self.key ^= self.keys[idx];
        Ok(())
    }

    pub fn add_all(&mut self, tiles: &[Tile]) -> Result<(), Error> {
        for t in tiles {
            self.add(*t)?;
        }
        Ok(())
    }

    /// Removes `tile` from the set, if present.
    pub fn remove(&mut self, tile: &Tile) {
        if tile.is_empty() || tile.max_value() > self.max_value {
            return;
        }
        let idx = tile.pair_index();
        if self.present[idx] {
            self.present[idx] = false;
            self.count[tile.left() as usize] -= 1;
            self.count[tile.right() as usize] -= 1;
            self.size -= 1;
            self.score -= tile.total_value();
            self.key ^= self.keys[idx];
        }
    }

    pub fn remove_all(&mut self, tiles: &[Tile]) {
        for t in tiles {
            self.remove(t);
        }
    }

    /// Removes and returns every tile matching `val`.
    pub fn remove_value_matches(&mut self, val: i32) -> Vec<Tile> {
        let mut removed = Vec::new();
        if self.matches_value(val) {
            removed = self.tiles().into_iter().filter(|t| t.matches_value(val)).collect();
            self.remove_all(&removed);
        }
        removed
    }

    /// Removes and returns every tile matching either value of `tile`.
    pub fn remove_matches(&mut self, tile: &Tile) -> Vec<Tile> {
        let mut removed = Vec::new();
        if self.matches(tile) {
            removed = self.tiles().into_iter().filter(|t| t.matches(tile)).collect();
            self.remove_all(&removed);
        }
        removed
    }

    /// True if this set holds a tile matching either value of `tile`.
    pub fn matches(&self, tile: &Tile) -> bool {
        self.matches_value(tile.left()) || self.matches_value(tile.right())
    }

    /// True if this set holds a tile matching `val`.
    pub fn matches_value(&self, val: i32) -> bool {
        val >= 0 && val <= self.max_value && self.count[val as usize] > 0
    }

    /// Number of tiles matching `val`. The `val|val` double raises the
    /// per-value count twice, so one of its two ends is discounted.
    pub fn match_count(&self, val: i32) -> i32 {
        if !self.matches_value(val) {
            return 0;
        }
        let double = Tile::from_values(val, val);
        self.count[val as usize] - if self.contains(&double) { 1 } else { 0 }
    }

    /// Tiles playable against `query`, oriented so the matching value
    /// sits on the left.
    ///
    /// An empty `query` stands for an empty board: the answer is the
    /// set's largest double (the mandatory opening), which is itself
    /// empty when the set has no double. When nothing matches, the
    /// answer is a single empty tile standing for a pass. A non-double
    /// tile equal to `query` matches on both sides; it goes to the
    /// front of the list in both orientations.
    pub fn matching_tiles(&self, query: &Tile) -> Vec<Tile> {
        let mut list = Vec::new();

        if query.is_empty() {
            list.push(self.largest_double());
        } else if !self.matches(query) {
            list.push(Tile::EMPTY);
        } else {
            for t in self.tiles() {
                if !query.is_double() && t == *query {
                    list.insert(0, t.swapped());
                    list.insert(0, t);
                } else if t.left_matches(query) {
                    list.push(t);
                } else if t.right_matches(query) {
                    list.push(t.swapped());
                }
            }
        }

        list
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        !tile.is_empty()
            && tile.max_value() <= self.max_value
            && self.present[tile.pair_index()]
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The largest double in this set, or the empty tile if none.
    pub fn largest_double(&self) -> Tile {
        for y in (0..=self.max_value).rev() {
            let t = Tile::from_values(y, y);
            if self.present[t.pair_index()] {
                return t;
            }
        }
        Tile::EMPTY
    }

    /// Sum of the pip values of all tiles in this set.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Sum of the scores of the `n` lowest-valued tiles.
    ///
    /// Sums the whole set when it holds fewer than `n` tiles.
    pub fn min_score(&self, n: usize) -> i32 {
        let mut tiles = self.tiles();
        tiles.sort_by_key(|t| t.total_value());
        tiles.iter().take(n).map(|t| t.total_value()).sum()
    }

    /// Sum of the scores of the `n` highest-valued tiles.
    ///
    /// Sums the whole set when it holds fewer than `n` tiles.
    pub fn max_score(&self, n: usize) -> i32 {
        if n == 0 {
            0
        } else if n == 1 {
            self.tiles().iter().map(|t| t.total_value()).max().unwrap_or(0)
        } else if n >= self.size {
            self.score
        } else {
            let mut tiles = self.tiles();
            tiles.sort_by_key(|t| -t.total_value());
            tiles.iter().take(n).map(|t| t.total_value()).sum()
        }
    }

    /// All tiles in canonical ascending order, smaller value on the left.
    pub fn tiles(&self) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(self.size);
        for y in 0..=self.max_value {
            for x in 0..=y {
                let t = Tile::from_values(x, y);
                if self.present[t.pair_index()] {
                    tiles.push(t);
                }
            }
        }
        tiles
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    /// Zobrist key of this set.
    pub fn hash_value(&self) -> u64 {
        self.key
    }
}

impl std::fmt::Display for TileSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut first = true;
        for t in self.tiles() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", t)?;
            first = false;
        }
        Ok(())
    }
}

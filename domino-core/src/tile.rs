use crate::error::Error;

/// Sentinel value marking both sides of the empty tile.
pub const EMPTY_VALUE: i32 = -1;

/// A domino tile: an unordered pair of non-negative pip values.
///
/// The empty tile (both sides [`EMPTY_VALUE`]) doubles as the "no tile"
/// sentinel throughout the crate: it is the move played on a pass, the
/// result of searching an empty set, and the board ends of an empty board.
/// Equality and hashing ignore orientation, so a tile compares equal to
/// its left/right swap; the stored orientation still matters when a tile
/// is placed on the board, which is why `swap` exists.
#[derive(Clone, Copy, Debug)]
pub struct Tile {
    left: i32,
    right: i32,
}

impl Tile {
    /// The empty tile.
    pub const EMPTY: Tile = Tile { left: EMPTY_VALUE, right: EMPTY_VALUE };

    /// Construct a tile from two pip values.
    ///
    /// Fails unless both values are non-negative, or both are
    /// [`EMPTY_VALUE`] (the empty tile).
    pub fn new(left: i32, right: i32) -> Result<Self, Error> {
        if !(left == EMPTY_VALUE && right == EMPTY_VALUE) && (left < 0 || right < 0) {
            return Err(Error::InvalidTile { left, right });
        }
        Ok(Tile { left, right })
    }

    /// Construct without validation. Callers guarantee both values are
    /// non-negative (used for board ends assembled from placed tiles).
    pub(crate) fn from_values(left: i32, right: i32) -> Self {
        Tile { left, right }
    }

    /// Swap the left and right values in place.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    /// This tile with its sides exchanged.
    pub fn swapped(&self) -> Tile {
        Tile { left: self.right, right: self.left }
    }

    pub fn is_empty(&self) -> bool {
        self.left == EMPTY_VALUE
    }

    /// True for a non-empty tile whose two sides are equal.
    pub fn is_double(&self) -> bool {
        self.left == self.right && self.left != EMPTY_VALUE
    }

    /// True if either side equals `val`.
    pub fn matches_value(&self, val: i32) -> bool {
        self.left == val || self.right == val
    }

    /// True if this tile shares a value with `tile`.
    pub fn matches(&self, tile: &Tile) -> bool {
        tile.matches_value(self.left) || tile.matches_value(self.right)
    }

    pub fn left_matches_value(&self, val: i32) -> bool {
        self.left == val
    }

    /// True if the left side equals either side of `tile`.
    pub fn left_matches(&self, tile: &Tile) -> bool {
        tile.matches_value(self.left)
    }

    pub fn right_matches_value(&self, val: i32) -> bool {
        self.right == val
    }

    /// True if the right side equals either side of `tile`.
    pub fn right_matches(&self, tile: &Tile) -> bool {
        tile.matches_value(self.right)
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    /// Sum of the two pip values.
    pub fn total_value(&self) -> i32 {
        self.left + self.right
    }

    pub fn max_value(&self) -> i32 {
        self.left.max(self.right)
    }

    pub fn min_value(&self) -> i32 {
        self.left.min(self.right)
    }

    /// Canonical index of the unordered pair: `max*(max+1)/2 + min`.
    ///
    /// A bijection from tiles with values in [0, m] onto
    /// 0..(m+1)(m+2)/2, used directly as an index into presence and
    /// Zobrist key tables. Only meaningful for non-empty tiles.
    pub fn pair_index(&self) -> usize {
        let x = self.min_value();
        let y = self.max_value();
        (y * (y + 1) / 2 + x) as usize
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        (self.left == other.left && self.right == other.right)
            || (self.left == other.right && self.right == other.left)
    }
}

impl Eq for Tile {}

impl std::hash::Hash for Tile {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Orientation-independent, consistent with PartialEq.
        self.min_value().hash(state);
        self.max_value().hash(state);
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "-|-")
        } else {
            write!(f, "{}|{}", self.left, self.right)
        }
    }
}

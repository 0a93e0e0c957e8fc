use crate::board::PlayerId;
use crate::tile::Tile;

/// Errors raised by tile, tile-set and board operations.
///
/// All of these indicate invalid input or an illegal move; none is
/// transient or retryable.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Tile construction with a negative side or a half-empty pair.
    InvalidTile { left: i32, right: i32 },
    /// A negative maximum value was requested for a tile set.
    InvalidMaxValue(i32),
    /// A tile value falls outside the [0, max_value] bound of its set.
    OutOfRange { tile: Tile, max_value: i32 },
    /// The set already contains an equal tile.
    DuplicateTile(Tile),
    /// Undo requested with no move left to undo.
    EmptyHistory,
    /// A move was attempted after the game ended.
    GameOver,
    /// The acting player does not hold the tile they tried to play.
    TileNotHeld { player: PlayerId, tile: Tile },
    /// The opening move must be the player's largest double.
    IllegalOpening { player: PlayerId, tile: Tile },
    /// A pass was attempted while a legal move exists.
    IllegalPass { player: PlayerId },
    /// The played tile's left value matches neither board end.
    EndsMismatch { tile: Tile, ends: Tile },
    /// Malformed tile text notation.
    Notation(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidTile { left, right } => {
                write!(f, "tile values should be >= 0, except for the empty tile -|-: got {}|{}", left, right)
            }
            Error::InvalidMaxValue(m) => {
                write!(f, "{} is not a valid maximum value for a tile", m)
            }
            Error::OutOfRange { tile, max_value } => {
                write!(f, "tile {} is not valid for a set with maximum value {}", tile, max_value)
            }
            Error::DuplicateTile(tile) => {
                write!(f, "the set already contains tile {}", tile)
            }
            Error::EmptyHistory => write!(f, "not possible to undo: empty history"),
            Error::GameOver => write!(f, "the game is over"),
            Error::TileNotHeld { player, tile } => {
                write!(f, "the {} player does not possess the tile {}", player, tile)
            }
            Error::IllegalOpening { player, tile } => {
                write!(f, "the {} player cannot play {} as first tile", player, tile)
            }
            Error::IllegalPass { player } => {
                write!(f, "the {} player has playable tiles, cannot pass", player)
            }
            Error::EndsMismatch { tile, ends } => {
                write!(f, "the left side of the tile {} does not match the current ends {}", tile, ends)
            }
            Error::Notation(msg) => write!(f, "notation error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

//! Core mechanics of two-player domino: tiles, tile sets, the board
//! with its move history and Zobrist hashing, and the checked board
//! that tracks what each player can know about the opponent's hand.

mod board;
mod board_plus;
mod error;
mod notation;
mod tile;
mod tileset;

pub use board::{Board, GameState, HistEntry, Placement, PlayerId};
pub use board_plus::{BoardPlus, BoardView};
pub use error::Error;
pub use notation::{parse_tile, parse_tiles};
pub use tile::{Tile, EMPTY_VALUE};
pub use tileset::TileSet;

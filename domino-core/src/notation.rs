//! Text notation for tiles and hands.
//!
//! A tile is written `L|R` with non-negative decimal values, the empty
//! tile as `-|-`. A hand is a whitespace-separated list of tiles, e.g.
//! `0|1 2|5 3|3`.

use regex::Regex;

use crate::error::Error;
use crate::tile::Tile;

/// Parses a single tile from `L|R` or `-|-` notation.
pub fn parse_tile(input: &str) -> Result<Tile, Error> {
    let s = input.trim();
    if s == "-|-" {
        return Ok(Tile::EMPTY);
    }

    let re = Regex::new(r"^(\d+)\|(\d+)$").unwrap();
    let caps = re
        .captures(s)
        .ok_or_else(|| Error::Notation(format!("'{}' is not a tile (expected L|R)", s)))?;

    let left: i32 = caps[1]
        .parse()
        .map_err(|_| Error::Notation(format!("'{}' is not a tile value", &caps[1])))?;
    let right: i32 = caps[2]
        .parse()
        .map_err(|_| Error::Notation(format!("'{}' is not a tile value", &caps[2])))?;

    Tile::new(left, right)
}

/// Parses a whitespace-separated list of tiles.
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>, Error> {
    input.split_whitespace().map(parse_tile).collect()
}

impl std::str::FromStr for Tile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tile(s)
    }
}

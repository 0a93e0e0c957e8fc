//! Prints statistics about the full-information game tree of a deal:
//! both tile sets, every leaf score in search order ("X" marks a
//! blocked game), the minimax score and the elapsed milliseconds.

use clap::Parser;
use domino_core::{parse_tiles, BoardPlus, GameState, PlayerId, TileSet};
use std::io::Write;
use std::time::Instant;

const MAX_VALUE: i32 = 6;

#[derive(Parser)]
#[command(name = "domino-tree")]
#[command(about = "Prints every leaf score of a full-information domino game tree", long_about = None)]
struct Args {
    /// Tiles of the first player, who must hold the larger double
    first_hand: String,

    /// Tiles of the second player
    second_hand: String,
}

/// Exhaustive minimax over the open board, both hands visible. Prints
/// every leaf score as it is reached; a blocked game (both players
/// still holding tiles) gets an "X" suffix.
fn minimax(
    board: &mut BoardPlus,
    out: &mut impl Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    if board.state() == GameState::Ended {
        let score = board.current_score();
        if board.num_tiles(PlayerId::First) == 0 || board.num_tiles(PlayerId::Second) == 0 {
            write!(out, " {}", score)?;
        } else {
            write!(out, " {}X", score)?;
        }
        Ok(score)
    } else if board.current_player() == PlayerId::First {
        let mut score = i32::MIN;
        for tile in board.current_player_moves() {
            board.play_tile(tile)?;
            score = score.max(minimax(board, out)?);
            board.unplay_tile()?;
        }
        Ok(score)
    } else {
        let mut score = i32::MAX;
        for tile in board.current_player_moves() {
            board.play_tile(tile)?;
            score = score.min(minimax(board, out)?);
            board.unplay_tile()?;
        }
        Ok(score)
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let set1 = TileSet::with_tiles(MAX_VALUE, &parse_tiles(&args.first_hand)?)?;
    let set2 = TileSet::with_tiles(MAX_VALUE, &parse_tiles(&args.second_hand)?)?;
    let mut board = BoardPlus::new(set1, set2)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}\t{}\t", board.player_set(PlayerId::First), board.player_set(PlayerId::Second))?;
    let start = Instant::now();
    let score = minimax(&mut board, &mut out)?;
    let elapsed = start.elapsed();
    writeln!(out, "\t{}\t{}", score, elapsed.as_millis())?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domino_core::Tile;

    fn set(pairs: &[(i32, i32)]) -> TileSet {
        let tiles: Vec<Tile> = pairs.iter().map(|&(l, r)| Tile::new(l, r).unwrap()).collect();
        TileSet::with_tiles(MAX_VALUE, &tiles).unwrap()
    }

    #[test]
    fn leaf_scores_and_minimax_value() {
        // First opens 2|2; Second chooses 2|0 (First answers 0|1 and
        // goes out for 3) or 2|1 (First answers 1|0 and goes out for
        // 2). The minimizer picks 2.
        let mut board = BoardPlus::new(set(&[(2, 2), (0, 1)]), set(&[(0, 2), (1, 2)])).unwrap();
        let mut out = Vec::new();
        let score = minimax(&mut board, &mut out).unwrap();
        assert_eq!(score, 2);
        assert_eq!(String::from_utf8(out).unwrap(), " 3 2");
    }

    #[test]
    fn blocked_leaves_are_marked() {
        // After 6|6 neither player can move: two passes end the game
        // with both hands non-empty.
        let mut board = BoardPlus::new(set(&[(6, 6), (0, 0)]), set(&[(1, 2)])).unwrap();
        let mut out = Vec::new();
        let score = minimax(&mut board, &mut out).unwrap();
        assert_eq!(score, 3);
        assert_eq!(String::from_utf8(out).unwrap(), " 3X");
    }

    #[test]
    fn search_restores_the_board() {
        let mut board = BoardPlus::new(set(&[(2, 2), (0, 1)]), set(&[(0, 2), (1, 2)])).unwrap();
        let key = board.hash_value();
        minimax(&mut board, &mut Vec::new()).unwrap();
        assert_eq!(board.hash_value(), key);
        assert_eq!(board.current_player(), PlayerId::First);
    }
}

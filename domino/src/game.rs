use std::time::{Duration, Instant};

use domino_core::{BoardPlus, GameState, PlayerId, Tile, TileSet};
use domino_search::Player;
use xoshirandom::Xoshiro256PlusPlus;

/// Errors of match setup and play.
#[derive(Debug)]
pub enum GameError {
    /// Neither hand holds a double, so nobody can open.
    NoDouble,
    /// A fixed hand does not have the configured number of tiles.
    HandSize { expected: usize, got: usize },
    /// Two disjoint hands of the requested size cannot be drawn.
    DealTooLarge { max_value: i32, hand_size: usize },
    Core(domino_core::Error),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GameError::NoDouble => {
                write!(f, "no player has a double tile: cannot start the game")
            }
            GameError::HandSize { expected, got } => {
                write!(f, "a tile set contains {} tiles instead of {}", got, expected)
            }
            GameError::DealTooLarge { max_value, hand_size } => write!(
                f,
                "cannot draw two sets of {} tiles with maximum value {}",
                hand_size, max_value
            ),
            GameError::Core(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for GameError {}

impl From<domino_core::Error> for GameError {
    fn from(e: domino_core::Error) -> Self {
        GameError::Core(e)
    }
}

/// Parameters of a match.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub max_value: i32,
    pub hand_size: usize,
    pub verbose: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { max_value: 6, hand_size: 7, verbose: false }
    }
}

/// Outcome of one game: the final score from the first seat's
/// perspective and the wall-clock time it took.
#[derive(Clone, Copy, Debug)]
pub struct Stat {
    pub score: i32,
    pub time: Duration,
}

/// Rejects configurations that cannot produce two disjoint hands.
pub fn check_deal_size(max_value: i32, hand_size: usize) -> Result<(), GameError> {
    let total = ((max_value + 1) * (max_value + 2) / 2) as usize;
    if 2 * hand_size > total {
        return Err(GameError::DealTooLarge { max_value, hand_size });
    }
    Ok(())
}

fn contains_double(tiles: &[Tile]) -> bool {
    tiles.iter().any(|t| t.is_double())
}

/// Draws `hand_size` distinct random tiles, none of them in `avoid`.
///
/// When `avoid` is a double-free hand, the draw starts with a random
/// double so that the game has an opening move.
pub fn draw_tiles(
    rng: &mut Xoshiro256PlusPlus,
    max_value: i32,
    hand_size: usize,
    avoid: Option<&[Tile]>,
) -> Result<Vec<Tile>, GameError> {
    let values = max_value as u32 + 1;
    let mut hand = Vec::with_capacity(hand_size);

    if let Some(avoid) = avoid {
        if !contains_double(avoid) {
            let v = rng.next_index(values) as i32;
            hand.push(Tile::new(v, v)?);
        }
    }

    while hand.len() != hand_size {
        let tile = Tile::new(rng.next_index(values) as i32, rng.next_index(values) as i32)?;
        if avoid.map_or(true, |a| !a.contains(&tile)) && !hand.contains(&tile) {
            hand.push(tile);
        }
    }
    Ok(hand)
}

/// Builds the two starting sets, drawing random hands for the missing
/// ones, and orders them so the holder of the largest double sits
/// first.
///
/// Returns the ordered sets and whether they were swapped; the caller
/// must swap its players the same way.
pub fn setup_tile_sets(
    rng: &mut Xoshiro256PlusPlus,
    max_value: i32,
    hand_size: usize,
    first: Option<Vec<Tile>>,
    second: Option<Vec<Tile>>,
) -> Result<([TileSet; 2], bool), GameError> {
    for hand in [&first, &second].into_iter().flatten() {
        if hand.len() != hand_size {
            return Err(GameError::HandSize { expected: hand_size, got: hand.len() });
        }
    }

    let (first, second) = match (first, second) {
        (None, None) => {
            let first = draw_tiles(rng, max_value, hand_size, None)?;
            let second = draw_tiles(rng, max_value, hand_size, Some(&first))?;
            (first, second)
        }
        (None, Some(second)) => {
            let first = draw_tiles(rng, max_value, hand_size, Some(&second))?;
            (first, second)
        }
        (Some(first), None) => {
            let second = draw_tiles(rng, max_value, hand_size, Some(&first))?;
            (first, second)
        }
        (Some(first), Some(second)) => (first, second),
    };

    let mut sets = [
        TileSet::with_tiles(max_value, &first)?,
        TileSet::with_tiles(max_value, &second)?,
    ];

    let d0 = sets[0].largest_double();
    let d1 = sets[1].largest_double();
    if d0.is_empty() && d1.is_empty() {
        return Err(GameError::NoDouble);
    }
    let swapped = d1.max_value() > d0.max_value();
    if swapped {
        sets.swap(0, 1);
    }
    Ok((sets, swapped))
}

/// Plays one full game between the two players over the given sets and
/// returns its score and duration. The first set must hold the opening
/// double.
pub fn run_match(
    players: &mut [Box<dyn Player>; 2],
    sets: &[TileSet; 2],
    verbose: bool,
) -> Result<Stat, GameError> {
    players[0].init(&sets[0], PlayerId::First, verbose);
    players[1].init(&sets[1], PlayerId::Second, verbose);
    let mut board = BoardPlus::new(sets[0].clone(), sets[1].clone())?;

    let start = Instant::now();
    while board.state() == GameState::Open {
        let current = board.current_player();
        if verbose {
            eprintln!("\n{} player ({}) turn", current, players[current.index()].name());
        }
        let tile = players[current.index()].select_tile(&board.view(current));
        board.play_tile(tile)?;
        if verbose {
            eprintln!("{}", board);
        }
    }
    Ok(Stat { score: board.current_score(), time: start.elapsed() })
}

/// Plays one game and prints a tab-separated result line: both players
/// and hands, the score, and the time in milliseconds.
pub fn single_match(
    players: &mut [Box<dyn Player>; 2],
    sets: &[TileSet; 2],
    verbose: bool,
) -> Result<(), GameError> {
    print!("{}\t{}\t{}\t{}", players[0].name(), sets[0], players[1].name(), sets[1]);
    let stat = run_match(players, sets, verbose)?;
    println!("\t{}\t{}", stat.score, stat.time.as_millis());
    Ok(())
}

/// Plays random deals until one player reaches 100 points, reseating
/// the players each round so the larger double always opens. The
/// winner of a game collects its absolute score.
pub fn tournament(
    players: &mut [Box<dyn Player>; 2],
    rng: &mut Xoshiro256PlusPlus,
    config: &GameConfig,
) -> Result<(), GameError> {
    // totals is indexed by the original seating; order maps the current
    // seat back to it.
    let mut totals = [0i32; 2];
    let mut order = [0usize, 1usize];

    while totals[0].max(totals[1]) < 100 {
        let (sets, swapped) =
            setup_tile_sets(rng, config.max_value, config.hand_size, None, None)?;
        if swapped {
            players.swap(0, 1);
            order.swap(0, 1);
        }

        print!("{}\t{}\t{}\t{}", players[0].name(), sets[0], players[1].name(), sets[1]);
        let stat = run_match(players, &sets, config.verbose)?;
        print!("\t{}", stat.score);
        if stat.score > 0 {
            totals[order[0]] += stat.score;
        } else {
            totals[order[1]] -= stat.score;
        }

        let seat0 = if order[0] == 0 { 0 } else { 1 };
        let seat1 = 1 - seat0;
        println!(
            "\t{}: {}\t{}: {}",
            players[seat0].name(),
            totals[0],
            players[seat1].name(),
            totals[1]
        );
    }

    let seat0 = if order[0] == 0 { 0 } else { 1 };
    let seat1 = 1 - seat0;
    let (loser, lost, winner, won) = if totals[0] < totals[1] {
        (players[seat0].name(), totals[0], players[seat1].name(), totals[1])
    } else {
        (players[seat1].name(), totals[1], players[seat0].name(), totals[0])
    };
    println!("\nLoser:  {} Score: {}", loser, lost);
    println!("\nWinner: {} Score: {}", winner, won);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(pairs: &[(i32, i32)]) -> Vec<Tile> {
        pairs.iter().map(|&(l, r)| Tile::new(l, r).unwrap()).collect()
    }

    #[test]
    fn deal_size_limits() {
        assert!(check_deal_size(6, 14).is_ok());
        assert!(matches!(check_deal_size(6, 15), Err(GameError::DealTooLarge { .. })));
        assert!(check_deal_size(2, 3).is_ok());
        assert!(matches!(check_deal_size(2, 4), Err(GameError::DealTooLarge { .. })));
    }

    #[test]
    fn drawn_hands_are_distinct_and_disjoint() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let first = draw_tiles(&mut rng, 6, 7, None).unwrap();
        let second = draw_tiles(&mut rng, 6, 7, Some(&first)).unwrap();
        assert_eq!(first.len(), 7);
        assert_eq!(second.len(), 7);
        for (i, t) in first.iter().enumerate() {
            assert!(!first[i + 1..].contains(t));
            assert!(!second.contains(t));
        }
    }

    #[test]
    fn draw_seeds_a_double_when_the_fixed_hand_has_none() {
        let fixed = tiles(&[(0, 1), (1, 2)]);
        for seed in 0..20 {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let drawn = draw_tiles(&mut rng, 6, 3, Some(&fixed)).unwrap();
            assert!(contains_double(&drawn), "no double in {:?}", drawn);
        }
    }

    #[test]
    fn drawing_is_reproducible_from_the_seed() {
        let mut a = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(7);
        assert_eq!(
            draw_tiles(&mut a, 6, 7, None).unwrap(),
            draw_tiles(&mut b, 6, 7, None).unwrap()
        );
    }

    #[test]
    fn setup_puts_the_larger_double_first() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let (sets, swapped) = setup_tile_sets(
            &mut rng,
            6,
            2,
            Some(tiles(&[(3, 3), (0, 1)])),
            Some(tiles(&[(5, 5), (0, 2)])),
        )
        .unwrap();
        assert!(swapped);
        assert_eq!(sets[0].largest_double(), Tile::new(5, 5).unwrap());
        assert_eq!(sets[1].largest_double(), Tile::new(3, 3).unwrap());
    }

    #[test]
    fn setup_rejects_doubleless_deals_and_short_hands() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let err = setup_tile_sets(
            &mut rng,
            6,
            2,
            Some(tiles(&[(0, 1), (1, 2)])),
            Some(tiles(&[(0, 2), (2, 3)])),
        );
        assert!(matches!(err, Err(GameError::NoDouble)));

        let err = setup_tile_sets(&mut rng, 6, 3, Some(tiles(&[(0, 1)])), None);
        assert!(matches!(err, Err(GameError::HandSize { expected: 3, got: 1 })));
    }
}

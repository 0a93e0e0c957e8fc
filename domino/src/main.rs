use clap::Parser;
use domino::game::{
    check_deal_size, setup_tile_sets, single_match, tournament, GameConfig,
};
use domino_core::parse_tiles;
use domino_search::{player_for, strategy_names, Player};
use std::time::{SystemTime, UNIX_EPOCH};
use xoshirandom::Xoshiro256PlusPlus;

#[derive(Parser)]
#[command(name = "domino")]
#[command(about = "Plays a two-player domino match between two strategies", long_about = None)]
struct Args {
    /// Maximum value for a tile
    #[arg(short = 'm', default_value_t = 6)]
    max_value: i32,

    /// Number of tiles per player
    #[arg(short = 'n', default_value_t = 7)]
    hand_size: usize,

    /// Tiles for the first player, e.g. "6|6 0|1 2|5" (default: random)
    #[arg(short = '1', value_name = "TILES")]
    first_hand: Option<String>,

    /// Tiles for the second player (default: random)
    #[arg(short = '2', value_name = "TILES")]
    second_hand: Option<String>,

    /// Play again swapping first and second player
    #[arg(short = 's', long)]
    swap: bool,

    /// Tournament mode: play on random sets until one player reaches 100 points
    #[arg(short = 't', long)]
    tournament: bool,

    /// Verbose mode
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Random seed for dealing (defaults to current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Strategy of the first player
    first_player: String,

    /// Strategy of the second player
    second_player: String,
}

fn resolve_player(name: &str) -> Result<Box<dyn Player>, String> {
    player_for(name).ok_or_else(|| {
        format!(
            "unknown strategy '{}' (available: {})",
            name,
            strategy_names().join(", ")
        )
    })
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.max_value < 0 {
        return Err("the maximum tile value cannot be negative".into());
    }
    if args.hand_size == 0 {
        return Err("each player should draw at least one tile".into());
    }
    check_deal_size(args.max_value, args.hand_size)?;

    let mut players = [
        resolve_player(&args.first_player)?,
        resolve_player(&args.second_player)?,
    ];

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    });
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let config = GameConfig {
        max_value: args.max_value,
        hand_size: args.hand_size,
        verbose: args.verbose,
    };

    if args.tournament {
        tournament(&mut players, &mut rng, &config)?;
        return Ok(());
    }

    let first = args.first_hand.as_deref().map(parse_tiles).transpose()?;
    let second = args.second_hand.as_deref().map(parse_tiles).transpose()?;
    let (sets, swapped) =
        setup_tile_sets(&mut rng, args.max_value, args.hand_size, first, second)?;
    if swapped {
        players.swap(0, 1);
    }

    single_match(&mut players, &sets, args.verbose)?;
    if args.swap {
        players.swap(0, 1);
        single_match(&mut players, &sets, args.verbose)?;
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

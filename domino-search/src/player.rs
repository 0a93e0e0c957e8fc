use domino_core::{BoardView, PlayerId, Tile, TileSet};

use crate::expectimax::{ExpectimaxKind, ExpectimaxPlayer};
use crate::greedy::GreedyPlayer;
use crate::maximax::{MaximaxKind, MaximaxPlayer};
use crate::minimax::{MinimaxKind, MinimaxPlayer};
use crate::minregret::{MinregretKind, MinregretPlayer};

/// A move-selection strategy.
pub trait Player {
    /// Prepares the player for a new game with the given starting hand
    /// and seat. `verbose` allows the player to print diagnostics to
    /// stderr while selecting.
    fn init(&mut self, set: &TileSet, id: PlayerId, verbose: bool);

    /// Chooses the tile to play for the position in `view`. Returns the
    /// empty tile to pass.
    fn select_tile(&mut self, view: &BoardView<'_>) -> Tile;

    /// Display name of this strategy.
    fn name(&self) -> &'static str;
}

/// The strategy identifiers accepted by [`player_for`].
pub fn strategy_names() -> &'static [&'static str] {
    &[
        "greedy",
        "minimax",
        "minimax-ab",
        "minimax-tt",
        "maximax",
        "maximax-pr",
        "maximax-tt",
        "expectimax",
        "expectimax-tt",
        "minregret",
        "minregret-tt",
    ]
}

/// Builds the player registered under `name`, or `None` for an unknown
/// identifier.
pub fn player_for(name: &str) -> Option<Box<dyn Player>> {
    let player: Box<dyn Player> = match name {
        "greedy" => Box::new(GreedyPlayer::new()),
        "minimax" => Box::new(MinimaxPlayer::new(MinimaxKind::Plain)),
        "minimax-ab" => Box::new(MinimaxPlayer::new(MinimaxKind::AlphaBeta)),
        "minimax-tt" => Box::new(MinimaxPlayer::new(MinimaxKind::Transposition)),
        "maximax" => Box::new(MaximaxPlayer::new(MaximaxKind::Plain)),
        "maximax-pr" => Box::new(MaximaxPlayer::new(MaximaxKind::Pruning)),
        "maximax-tt" => Box::new(MaximaxPlayer::new(MaximaxKind::Transposition)),
        "expectimax" => Box::new(ExpectimaxPlayer::new(ExpectimaxKind::Plain)),
        "expectimax-tt" => Box::new(ExpectimaxPlayer::new(ExpectimaxKind::Transposition)),
        "minregret" => Box::new(MinregretPlayer::new(MinregretKind::Plain)),
        "minregret-tt" => Box::new(MinregretPlayer::new(MinregretKind::Transposition)),
        _ => return None,
    };
    Some(player)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_resolves() {
        for name in strategy_names() {
            assert!(player_for(name).is_some(), "no player for '{}'", name);
        }
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert!(player_for("montecarlo").is_none());
        assert!(player_for("").is_none());
        assert!(player_for("MiniMax").is_none());
    }

    #[test]
    fn names_match_their_strategies() {
        assert_eq!(player_for("greedy").unwrap().name(), "Greedy");
        assert_eq!(player_for("minimax-tt").unwrap().name(), "MiniMaxTT");
        assert_eq!(player_for("maximax-pr").unwrap().name(), "MaxiMaxPR");
        assert_eq!(player_for("expectimax").unwrap().name(), "ExpectiMax");
        assert_eq!(player_for("minregret-tt").unwrap().name(), "MinRegretTT");
    }
}

//! Move-selection strategies for two-player domino under hidden
//! information.
//!
//! Every strategy searches over the same model: its own hand plus the
//! opponent's candidate pool (every tile the opponent may still hold),
//! with the opponent's true tile count as a budget. They differ in how
//! they resolve the opponent's hidden hand:
//!
//! - `greedy` plays the heaviest playable tile, no search
//! - `minimax` assumes the candidate pool conspires against us
//! - `maximax` assumes it cooperates
//! - `expectimax` weighs opponent moves by their play probability
//! - `minregret` minimizes the maximum expected regret across moves
//!
//! The searching strategies come in plain and accelerated variants
//! (alpha-beta, optimistic pruning, transposition tables) that compute
//! the same choices faster.

mod expectimax;
mod greedy;
mod maximax;
mod minimax;
mod minregret;
mod player;
mod probability;
mod search;

pub use expectimax::{ExpectimaxKind, ExpectimaxPlayer};
pub use greedy::GreedyPlayer;
pub use maximax::{MaximaxKind, MaximaxPlayer};
pub use minimax::{MinimaxKind, MinimaxPlayer};
pub use minregret::{MinregretKind, MinregretPlayer, RegretScore};
pub use player::{player_for, strategy_names, Player};

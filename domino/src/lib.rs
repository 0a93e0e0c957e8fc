//! Match runner for two-player domino: deals hands, pairs two
//! strategies from `domino-search` and plays checked games to the end.

pub mod game;

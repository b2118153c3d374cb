pub mod model;
pub mod reducer;
pub mod rules;
pub mod selectors;
pub mod validation;

// Re-export the main types
pub use model::{GameState, Phase, Player, PlayerId, RoundEntry};
pub use reducer::{reduce, Action, GameMachine};

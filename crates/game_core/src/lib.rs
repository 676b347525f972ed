pub mod controller;
pub mod high_scores;
pub mod session;

pub use controller::{CommandReply, ControllerConfig, GameController, GameHandle};
pub use high_scores::HighScores;
pub use session::{GameSession, SessionConfig, TickOutcome};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("hole index {0} is outside the 3x3 board")]
    InvalidHole(u8),
    /// A view issued a command without a running game controller behind its handle.
    #[error("game controller is not running; views must be wired to a live controller")]
    ControllerUnavailable,
    #[error("game controller dropped the reply for {command}")]
    ReplyDropped { command: &'static str },
}

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Not this player's turn")]
    NotYourTurn,
    #[error("Move is not allowed by the rules")]
    IllegalMove,
    #[error("Nothing is selected")]
    NothingSelected,
    #[error("Not enough coins")]
    InsufficientFunds,
    #[error("Item already owned")]
    AlreadyOwned,
    #[error("Item is not owned")]
    NotOwned,
    #[error("Unknown item")]
    UnknownItem,
    #[error("Action not available in the current phase")]
    WrongPhase,
}

pub type Result<T> = core::result::Result<T, GameError>;

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Snake must have at least one cell")]
    EmptySnake,
    #[error("Snake cells must be unique")]
    OverlappingSnake,
    #[error("Snake cells must be orthogonally connected")]
    DisconnectedSnake,
    #[error("Food cannot be placed on the snake")]
    FoodOnSnake,
}

pub type Result<T> = core::result::Result<T, GameError>;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Not enough words fit the board, need {required} but only {available} are available")]
    InsufficientWords { required: usize, available: usize },
    #[error("Could not find a free position for word {word:?}")]
    Placement { word: String },
    #[error("Invalid difficulty profile: {0}")]
    InvalidProfile(&'static str),
    #[error("Invalid word catalog entry on line {line}")]
    InvalidCatalogEntry { line: usize },
    #[error("Invalid word catalog JSON: {0}")]
    InvalidCatalogJson(String),
    #[error("Board layout has overlapping or out of bounds parts")]
    InvalidLayout,
    #[error("Invalid game snapshot: {0}")]
    InvalidSnapshot(&'static str),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;

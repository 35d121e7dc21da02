use serde::{Deserialize, Serialize};

pub use board::*;
pub use catalog::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use hint::*;
pub use score::*;
pub use summary::*;
pub use tile::*;
pub use types::*;

mod board;
mod catalog;
mod difficulty;
mod engine;
mod error;
mod generator;
mod hint;
mod score;
mod summary;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed(CellMark),
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed(_) => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}

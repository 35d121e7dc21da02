use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, profile: &DifficultyProfile, catalog: &WordCatalog) -> Result<Board>;
}

use serde::{Deserialize, Serialize};

use crate::*;

/// Common English letters, most frequent first, used for decoy fill.
pub const COMMON_LETTERS: &str = "ETAOINSHRDLCUMWFGYPBVKJXQZ";

/// Scoring constants that apply while a given number of words is still hidden.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub words_left: usize,
    /// Base penalty set by a random click made during this stage.
    pub random_click_penalty: i64,
    /// Random-click cap once this stage is entered by revealing a word.
    pub click_cap: u32,
    /// Random clicks forgiven when this stage is entered by revealing a word.
    pub forgiveness: u32,
    /// Per-remaining-click bonus awarded when this stage is entered by revealing a word.
    pub bonus: i64,
}

impl Stage {
    pub const fn new(
        words_left: usize,
        random_click_penalty: i64,
        click_cap: u32,
        forgiveness: u32,
        bonus: i64,
    ) -> Self {
        Self {
            words_left,
            random_click_penalty,
            click_cap,
            forgiveness,
            bonus,
        }
    }
}

/// Built-in difficulty levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Simple,
    Easy,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Simple,
        Difficulty::Easy,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Self::Simple => DifficultyProfile::simple(),
            Self::Easy => DifficultyProfile::easy(),
            Self::Hard => DifficultyProfile::hard(),
            Self::Expert => DifficultyProfile::expert(),
        }
    }
}

impl From<Difficulty> for DifficultyProfile {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.profile()
    }
}

/// Every constant the generator and the scoring engine depend on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub side: Coord,
    pub word_count: usize,
    pub mine_count: CellCount,
    /// Chance that a blank cell left after word placement receives a decoy letter.
    pub fill_probability: f64,
    /// Random positions tried per word before giving up.
    pub placement_attempts: u32,
    pub mine_base_penalty: f64,
    /// Mines that may be stepped on before the game is lost, if limited.
    pub mine_loss_limit: Option<u32>,
    /// Whether revealing every word with a negative score counts as a loss.
    pub lose_on_negative_score: bool,
    pub initial_click_cap: u32,
    pub stages: Vec<Stage>,
}

impl DifficultyProfile {
    /// Exploratory board: many decoys, no scoring stages.
    pub fn simple() -> Self {
        Self {
            side: 7,
            word_count: 3,
            mine_count: 5,
            fill_probability: 0.30,
            placement_attempts: 1000,
            mine_base_penalty: 1000.0,
            mine_loss_limit: None,
            lose_on_negative_score: false,
            initial_click_cap: 5,
            stages: Vec::new(),
        }
    }

    pub fn easy() -> Self {
        Self {
            side: 7,
            word_count: 3,
            mine_count: 6,
            fill_probability: 0.15,
            placement_attempts: 1000,
            mine_base_penalty: 1000.0,
            mine_loss_limit: Some(3),
            lose_on_negative_score: true,
            initial_click_cap: 5,
            stages: vec![
                Stage::new(3, 700, 10, 0, 800),
                Stage::new(2, 1100, 9, 5, 1200),
                Stage::new(1, 1500, 7, 3, 1700),
            ],
        }
    }

    pub fn hard() -> Self {
        Self {
            side: 10,
            word_count: 5,
            mine_count: 9,
            fill_probability: 0.16,
            placement_attempts: 1000,
            mine_base_penalty: 1250.0,
            mine_loss_limit: Some(3),
            lose_on_negative_score: true,
            initial_click_cap: 5,
            stages: vec![
                Stage::new(5, 400, 16, 0, 800),
                Stage::new(4, 600, 14, 7, 900),
                Stage::new(3, 900, 12, 6, 1000),
                Stage::new(2, 1200, 10, 5, 1200),
                Stage::new(1, 1500, 8, 3, 1500),
            ],
        }
    }

    pub fn expert() -> Self {
        Self {
            side: 12,
            word_count: 7,
            mine_count: 12,
            fill_probability: 0.17,
            placement_attempts: 2000,
            mine_base_penalty: 1500.0,
            mine_loss_limit: None,
            lose_on_negative_score: false,
            initial_click_cap: 5,
            stages: vec![
                Stage::new(7, 200, 22, 0, 800),
                Stage::new(6, 300, 19, 10, 700),
                Stage::new(5, 400, 17, 0, 650),
                Stage::new(4, 800, 15, 9, 500),
                Stage::new(3, 1100, 12, 8, 450),
                Stage::new(2, 1500, 11, 7, 400),
                Stage::new(1, 1700, 9, 5, 350),
            ],
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.side)
    }

    pub fn stage(&self, words_left: usize) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.words_left == words_left)
    }

    pub fn validate(&self) -> Result<()> {
        if self.side == 0 {
            return Err(GameError::InvalidProfile("board side must be positive"));
        }
        if self.word_count == 0 {
            return Err(GameError::InvalidProfile("at least one word is required"));
        }
        if !(0.0..=1.0).contains(&self.fill_probability) {
            return Err(GameError::InvalidProfile("fill probability must be within 0..=1"));
        }
        if self.placement_attempts == 0 {
            return Err(GameError::InvalidProfile("placement attempts must be positive"));
        }
        if !self.mine_base_penalty.is_finite() {
            return Err(GameError::InvalidProfile("mine penalty must be finite"));
        }
        if self.mine_loss_limit == Some(0) {
            return Err(GameError::InvalidProfile("mine loss limit must be positive"));
        }
        Ok(())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::easy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_are_valid() {
        for difficulty in Difficulty::ALL {
            let profile = difficulty.profile();
            profile.validate().unwrap();
            assert!(profile.stages.iter().all(|s| s.words_left <= profile.word_count));
        }
    }

    #[test]
    fn stage_lookup_by_words_left() {
        let profile = DifficultyProfile::expert();
        assert_eq!(profile.stage(4).map(|s| s.click_cap), Some(15));
        assert_eq!(profile.stage(0), None);
    }

    #[test]
    fn rejects_out_of_range_fill() {
        let profile = DifficultyProfile {
            fill_probability: 1.5,
            ..DifficultyProfile::easy()
        };
        assert!(matches!(profile.validate(), Err(GameError::InvalidProfile(_))));
    }

    #[test]
    fn rejects_zero_mine_loss_limit() {
        let profile = DifficultyProfile {
            mine_loss_limit: Some(0),
            ..DifficultyProfile::easy()
        };
        assert_eq!(
            profile.validate(),
            Err(GameError::InvalidProfile("mine loss limit must be positive"))
        );
    }
}

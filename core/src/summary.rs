use serde::{Deserialize, Serialize};

use crate::*;

/// End-of-game (or in-progress) snapshot suitable for a result screen or a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub state: EngineState,
    pub score: i64,
    pub moves: u32,
    pub mines_stepped: u32,
    pub random_clicks: u32,
    pub words_total: usize,
    pub words_revealed: usize,
    pub longest_word_revealed: Option<String>,
}

impl GameSummary {
    pub fn from_game(game: &GameState) -> Self {
        let longest_word_revealed = game
            .revealed_words()
            .reduce(|longest, word| if word.len() > longest.len() { word } else { longest })
            .map(str::to_owned);

        Self {
            state: game.state(),
            score: game.score(),
            moves: game.move_count(),
            mines_stepped: game.mines_stepped(),
            random_clicks: game.random_clicks(),
            words_total: game.board().words().len(),
            words_revealed: game.revealed_words().count(),
            longest_word_revealed,
        }
    }

    pub const fn won(&self) -> bool {
        matches!(self.state, EngineState::Won)
    }
}

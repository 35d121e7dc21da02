use wordweeper_core::*;

/// Aggregated results over a batch of simulated games.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimReport {
    pub games: u32,
    pub wins: u32,
    pub lost_to_mines: u32,
    pub lost_to_score: u32,
    pub avg_score: f64,
    pub best_score: i64,
    pub worst_score: i64,
    pub avg_moves: f64,
    pub avg_mines_stepped: f64,
    pub avg_random_clicks: f64,
    pub avg_words_revealed: f64,
}

impl SimReport {
    pub fn from_games(games: &[GameSummary]) -> Self {
        if games.is_empty() {
            return Self::default();
        }
        let count = games.len() as f64;
        let average =
            |value: fn(&GameSummary) -> f64| games.iter().map(value).sum::<f64>() / count;
        let lost = |reason| {
            games
                .iter()
                .filter(|summary| summary.state == EngineState::Lost(reason))
                .count() as u32
        };

        Self {
            games: games.len() as u32,
            wins: games.iter().filter(|summary| summary.won()).count() as u32,
            lost_to_mines: lost(LossReason::MinesStepped),
            lost_to_score: lost(LossReason::NegativeScore),
            avg_score: average(|summary| summary.score as f64),
            best_score: games.iter().map(|summary| summary.score).max().unwrap_or_default(),
            worst_score: games.iter().map(|summary| summary.score).min().unwrap_or_default(),
            avg_moves: average(|summary| f64::from(summary.moves)),
            avg_mines_stepped: average(|summary| f64::from(summary.mines_stepped)),
            avg_random_clicks: average(|summary| f64::from(summary.random_clicks)),
            avg_words_revealed: average(|summary| summary.words_revealed as f64),
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games)
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&format!("Games:            {}\n", self.games));
        text.push_str(&format!(
            "Won:              {} ({:.1}%)\n",
            self.wins,
            self.win_rate() * 100.0
        ));
        text.push_str(&format!("Lost to mines:    {}\n", self.lost_to_mines));
        text.push_str(&format!("Lost to score:    {}\n", self.lost_to_score));
        text.push_str(&format!(
            "Score:            avg {:.0}, best {}, worst {}\n",
            self.avg_score, self.best_score, self.worst_score
        ));
        text.push_str(&format!("Avg moves:        {:.1}\n", self.avg_moves));
        text.push_str(&format!("Avg mines hit:    {:.2}\n", self.avg_mines_stepped));
        text.push_str(&format!("Avg random clicks:{:.2}\n", self.avg_random_clicks));
        text.push_str(&format!("Avg words found:  {:.2}\n", self.avg_words_revealed));
        text
    }
}

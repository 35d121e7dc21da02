use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// Steepness of the random-click curve.
const CLICK_CURVE: f64 = 0.01;

/// Multiplier applied to the random-click base penalty.
///
/// Exponential well below the cap, a linear ramp over the last two clicks before it, and plain
/// exponential past it. Reaches exactly `1.0` at the cap.
pub fn penalty_multiplier(counter: u32, cap: u32) -> f64 {
    let counter = f64::from(counter);
    let cap = f64::from(cap);

    if counter <= cap - 2.0 {
        (CLICK_CURVE * (counter - cap)).exp() - 0.6
    } else if counter <= cap {
        (counter - (cap - 2.0)) / 2.0
    } else {
        (CLICK_CURVE * (counter - cap)).exp()
    }
}

/// Penalty for stepping on a mine with `uncovered` cells open, this mine included.
///
/// Grows with the number of open cells; smaller boards grow faster.
pub fn mine_penalty(uncovered: CellCount, total_cells: CellCount, base: f64) -> i64 {
    let total = f64::from(total_cells);
    let k = (220.0 - total) / 3000.0;
    let scale = (k * (f64::from(uncovered) - 5.0)).exp() - total / 900.0;
    (scale * base).floor() as i64
}

/// Points for completing a word, with the clean-reveal bonus when earned.
pub fn word_award(len: usize, complexity: u32, clean: bool) -> i64 {
    let weight = len as i64 * i64::from(complexity);
    let bonus = if clean { weight * 50 } else { 0 };
    weight * 100 + bonus
}

/// Per-session score and the counters that shape it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: i64,
    pub moves: Saturating<u32>,
    pub mines_stepped: Saturating<u32>,
    pub random_clicks: u32,
    pub click_cap: u32,
    /// Set by the latest random click and charged on every safe reveal after it.
    pub random_click_base: i64,
}

impl ScoreState {
    pub fn new(profile: &DifficultyProfile) -> Self {
        Self {
            score: 0,
            moves: Saturating(0),
            mines_stepped: Saturating(0),
            random_clicks: 0,
            click_cap: profile.initial_click_cap,
            random_click_base: 0,
        }
    }

    pub fn step_on_mine(
        &mut self,
        uncovered: CellCount,
        total_cells: CellCount,
        base: f64,
    ) -> i64 {
        self.mines_stepped += 1;
        let penalty = mine_penalty(uncovered, total_cells, base);
        self.score -= penalty;
        penalty
    }

    pub fn record_random_click(&mut self, base_penalty: i64) {
        self.random_clicks += 1;
        self.random_click_base = base_penalty;
    }

    /// Charges the current random-click penalty and returns it.
    pub fn charge_click(&mut self) -> i64 {
        let multiplier = penalty_multiplier(self.random_clicks, self.click_cap);
        // truncates towards zero
        let penalty = (self.random_click_base as f64 * multiplier) as i64;
        self.score -= penalty;
        penalty
    }

    /// Applies a stage entered by revealing a word and returns the bonus awarded.
    pub fn enter_stage(&mut self, stage: Option<&Stage>) -> i64 {
        let Some(stage) = stage else {
            return 0;
        };

        self.click_cap = stage.click_cap;
        self.random_clicks = self.random_clicks.saturating_sub(stage.forgiveness);

        if self.random_clicks > self.click_cap {
            return 0;
        }
        let remaining = i64::from(self.click_cap - self.random_clicks).max(1);
        let bonus = stage.bonus * remaining;
        self.score += bonus;
        bonus
    }
}

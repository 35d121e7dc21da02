use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    MinesStepped,
    NegativeScore,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
    Lost(LossReason),
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost(_))
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// A word that became fully uncovered during a reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCompletion {
    pub index: usize,
    pub word: String,
    pub clean: bool,
    /// Base points plus the clean-reveal bonus.
    pub award: i64,
    pub stage_bonus: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub score_delta: i64,
    pub completed: SmallVec<[WordCompletion; 1]>,
    pub state: EngineState,
}

impl RevealReport {
    fn unchanged(state: EngineState) -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            score_delta: 0,
            completed: SmallVec::new(),
            state,
        }
    }

    pub const fn has_update(&self) -> bool {
        self.outcome.has_update()
    }

    pub const fn mine_hit(&self) -> bool {
        matches!(self.outcome, RevealOutcome::HitMine)
    }

    pub const fn won(&self) -> bool {
        matches!(self.state, EngineState::Won)
    }

    pub const fn lost(&self) -> bool {
        matches!(self.state, EngineState::Lost(_))
    }
}

/// Per-word view for the word list beside the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WordStatus<'a> {
    pub word: &'a str,
    pub complexity: u32,
    pub revealed: bool,
}

/// One game session: the static board plus everything the player has changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot")]
pub struct GameState {
    profile: DifficultyProfile,
    board: Board,
    cells: Array2<EngineCell>,
    uncovered_count: CellCount,
    score: ScoreState,
    /// Cells revealed while each word was the current word, by word index.
    reveal_status: Vec<SmallVec<[Coord2; 8]>>,
    revealed: Vec<bool>,
    current_word: Option<usize>,
    state: EngineState,
}

/// Loaded form of a [`GameState`], checked against its board before use.
#[derive(Deserialize)]
struct GameSnapshot {
    profile: DifficultyProfile,
    board: Board,
    cells: Array2<EngineCell>,
    uncovered_count: CellCount,
    score: ScoreState,
    reveal_status: Vec<SmallVec<[Coord2; 8]>>,
    revealed: Vec<bool>,
    current_word: Option<usize>,
    state: EngineState,
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = GameError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self> {
        snapshot.profile.validate()?;
        let word_count = snapshot.board.words().len();

        if snapshot.cells.dim() != grid_shape(snapshot.board.side()) {
            return Err(GameError::InvalidSnapshot("cell matrix does not match the board"));
        }
        if snapshot.revealed.len() != word_count || snapshot.reveal_status.len() != word_count {
            return Err(GameError::InvalidSnapshot(
                "word tracking does not match the board words",
            ));
        }
        if snapshot.current_word.is_some_and(|index| index >= word_count) {
            return Err(GameError::InvalidSnapshot("current word is out of range"));
        }
        let uncovered = snapshot.cells.iter().filter(|cell| !cell.is_covered()).count();
        if uncovered != usize::from(snapshot.uncovered_count) {
            return Err(GameError::InvalidSnapshot("uncovered count does not match the cells"));
        }

        Ok(Self {
            profile: snapshot.profile,
            board: snapshot.board,
            cells: snapshot.cells,
            uncovered_count: snapshot.uncovered_count,
            score: snapshot.score,
            reveal_status: snapshot.reveal_status,
            revealed: snapshot.revealed,
            current_word: snapshot.current_word,
            state: snapshot.state,
        })
    }
}

impl GameState {
    /// Generates a fresh board and starts a session on it.
    pub fn new_game<R: Rng>(
        profile: impl Into<DifficultyProfile>,
        catalog: &WordCatalog,
        rng: &mut R,
    ) -> Result<Self> {
        let profile = profile.into();
        let board = RandomBoardGenerator::new(rng).generate(&profile, catalog)?;
        Ok(Self::from_board(profile, board))
    }

    pub fn from_board(profile: DifficultyProfile, board: Board) -> Self {
        let side = board.side();
        let word_count = board.words().len();
        Self {
            score: ScoreState::new(&profile),
            profile,
            board,
            cells: Array2::default(grid_shape(side)),
            uncovered_count: 0,
            reveal_status: vec![SmallVec::new(); word_count],
            revealed: vec![false; word_count],
            current_word: None,
            state: EngineState::default(),
        }
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn side(&self) -> Coord {
        self.board.side()
    }

    pub fn score(&self) -> i64 {
        self.score.score
    }

    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }

    pub fn move_count(&self) -> u32 {
        self.score.moves.0
    }

    pub fn mines_stepped(&self) -> u32 {
        self.score.mines_stepped.0
    }

    pub fn random_clicks(&self) -> u32 {
        self.score.random_clicks
    }

    pub fn random_click_cap(&self) -> u32 {
        self.score.click_cap
    }

    pub fn uncovered_count(&self) -> CellCount {
        self.uncovered_count
    }

    pub fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.cells[coords.to_nd_index()]
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.board.validate_coords(coords)?;
        let cell = self.cell_at(coords);
        Ok(CellView {
            covered: cell.is_covered(),
            mark: cell.mark(),
            mine_hint: self.board.mine_hint(coords),
            letter_hint: self.board.letter_hint(coords),
            content: (!cell.is_covered()).then(|| self.board[coords]),
        })
    }

    pub fn words(&self) -> impl Iterator<Item = WordStatus<'_>> {
        self.board
            .words()
            .iter()
            .zip(&self.revealed)
            .map(|(placement, &revealed)| WordStatus {
                word: &placement.word,
                complexity: placement.complexity,
                revealed,
            })
    }

    pub fn revealed_words(&self) -> impl Iterator<Item = &str> {
        self.words()
            .filter(|status| status.revealed)
            .map(|status| status.word)
    }

    pub fn words_left(&self) -> usize {
        self.revealed.iter().filter(|&&revealed| !revealed).count()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word
            .map(|index| self.board.words()[index].word.as_str())
    }

    pub fn reveal_status(&self, word_index: usize) -> &[Coord2] {
        self.reveal_status
            .get(word_index)
            .map_or(&[], |cells| cells.as_slice())
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::from_game(self)
    }

    /// Cycles the marker of a covered cell: none, flagged, questioned.
    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = &mut self.cells[coords.to_nd_index()];
        Ok(match *cell {
            EngineCell::Covered(mark) => {
                let next = mark.next();
                *cell = EngineCell::Covered(next);
                MarkOutcome::Changed(next)
            }
            EngineCell::Uncovered => MarkOutcome::NoChange,
        })
    }

    /// Uncovers a covered, unmarked cell and scores it.
    ///
    /// Uncovered or marked cells are left alone and report [`RevealOutcome::NoChange`].
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.cell_at(coords) != EngineCell::Covered(CellMark::None) {
            return Ok(RevealReport::unchanged(self.state));
        }

        let score_before = self.score.score;
        self.cells[coords.to_nd_index()] = EngineCell::Uncovered;
        self.uncovered_count += 1;
        self.score.moves += 1;
        self.mark_started();

        let mine_hit = self.board[coords].is_mine();
        let (outcome, completed) = if mine_hit {
            self.step_on_mine(coords);
            (RevealOutcome::HitMine, SmallVec::new())
        } else {
            self.reveal_safe(coords);
            (RevealOutcome::Revealed, self.collect_completed_words())
        };
        self.update_state(mine_hit);

        Ok(RevealReport {
            outcome,
            score_delta: self.score.score - score_before,
            completed,
            state: self.state,
        })
    }

    fn step_on_mine(&mut self, coords: Coord2) {
        let penalty = self.score.step_on_mine(
            self.uncovered_count,
            self.board.total_cells(),
            self.profile.mine_base_penalty,
        );
        log::trace!("Mine at {coords:?}, penalty {penalty}");
        self.break_streak();
    }

    /// Forgets every partial clean reveal.
    fn break_streak(&mut self) {
        for cells in &mut self.reveal_status {
            cells.clear();
        }
        self.current_word = None;
    }

    fn reveal_safe(&mut self, coords: Coord2) {
        let mut part_of_word = false;
        if let Some(letter) = self.board[coords].letter() {
            for index in self.board.words_with_letter(letter) {
                part_of_word = true;
                if self.revealed[index] {
                    continue;
                }
                let current = *self.current_word.get_or_insert(index);
                if current == index {
                    self.reveal_status[index].push(coords);
                }
            }
        }

        if !part_of_word {
            self.break_streak();
        }
        if !part_of_word || self.score.random_clicks == 0 {
            let base = self
                .profile
                .stage(self.words_left())
                .map_or(0, |stage| stage.random_click_penalty);
            self.score.record_random_click(base);
        }
        let penalty = self.score.charge_click();
        log::trace!(
            "Revealed {coords:?} (in word: {part_of_word}), penalty {penalty}, clicks {}",
            self.score.random_clicks
        );
    }

    fn collect_completed_words(&mut self) -> SmallVec<[WordCompletion; 1]> {
        let mut completed = SmallVec::new();

        for index in 0..self.revealed.len() {
            if self.revealed[index] {
                continue;
            }
            let placement = &self.board.words()[index];
            if placement.cells().any(|pos| self.cells[pos.to_nd_index()].is_covered()) {
                continue;
            }

            let clean = placement
                .cells()
                .all(|pos| self.reveal_status[index].contains(&pos));
            let award = word_award(placement.len(), placement.complexity, clean);
            let word = placement.word.clone();

            self.revealed[index] = true;
            self.reveal_status[index].clear();
            self.current_word = None;
            self.score.score += award;

            let stage = self.profile.stage(self.words_left()).copied();
            let stage_bonus = self.score.enter_stage(stage.as_ref());
            log::debug!(
                "Word {word:?} revealed, clean: {clean}, award {award}, stage bonus {stage_bonus}"
            );

            completed.push(WordCompletion {
                index,
                word,
                clean,
                award,
                stage_bonus,
            });
        }

        completed
    }

    fn update_state(&mut self, mine_hit: bool) {
        if self.state.is_finished() {
            return;
        }

        if self.words_left() == 0 {
            self.state = if self.profile.lose_on_negative_score && self.score.score < 0 {
                EngineState::Lost(LossReason::NegativeScore)
            } else {
                EngineState::Won
            };
        } else if mine_hit
            && let Some(limit) = self.profile.mine_loss_limit
            && self.score.mines_stepped.0 >= limit
        {
            self.state = EngineState::Lost(LossReason::MinesStepped);
        }

        if self.state.is_finished() {
            log::debug!("Game finished: {:?} with score {}", self.state, self.score.score);
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            self.state = EngineState::Active;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

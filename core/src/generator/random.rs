use ndarray::Array2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::*;

/// Purely random generation: words at random free positions, decoys sprinkled over the
/// remaining blanks, mines on shuffled interior blanks.
#[derive(Debug)]
pub struct RandomBoardGenerator<'a, R> {
    rng: &'a mut R,
}

impl<'a, R: Rng> RandomBoardGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> BoardGenerator for RandomBoardGenerator<'_, R> {
    fn generate(self, profile: &DifficultyProfile, catalog: &WordCatalog) -> Result<Board> {
        profile.validate()?;
        let rng = self.rng;
        let side = profile.side;

        let candidates = catalog.fitting(side);
        if candidates.len() < profile.word_count {
            return Err(GameError::InsufficientWords {
                required: profile.word_count,
                available: candidates.len(),
            });
        }
        let selected: Vec<&CatalogEntry> = candidates
            .choose_multiple(rng, profile.word_count)
            .copied()
            .collect();

        let mut grid = Array2::from_elem(grid_shape(side), Content::Blank);
        let mut placements = Vec::with_capacity(selected.len());
        for entry in selected {
            let placement = place_word(&grid, entry, side, profile.placement_attempts, rng)?;
            for (pos, letter) in placement.cells().zip(placement.word.chars()) {
                grid[pos.to_nd_index()] = Content::Letter(letter);
            }
            placements.push(placement);
        }

        fill_decoys(&mut grid, &placements, profile.fill_probability, rng);
        let mines = place_mines(&mut grid, profile.mine_count, rng);

        log::debug!(
            "Generated {side}x{side} board with words {:?} and {} mines",
            placements.iter().map(|p| p.word.as_str()).collect::<Vec<_>>(),
            mines.len()
        );
        Ok(Board::from_parts(grid, placements, mines))
    }
}

fn place_word<R: Rng>(
    grid: &Array2<Content>,
    entry: &CatalogEntry,
    side: Coord,
    attempts: u32,
    rng: &mut R,
) -> Result<WordPlacement> {
    // fitting() guarantees the word is no longer than the side
    let span = side - entry.word.len() as Coord;

    for _ in 0..attempts {
        let (orientation, origin) = if rng.random_bool(0.5) {
            let origin = (rng.random_range(0..side), rng.random_range(0..=span));
            (Orientation::Horizontal, origin)
        } else {
            let origin = (rng.random_range(0..=span), rng.random_range(0..side));
            (Orientation::Vertical, origin)
        };

        let placement = WordPlacement::new(&entry.word, entry.complexity, origin, orientation);
        if placement.cells().all(|pos| grid[pos.to_nd_index()].is_blank()) {
            return Ok(placement);
        }
    }

    log::warn!("Gave up placing {:?} after {attempts} attempts", entry.word);
    Err(GameError::Placement {
        word: entry.word.clone(),
    })
}

fn fill_decoys<R: Rng>(
    grid: &mut Array2<Content>,
    placements: &[WordPlacement],
    probability: f64,
    rng: &mut R,
) {
    let used = word_letters(placements.iter().map(|p| p.word.as_str()));
    let available: Vec<char> = COMMON_LETTERS
        .chars()
        .filter(|c| !used.contains(c))
        .collect();
    if available.is_empty() {
        log::warn!("Every common letter is used by a word, leaving the board without decoys");
        return;
    }

    for cell in grid.iter_mut().filter(|cell| cell.is_blank()) {
        if rng.random_bool(probability) {
            if let Some(&letter) = available.choose(rng) {
                *cell = Content::Letter(letter);
            }
        }
    }
}

/// Mines go on shuffled interior blanks so that the outer ring stays mine free.
fn place_mines<R: Rng>(
    grid: &mut Array2<Content>,
    count: CellCount,
    rng: &mut R,
) -> Vec<Coord2> {
    let side: Coord = grid.nrows().try_into().unwrap_or(Coord::MAX);
    let interior = 1..side.saturating_sub(1);

    let mut candidates: Vec<Coord2> = interior
        .clone()
        .flat_map(|row| interior.clone().map(move |col| (row, col)))
        .filter(|&pos| grid[pos.to_nd_index()].is_blank())
        .collect();
    candidates.shuffle(rng);

    let requested = usize::from(count);
    if candidates.len() < requested {
        log::warn!(
            "Only {} interior blank cells available, requested {} mines",
            candidates.len(),
            requested
        );
    }
    candidates.truncate(requested);

    for &pos in &candidates {
        grid[pos.to_nd_index()] = Content::Mine;
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn catalog() -> WordCatalog {
        WordCatalog::parse(
            "PYTHON,6\nCODE,4\nDEBUG,5\nLOOP,3\nARRAY,3\nSTRING,6\nNETWORK,6\nPROGRAM,6\n\
             SECURITY,8\nFUNCTION,7\nVARIABLE,7\nCOMPUTER,8\nLANGUAGE,6\nDATABASE,5\n\
             HARDWARE,6\nSOFTWARE,8",
        )
        .unwrap()
    }

    fn generate(difficulty: Difficulty, seed: u64) -> Board {
        let mut rng = SmallRng::seed_from_u64(seed);
        RandomBoardGenerator::new(&mut rng)
            .generate(&difficulty.profile(), &catalog())
            .unwrap()
    }

    #[test]
    fn words_are_written_without_overlap() {
        for difficulty in Difficulty::ALL {
            for seed in 0..20 {
                let board = generate(difficulty, seed);
                let profile = difficulty.profile();
                assert_eq!(board.words().len(), profile.word_count);

                let mut seen = hashbrown::HashSet::new();
                for placement in board.words() {
                    assert!(placement.fits(board.side()));
                    for (pos, letter) in placement.cells().zip(placement.word.chars()) {
                        assert!(seen.insert(pos), "overlap at {pos:?}");
                        assert_eq!(board[pos], Content::Letter(letter));
                    }
                }
            }
        }
    }

    #[test]
    fn mines_sit_on_interior_cells() {
        for seed in 0..20 {
            let board = generate(Difficulty::Expert, seed);
            let side = board.side();

            assert_eq!(board.mine_count(), 12);
            for &(row, col) in board.mines() {
                assert!(row > 0 && col > 0 && row < side - 1 && col < side - 1);
                assert_eq!(board[(row, col)], Content::Mine);
                assert!(!board.words().iter().any(|p| p.contains((row, col))));
            }
            let mine_cells = board.grid().iter().filter(|c| c.is_mine()).count();
            assert_eq!(mine_cells, board.mine_count());
        }
    }

    #[test]
    fn decoys_never_reuse_word_letters() {
        let board = generate(Difficulty::Simple, 7);
        let letters = word_letters(board.words().iter().map(|p| p.word.as_str()));

        for row in 0..board.side() {
            for col in 0..board.side() {
                let in_word = board.words().iter().any(|p| p.contains((row, col)));
                if let (false, Content::Letter(letter)) = (in_word, board[(row, col)]) {
                    assert!(!letters.contains(&letter));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_board() {
        assert_eq!(generate(Difficulty::Hard, 42), generate(Difficulty::Hard, 42));
    }

    #[test]
    fn too_few_fitting_words() {
        let mut rng = SmallRng::seed_from_u64(1);
        let catalog = WordCatalog::parse("CODE,4\nALGORITHM,9\nENCRYPTION,10").unwrap();
        let err = RandomBoardGenerator::new(&mut rng)
            .generate(&DifficultyProfile::easy(), &catalog)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientWords {
                required: 3,
                available: 1
            }
        );
    }

    #[test]
    fn impossible_placement_is_reported() {
        let mut rng = SmallRng::seed_from_u64(3);
        let profile = DifficultyProfile {
            side: 2,
            word_count: 3,
            placement_attempts: 50,
            ..DifficultyProfile::easy()
        };
        let catalog = WordCatalog::parse("AB,1\nCD,1\nEF,1").unwrap();
        let err = RandomBoardGenerator::new(&mut rng)
            .generate(&profile, &catalog)
            .unwrap_err();
        assert!(matches!(err, GameError::Placement { .. }));
    }

    #[test]
    fn small_interior_mines_every_candidate() {
        let mut rng = SmallRng::seed_from_u64(5);
        let profile = DifficultyProfile {
            side: 4,
            word_count: 1,
            mine_count: 10,
            fill_probability: 0.0,
            ..DifficultyProfile::easy()
        };
        let catalog = WordCatalog::parse("AB,1").unwrap();
        let board = RandomBoardGenerator::new(&mut rng)
            .generate(&profile, &catalog)
            .unwrap();

        let interior_blanks = [(1, 1), (1, 2), (2, 1), (2, 2)]
            .iter()
            .filter(|&&pos| !board.words()[0].contains(pos))
            .count();
        assert_eq!(board.mine_count(), interior_blanks);
    }
}

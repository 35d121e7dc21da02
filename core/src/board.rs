use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A selected word together with where the generator wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPlacement {
    pub word: String,
    pub complexity: u32,
    pub origin: Coord2,
    pub orientation: Orientation,
}

impl WordPlacement {
    pub fn new(word: &str, complexity: u32, origin: Coord2, orientation: Orientation) -> Self {
        Self {
            word: word.to_owned(),
            complexity,
            origin,
            orientation,
        }
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Cells covered by the word, first letter first.
    pub fn cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        let (row, col) = self.origin;
        (0..self.len()).map(move |offset| {
            // fits() keeps every offset below the board side
            let offset = offset as Coord;
            match self.orientation {
                Orientation::Horizontal => (row, col + offset),
                Orientation::Vertical => (row + offset, col),
            }
        })
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells().any(|pos| pos == coords)
    }

    pub fn contains_letter(&self, letter: char) -> bool {
        self.word.contains(letter)
    }

    pub fn fits(&self, side: Coord) -> bool {
        let (row, col) = self.origin;
        let (start, fixed) = match self.orientation {
            Orientation::Horizontal => (col, row),
            Orientation::Vertical => (row, col),
        };
        !self.is_empty() && fixed < side && usize::from(start) + self.len() <= usize::from(side)
    }
}

/// Static board produced by generation: grid contents, word placements, mines and hints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardParts")]
pub struct Board {
    grid: Array2<Content>,
    words: Vec<WordPlacement>,
    mines: Vec<Coord2>,
    mine_hints: Array2<MineHint>,
    letter_hints: Array2<u8>,
}

impl Board {
    /// Builds a board from an explicit layout, rejecting overlaps and out of bounds parts.
    pub fn from_layout(
        side: Coord,
        words: Vec<WordPlacement>,
        decoys: &[(Coord2, char)],
        mines: &[Coord2],
    ) -> Result<Self> {
        if side == 0 {
            return Err(GameError::InvalidLayout);
        }
        let mut grid = Array2::from_elem(grid_shape(side), Content::Blank);

        for placement in &words {
            if !placement.fits(side) || !placement.word.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(GameError::InvalidLayout);
            }
            for (pos, letter) in placement.cells().zip(placement.word.chars()) {
                let cell = &mut grid[pos.to_nd_index()];
                if !cell.is_blank() {
                    return Err(GameError::InvalidLayout);
                }
                *cell = Content::Letter(letter);
            }
        }

        let extras = decoys
            .iter()
            .map(|&(pos, letter)| (pos, Content::Letter(letter.to_ascii_uppercase())))
            .chain(mines.iter().map(|&pos| (pos, Content::Mine)));
        for (pos, content) in extras {
            if pos.0 >= side || pos.1 >= side {
                return Err(GameError::InvalidLayout);
            }
            let cell = &mut grid[pos.to_nd_index()];
            if !cell.is_blank() {
                return Err(GameError::InvalidLayout);
            }
            *cell = content;
        }

        Ok(Self::from_parts(grid, words, mines.to_vec()))
    }

    pub(crate) fn from_parts(
        grid: Array2<Content>,
        words: Vec<WordPlacement>,
        mines: Vec<Coord2>,
    ) -> Self {
        let letters = word_letters(words.iter().map(|placement| placement.word.as_str()));
        let (mine_hints, letter_hints) = compute_hints(&grid, &letters);
        Self {
            grid,
            words,
            mines,
            mine_hints,
            letter_hints,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let side = self.side();
        if coords.0 < side && coords.1 < side {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn side(&self) -> Coord {
        self.grid.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        square(self.side())
    }

    pub fn grid(&self) -> &Array2<Content> {
        &self.grid
    }

    pub fn words(&self) -> &[WordPlacement] {
        &self.words
    }

    pub fn mines(&self) -> &[Coord2] {
        &self.mines
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    pub fn mine_hint(&self, coords: Coord2) -> MineHint {
        self.mine_hints[coords.to_nd_index()]
    }

    pub fn letter_hint(&self, coords: Coord2) -> u8 {
        self.letter_hints[coords.to_nd_index()]
    }

    /// Indices of the selected words containing `letter`, in selection order.
    pub fn words_with_letter(&self, letter: char) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter(move |(_, placement)| placement.contains_letter(letter))
            .map(|(index, _)| index)
    }
}

/// Loaded form of a [`Board`]. Hint layers are recomputed rather than trusted.
#[derive(Deserialize)]
struct BoardParts {
    grid: Array2<Content>,
    words: Vec<WordPlacement>,
    mines: Vec<Coord2>,
}

impl TryFrom<BoardParts> for Board {
    type Error = GameError;

    fn try_from(parts: BoardParts) -> Result<Self> {
        let BoardParts { grid, words, mines } = parts;
        let (rows, cols) = grid.dim();
        let side: Coord = rows.try_into().map_err(|_| GameError::InvalidLayout)?;
        if side == 0 || rows != cols {
            return Err(GameError::InvalidLayout);
        }

        let words_match = words.iter().all(|placement| {
            placement.fits(side)
                && placement
                    .cells()
                    .zip(placement.word.chars())
                    .all(|(pos, letter)| grid[pos.to_nd_index()] == Content::Letter(letter))
        });
        let mine_cells = grid.iter().filter(|cell| cell.is_mine()).count();
        let mines_match = mine_cells == mines.len()
            && mines.iter().all(|&pos| {
                pos.0 < side && pos.1 < side && grid[pos.to_nd_index()].is_mine()
            });
        if !words_match || !mines_match {
            return Err(GameError::InvalidLayout);
        }

        Ok(Self::from_parts(grid, words, mines))
    }
}

impl Index<Coord2> for Board {
    type Output = Content;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.grid[coords.to_nd_index()]
    }
}

pub(crate) fn grid_shape(side: Coord) -> (usize, usize) {
    (side.into(), side.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_board() -> Board {
        Board::from_layout(
            7,
            vec![WordPlacement::new("CODE", 4, (2, 1), Orientation::Horizontal)],
            &[((5, 5), 'x')],
            &[(4, 3)],
        )
        .unwrap()
    }

    #[test]
    fn placement_cells_follow_orientation() {
        let across = WordPlacement::new("LOOP", 3, (1, 2), Orientation::Horizontal);
        let down = WordPlacement::new("LOOP", 3, (1, 2), Orientation::Vertical);
        assert_eq!(
            across.cells().collect::<Vec<_>>(),
            vec![(1, 2), (1, 3), (1, 4), (1, 5)]
        );
        assert_eq!(down.cells().collect::<Vec<_>>(), vec![(1, 2), (2, 2), (3, 2), (4, 2)]);
        assert!(across.fits(6));
        assert!(!across.fits(5));
    }

    #[test]
    fn layout_writes_words_decoys_and_mines() {
        let board = code_board();

        assert_eq!(board[(2, 1)], Content::Letter('C'));
        assert_eq!(board[(2, 4)], Content::Letter('E'));
        assert_eq!(board[(5, 5)], Content::Letter('X'));
        assert_eq!(board[(4, 3)], Content::Mine);
        assert_eq!(board.mine_count(), 1);
        assert_eq!(board.letter_hint((1, 2)), 3);
        assert!(!board.mine_hint((3, 3)).is_blank());
    }

    #[test]
    fn layout_rejects_overlaps() {
        let words = vec![
            WordPlacement::new("CODE", 4, (2, 1), Orientation::Horizontal),
            WordPlacement::new("LOOP", 3, (0, 2), Orientation::Vertical),
        ];
        assert_eq!(Board::from_layout(7, words, &[], &[]), Err(GameError::InvalidLayout));

        let words = vec![WordPlacement::new("CODE", 4, (2, 1), Orientation::Horizontal)];
        assert_eq!(
            Board::from_layout(7, words, &[], &[(2, 3)]),
            Err(GameError::InvalidLayout)
        );
        assert_eq!(
            Board::from_layout(3, vec![], &[], &[(3, 0)]),
            Err(GameError::InvalidLayout)
        );
    }

    #[test]
    fn validate_coords_checks_bounds() {
        let board = code_board();
        assert_eq!(board.validate_coords((6, 6)), Ok((6, 6)));
        assert_eq!(board.validate_coords((7, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn loaded_board_must_agree_with_its_grid() {
        let board = code_board();
        let mut value = serde_json::to_value(&board).unwrap();

        let restored: Board = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(restored, board);

        value["mines"] = serde_json::json!([[0, 0]]);
        assert!(serde_json::from_value::<Board>(value).is_err());
    }
}

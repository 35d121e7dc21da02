use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a single hint slot points at: mines above, below, or both.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Blank,
    Upper,
    Lower,
    Both,
}

impl Glyph {
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    pub const fn shows_upper(self) -> bool {
        matches!(self, Self::Upper | Self::Both)
    }

    pub const fn shows_lower(self) -> bool {
        matches!(self, Self::Lower | Self::Both)
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::Blank
    }
}

/// Two-slot directional mine hint: `left` summarises the west side, `right` the east side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MineHint {
    pub left: Glyph,
    pub right: Glyph,
}

impl MineHint {
    pub const BLANK: MineHint = MineHint::new(Glyph::Blank, Glyph::Blank);

    pub const fn new(left: Glyph, right: Glyph) -> Self {
        Self { left, right }
    }

    pub const fn is_blank(self) -> bool {
        self.left.is_blank() && self.right.is_blank()
    }

    /// Braille rendering: left-column dots for the left slot, right-column dots for the right.
    pub const fn to_chars(self) -> [char; 2] {
        let left = match self.left {
            Glyph::Blank => ' ',
            Glyph::Upper => '⠁',
            Glyph::Lower => '⡀',
            Glyph::Both => '⡁',
        };
        let right = match self.right {
            Glyph::Blank => ' ',
            Glyph::Upper => '⠈',
            Glyph::Lower => '⢀',
            Glyph::Both => '⢈',
        };
        [left, right]
    }
}

/// Which of the eight neighbours of a cell hold a mine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Surroundings {
    n: bool,
    s: bool,
    e: bool,
    w: bool,
    ne: bool,
    nw: bool,
    se: bool,
    sw: bool,
}

impl Surroundings {
    /// Builds from a bit mask using [`Direction::bit`].
    pub const fn from_mask(mask: u8) -> Self {
        Self {
            n: mask & Direction::North.bit() != 0,
            s: mask & Direction::South.bit() != 0,
            e: mask & Direction::East.bit() != 0,
            w: mask & Direction::West.bit() != 0,
            ne: mask & Direction::NorthEast.bit() != 0,
            nw: mask & Direction::NorthWest.bit() != 0,
            se: mask & Direction::SouthEast.bit() != 0,
            sw: mask & Direction::SouthWest.bit() != 0,
        }
    }

    pub fn of(grid: &Array2<Content>, coords: Coord2) -> Self {
        let side = grid.nrows().try_into().unwrap_or(Coord::MAX);
        let mask = Direction::ALL
            .iter()
            .filter(|direction| {
                apply_delta(coords, direction.delta(), side)
                    .is_some_and(|pos| grid[pos.to_nd_index()].is_mine())
            })
            .fold(0, |mask, direction| mask | direction.bit());
        Self::from_mask(mask)
    }

    pub const fn any(self) -> bool {
        self.n || self.s || self.e || self.w || self.ne || self.nw || self.se || self.sw
    }
}

type Rule = fn(Surroundings, &mut MineHint);

/// Applied in order, later rules overwrite earlier ones.
///
/// Triple rows and corners come first, then pairs, then the side merges, and the top and bottom
/// catch-alls run last so that any adjacent mine shows up in at least one slot.
pub const MINE_HINT_RULES: &[(&str, Rule)] = &[
    ("full top row", full_top_row),
    ("full bottom row", full_bottom_row),
    ("full left column", full_left_column),
    ("full right column", full_right_column),
    ("upper left corner", upper_left_corner),
    ("upper right corner", upper_right_corner),
    ("lower left corner", lower_left_corner),
    ("lower right corner", lower_right_corner),
    ("left chevron", left_chevron),
    ("right chevron", right_chevron),
    ("bottom pair", bottom_pair),
    ("top pair", top_pair),
    ("left and right", left_and_right),
    ("top and bottom", top_and_bottom),
    ("top corners", top_corners),
    ("bottom corners", bottom_corners),
    ("left side", left_side),
    ("right side", right_side),
    ("corner across", corner_across),
    ("top catch-all", top_catch_all),
    ("bottom catch-all", bottom_catch_all),
];

fn full_top_row(s: Surroundings, hint: &mut MineHint) {
    if s.n && s.nw && s.ne {
        *hint = MineHint::new(Glyph::Upper, Glyph::Upper);
    }
}

fn full_bottom_row(s: Surroundings, hint: &mut MineHint) {
    if s.s && s.sw && s.se {
        *hint = MineHint::new(Glyph::Lower, Glyph::Lower);
    }
}

fn full_left_column(s: Surroundings, hint: &mut MineHint) {
    if s.w && s.nw && s.sw {
        hint.left = Glyph::Both;
    }
}

fn full_right_column(s: Surroundings, hint: &mut MineHint) {
    if s.e && s.ne && s.se {
        hint.right = Glyph::Both;
    }
}

fn upper_left_corner(s: Surroundings, hint: &mut MineHint) {
    if s.n && s.nw && s.w {
        hint.left = Glyph::Upper;
    }
}

fn upper_right_corner(s: Surroundings, hint: &mut MineHint) {
    if s.n && s.ne && s.e {
        hint.right = Glyph::Upper;
    }
}

fn lower_left_corner(s: Surroundings, hint: &mut MineHint) {
    if s.s && s.sw && s.w {
        hint.left = Glyph::Lower;
    }
}

fn lower_right_corner(s: Surroundings, hint: &mut MineHint) {
    if s.s && s.se && s.e {
        hint.right = Glyph::Lower;
    }
}

// `<` shape, the bottom half wins
fn left_chevron(s: Surroundings, hint: &mut MineHint) {
    if s.n && s.w && s.s {
        hint.left = Glyph::Lower;
    }
}

// `>` shape
fn right_chevron(s: Surroundings, hint: &mut MineHint) {
    if s.n && s.e && s.s {
        hint.right = Glyph::Lower;
    }
}

fn bottom_pair(s: Surroundings, hint: &mut MineHint) {
    if s.s && s.sw {
        hint.left = Glyph::Lower;
    } else if s.s && s.se {
        hint.right = Glyph::Lower;
    }
}

fn top_pair(s: Surroundings, hint: &mut MineHint) {
    if s.n && s.nw {
        hint.left = Glyph::Upper;
    } else if s.n && s.ne {
        hint.right = Glyph::Upper;
    }
}

fn left_and_right(s: Surroundings, hint: &mut MineHint) {
    if s.w && s.e {
        *hint = MineHint::new(Glyph::Lower, Glyph::Upper);
    }
}

fn top_and_bottom(s: Surroundings, hint: &mut MineHint) {
    if s.n && s.s {
        if hint.left.is_blank() {
            hint.left = Glyph::Upper;
        }
        if hint.right.is_blank() {
            hint.right = Glyph::Lower;
        }
    }
}

fn top_corners(s: Surroundings, hint: &mut MineHint) {
    if s.nw && s.ne {
        *hint = MineHint::new(Glyph::Upper, Glyph::Upper);
    }
}

fn bottom_corners(s: Surroundings, hint: &mut MineHint) {
    if s.sw && s.se {
        *hint = MineHint::new(Glyph::Lower, Glyph::Lower);
    }
}

fn left_side(s: Surroundings, hint: &mut MineHint) {
    let blank = hint.left.is_blank();
    if blank && s.w && s.nw {
        hint.left = Glyph::Upper;
    } else if blank && s.w && s.sw {
        hint.left = Glyph::Lower;
    } else if blank && s.nw && s.sw {
        hint.left = Glyph::Both;
    } else {
        if s.w {
            hint.left = Glyph::Lower;
        }
        if s.nw {
            hint.left = Glyph::Upper;
        }
        if s.sw {
            hint.left = Glyph::Lower;
        }
    }
}

fn right_side(s: Surroundings, hint: &mut MineHint) {
    let blank = hint.right.is_blank();
    if blank && s.e && s.ne {
        hint.right = Glyph::Upper;
    } else if blank && s.e && s.se {
        hint.right = Glyph::Lower;
    } else if blank && s.ne && s.se {
        hint.right = Glyph::Both;
    } else {
        if s.e {
            hint.right = Glyph::Upper;
        }
        if s.ne {
            hint.right = Glyph::Upper;
        }
        if s.se {
            hint.right = Glyph::Lower;
        }
    }
}

// A corner plus the opposite vertical edge needs both dots on that side.
fn corner_across(s: Surroundings, hint: &mut MineHint) {
    if (s.nw && s.s) || (s.sw && s.n) {
        hint.left = Glyph::Both;
    }
    if (s.ne && s.s) || (s.se && s.n) {
        hint.right = Glyph::Both;
    }
}

fn top_catch_all(s: Surroundings, hint: &mut MineHint) {
    if !s.n || hint.left.shows_upper() || hint.right.shows_upper() {
        return;
    }
    if hint.left.is_blank() {
        hint.left = Glyph::Upper;
    } else if hint.right.is_blank() {
        hint.right = Glyph::Upper;
    } else if hint.left == Glyph::Lower {
        hint.left = Glyph::Both;
    } else if hint.right == Glyph::Lower {
        hint.right = Glyph::Both;
    }
}

fn bottom_catch_all(s: Surroundings, hint: &mut MineHint) {
    if !s.s || hint.left.shows_lower() || hint.right.shows_lower() {
        return;
    }
    if hint.left.is_blank() {
        hint.left = Glyph::Lower;
    } else if hint.right.is_blank() {
        hint.right = Glyph::Lower;
    } else if hint.left == Glyph::Upper {
        hint.left = Glyph::Both;
    } else if hint.right == Glyph::Upper {
        hint.right = Glyph::Both;
    }
}

pub fn encode_mine_hint(surroundings: Surroundings) -> MineHint {
    let mut hint = MineHint::BLANK;
    for (_, rule) in MINE_HINT_RULES {
        rule(surroundings, &mut hint);
    }
    hint
}

pub fn mine_hint(grid: &Array2<Content>, coords: Coord2) -> MineHint {
    encode_mine_hint(Surroundings::of(grid, coords))
}

/// Every letter that appears in at least one of `words`.
pub fn word_letters<'a>(words: impl IntoIterator<Item = &'a str>) -> HashSet<char> {
    words.into_iter().flat_map(str::chars).collect()
}

/// Cells of the clipped 3×3 block around `coords` holding a letter from `word_letters`.
pub fn letter_hint(
    grid: &Array2<Content>,
    word_letters: &HashSet<char>,
    coords: Coord2,
) -> u8 {
    let side = grid.nrows().try_into().unwrap_or(Coord::MAX);
    let count = iter_block(coords, side)
        .filter(|&pos| {
            grid[pos.to_nd_index()]
                .letter()
                .is_some_and(|letter| word_letters.contains(&letter))
        })
        .count();
    // a block has at most nine cells
    count as u8
}

/// Both hint layers for a finished grid.
pub fn compute_hints(
    grid: &Array2<Content>,
    word_letters: &HashSet<char>,
) -> (Array2<MineHint>, Array2<u8>) {
    let mine_hints = Array2::from_shape_fn(grid.dim(), |(row, col)| {
        mine_hint(grid, (row as Coord, col as Coord))
    });
    let letter_hints = Array2::from_shape_fn(grid.dim(), |(row, col)| {
        letter_hint(grid, word_letters, (row as Coord, col as Coord))
    });
    (mine_hints, letter_hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Glyph::*;

    fn mask(directions: &[Direction]) -> Surroundings {
        Surroundings::from_mask(directions.iter().fold(0, |m, d| m | d.bit()))
    }

    #[test]
    fn blank_only_without_adjacent_mines() {
        for bits in 0..=u8::MAX {
            let surroundings = Surroundings::from_mask(bits);
            let hint = encode_mine_hint(surroundings);
            assert_eq!(hint.is_blank(), !surroundings.any(), "mask {bits:#010b}");
        }
    }

    #[test]
    fn single_directions() {
        use Direction::*;
        assert_eq!(encode_mine_hint(mask(&[North])), MineHint::new(Upper, Blank));
        assert_eq!(encode_mine_hint(mask(&[South])), MineHint::new(Lower, Blank));
        assert_eq!(encode_mine_hint(mask(&[West])), MineHint::new(Lower, Blank));
        assert_eq!(encode_mine_hint(mask(&[East])), MineHint::new(Blank, Upper));
        assert_eq!(encode_mine_hint(mask(&[NorthWest])), MineHint::new(Upper, Blank));
        assert_eq!(encode_mine_hint(mask(&[SouthEast])), MineHint::new(Blank, Lower));
    }

    #[test]
    fn triple_rows_fill_both_slots() {
        use Direction::*;
        assert_eq!(
            encode_mine_hint(mask(&[North, NorthWest, NorthEast])),
            MineHint::new(Upper, Upper)
        );
        assert_eq!(
            encode_mine_hint(mask(&[South, SouthWest, SouthEast])),
            MineHint::new(Lower, Lower)
        );
    }

    #[test]
    fn corner_with_opposite_edge_escalates() {
        use Direction::*;
        assert_eq!(encode_mine_hint(mask(&[NorthWest, South])), MineHint::new(Both, Blank));
        assert_eq!(encode_mine_hint(mask(&[NorthEast, South])).right, Both);
        assert_eq!(encode_mine_hint(mask(&[NorthWest, SouthWest])).left, Both);
    }

    #[test]
    fn hints_are_pure_over_the_grid() {
        let mut grid = Array2::from_elem((4, 4), Content::Blank);
        grid[[1, 1]] = Content::Mine;
        grid[[2, 2]] = Content::Letter('C');
        grid[[0, 3]] = Content::Letter('Z');
        let letters = word_letters(["CODE"]);

        let first = compute_hints(&grid, &letters);
        let second = compute_hints(&grid, &letters);
        assert_eq!(first, second);

        let (mine_hints, letter_hints) = first;
        assert_eq!(mine_hints[[0, 0]], MineHint::new(Blank, Lower));
        assert_eq!(mine_hints[[3, 3]], MineHint::BLANK);
        assert_eq!(letter_hints[[1, 1]], 1);
        assert_eq!(letter_hints[[0, 3]], 0);
        assert_eq!(letter_hints[[3, 3]], 1);
    }

    #[test]
    fn braille_rendering() {
        assert_eq!(MineHint::new(Both, Lower).to_chars(), ['⡁', '⢀']);
        assert_eq!(MineHint::BLANK.to_chars(), [' ', ' ']);
    }
}

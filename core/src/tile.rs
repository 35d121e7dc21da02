use serde::{Deserialize, Serialize};

use crate::*;

/// What a grid cell holds underneath its cover.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    Blank,
    Letter(char),
    Mine,
}

impl Content {
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn letter(self) -> Option<char> {
        match self {
            Self::Letter(letter) => Some(letter),
            _ => None,
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Blank
    }
}

/// Marker a player can put on a covered cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellMark {
    None,
    Flagged,
    Questioned,
}

impl CellMark {
    /// None -> Flagged -> Questioned -> None
    pub const fn next(self) -> Self {
        match self {
            Self::None => Self::Flagged,
            Self::Flagged => Self::Questioned,
            Self::Questioned => Self::None,
        }
    }

    pub const fn is_marked(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Default for CellMark {
    fn default() -> Self {
        Self::None
    }
}

/// Canonical player-visible state stored by the gameplay engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    Covered(CellMark),
    Uncovered,
}

impl EngineCell {
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered(_))
    }

    pub const fn mark(self) -> CellMark {
        match self {
            Self::Covered(mark) => mark,
            Self::Uncovered => CellMark::None,
        }
    }
}

impl Default for EngineCell {
    fn default() -> Self {
        Self::Covered(CellMark::None)
    }
}

/// Read-only snapshot of one cell for the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub covered: bool,
    pub mark: CellMark,
    pub mine_hint: MineHint,
    pub letter_hint: u8,
    /// Only known once the cell is uncovered.
    pub content: Option<Content>,
}

impl CellView {
    /// Three-character cell text: left hint, letter or letter hint, right hint.
    ///
    /// Covered cells show `F`, `?` or nothing in the middle, uncovered mines show `*`.
    pub fn display(&self) -> String {
        let middle = match (self.covered, self.mark, self.content) {
            (true, CellMark::Flagged, _) => 'F',
            (true, CellMark::Questioned, _) => '?',
            (true, CellMark::None, _) => ' ',
            (false, _, Some(Content::Letter(letter))) => letter,
            (false, _, Some(Content::Mine)) => '*',
            (false, _, _) => letter_hint_char(self.letter_hint),
        };
        if self.covered {
            [' ', middle, ' '].iter().collect()
        } else {
            let [left, right] = self.mine_hint.to_chars();
            [left, middle, right].iter().collect()
        }
    }
}

fn letter_hint_char(count: u8) -> char {
    match count {
        0 => ' ',
        n => char::from_digit(n.into(), 10).unwrap_or('+'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_cycles_through_three_states() {
        let mark = CellMark::None;
        assert_eq!(mark.next(), CellMark::Flagged);
        assert_eq!(mark.next().next(), CellMark::Questioned);
        assert_eq!(mark.next().next().next(), CellMark::None);
    }

    #[test]
    fn display_hides_content_while_covered() {
        let view = CellView {
            covered: true,
            mark: CellMark::Questioned,
            mine_hint: MineHint::BLANK,
            letter_hint: 3,
            content: None,
        };
        assert_eq!(view.display(), " ? ");
    }

    #[test]
    fn display_uses_letter_hint_for_blank_cells() {
        let view = CellView {
            covered: false,
            mark: CellMark::None,
            mine_hint: MineHint::new(Glyph::Lower, Glyph::Blank),
            letter_hint: 4,
            content: Some(Content::Blank),
        };
        assert_eq!(view.display(), "⡀4 ");
    }
}

use serde::{Deserialize, Serialize};

/// Single coordinate axis used for the board side length and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn square(side: Coord) -> CellCount {
    let side = side as CellCount;
    side.saturating_mul(side)
}

/// The eight compass neighbours of a cell, north being row - 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const fn delta(self) -> (isize, isize) {
        use Direction::*;
        match self {
            North => (-1, 0),
            South => (1, 0),
            East => (0, 1),
            West => (0, -1),
            NorthEast => (-1, 1),
            NorthWest => (-1, -1),
            SouthEast => (1, 1),
            SouthWest => (1, -1),
        }
    }

    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains on a `side`×`side` board.
pub fn apply_delta(coords: Coord2, delta: (isize, isize), side: Coord) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= side {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= side {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates over the in-bounds neighbours of a cell in [`Direction::ALL`] order.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    side: Coord,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, side: Coord) -> Self {
        Self {
            center,
            side,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let direction = Direction::ALL.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, direction.delta(), self.side) {
                return Some(next_item);
            }
        }
    }
}

/// Iterates over the 3×3 block centred on `center`, clipped to the board, centre included.
pub fn iter_block(center: Coord2, side: Coord) -> impl Iterator<Item = Coord2> {
    core::iter::once(center).chain(NeighborIter::new(center, side))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), 4).collect();
        assert_eq!(neighbors, vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn center_has_eight_neighbors() {
        assert_eq!(NeighborIter::new((2, 2), 5).count(), 8);
        assert_eq!(iter_block((2, 2), 5).count(), 9);
    }

    #[test]
    fn apply_delta_rejects_out_of_bounds() {
        assert_eq!(apply_delta((0, 3), Direction::North.delta(), 4), None);
        assert_eq!(apply_delta((0, 3), Direction::East.delta(), 4), None);
        assert_eq!(apply_delta((1, 2), Direction::SouthWest.delta(), 4), Some((2, 1)));
    }

    #[test]
    fn direction_bits_are_distinct() {
        let all = Direction::ALL.iter().fold(0u8, |acc, d| acc | d.bit());
        assert_eq!(all, 0xff);
    }
}

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows, columns and sizes.
pub type Coord = u8;

/// Two-dimensional board coordinates `(row, col)`.
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

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
pub fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

pub trait BoundsExt {
    fn bounds(&self) -> Coord2;

    fn contains(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.bounds();
        coords.0 < rows && coords.1 < cols
    }
}

impl<T> BoundsExt for Array2<T> {
    fn bounds(&self) -> Coord2 {
        let (rows, cols) = self.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }
}

/// Turn token for the two-seat games.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    First,
    Second,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// One-based seat number, as shown to players.
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// Orthogonal step used by the grid-walking games.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_delta_rejects_out_of_bounds() {
        assert_eq!(apply_delta((0, 0), (-1, 0), (8, 8)), None);
        assert_eq!(apply_delta((7, 7), (0, 1), (8, 8)), None);
        assert_eq!(apply_delta((3, 3), (2, -2), (8, 8)), Some((5, 1)));
    }

    #[test]
    fn side_alternates() {
        assert_eq!(Side::default(), Side::First);
        assert_eq!(Side::First.other(), Side::Second);
        assert_eq!(Side::Second.other().number(), 1);
    }
}

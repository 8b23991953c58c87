use serde::{Deserialize, Serialize};

/// Single coordinate axis used for the board size and positions.
pub type Coord = u8;

/// Count type used for snake lengths and total-cell counts.
pub type CellCount = u16;

/// Board position `(x, y)`, origin at the top-left corner.
pub type Cell = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Cell {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub const fn is_opposite(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Up, Self::Down)
                | (Self::Down, Self::Up)
                | (Self::Left, Self::Right)
                | (Self::Right, Self::Left)
        )
    }

    /// Unit vector `(dx, dy)`; y grows downwards.
    pub const fn delta(self) -> (isize, isize) {
        use Direction::*;
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Right
    }
}

/// Applies `delta` to `cell`, returning a value only when it remains in bounds.
pub fn apply_delta(cell: Cell, delta: (isize, isize), bounds: Cell) -> Option<Cell> {
    let (x, y) = cell;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Neighbor of `cell` one step towards `direction` on a square board of side `size`.
pub fn step(cell: Cell, direction: Direction, size: Coord) -> Option<Cell> {
    apply_delta(cell, direction.delta(), (size, size))
}

pub const fn in_bounds(cell: Cell, size: Coord) -> bool {
    cell.0 < size && cell.1 < size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_pairs_are_symmetric() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert!(dir.is_opposite(dir.opposite()));
            assert!(!dir.is_opposite(dir));
        }
        assert!(!Direction::Up.is_opposite(Direction::Left));
    }

    #[test]
    fn step_stays_inside_board() {
        assert_eq!(step((5, 5), Direction::Up, 10), Some((5, 4)));
        assert_eq!(step((5, 5), Direction::Right, 10), Some((6, 5)));
        assert_eq!(step((0, 3), Direction::Left, 10), None);
        assert_eq!(step((3, 0), Direction::Up, 10), None);
        assert_eq!(step((9, 3), Direction::Right, 10), None);
        assert_eq!(step((3, 9), Direction::Down, 10), None);
    }

    #[test]
    fn step_near_coord_limit_does_not_wrap() {
        assert_eq!(step((Coord::MAX - 1, 0), Direction::Right, Coord::MAX), None);
        assert_eq!(step((Coord::MAX, 0), Direction::Right, Coord::MAX), None);
    }
}

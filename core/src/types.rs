use core::fmt;

use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    a as CellCount * b as CellCount
}

/// Location of a cell within one grid generation; not unique across grids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub(crate) const fn nd(self) -> [usize; 2] {
        [self.x as usize, self.y as usize]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `position`, returning a value only when it remains in bounds.
fn apply_delta(position: Position, delta: (isize, isize), bounds: (Coord, Coord)) -> Option<Position> {
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = position.x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = position.y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some(Position::new(next_x, next_y))
}

/// The up-to-8 grid-adjacent positions of `position`, clipped at the
/// boundaries. No wraparound, never the position itself.
pub(crate) fn neighbors_of(
    position: Position,
    width: Coord,
    height: Coord,
) -> impl Iterator<Item = Position> {
    DISPLACEMENTS
        .into_iter()
        .filter_map(move |delta| apply_delta(position, delta, (width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = neighbors_of(Position::new(0, 0), 3, 3).collect();
        assert_eq!(neighbors.len(), 3);
        assert!(!neighbors.contains(&Position::new(0, 0)));
    }

    #[test]
    fn interior_has_eight_neighbors() {
        let neighbors: Vec<_> = neighbors_of(Position::new(1, 1), 3, 3).collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&Position::new(1, 1)));
    }

    #[test]
    fn edge_has_five_neighbors() {
        let neighbors: Vec<_> = neighbors_of(Position::new(1, 0), 3, 3).collect();
        assert_eq!(neighbors.len(), 5);
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        assert_eq!(neighbors_of(Position::new(0, 0), 1, 1).count(), 0);
    }
}

//! Grid-based minesweeper engine.
//!
//! A [`Grid`] owns a rectangular arena of [`Cell`]s, some of them mined.
//! Callers reveal and mark individual cells through the bounds-checked
//! two-stage accessors; every state transition is pushed synchronously to
//! per-cell and grid-level observers, and the grid derives the aggregate
//! [`GameStatus`] from the stream of cell events.
//!
//! ```
//! use minegrid_core::{Dimensions, GameStatus, Grid};
//!
//! let mut grid = Grid::with_seed(Dimensions::new(4, 4, 0), 7);
//! grid.column_mut(0)?.cell(0)?.reveal();
//! assert_eq!(grid.status(), GameStatus::Won);
//! # Ok::<(), minegrid_core::OutOfBounds>(())
//! ```

use serde::{Deserialize, Serialize};

pub use access::*;
pub use binding::*;
pub use cell::*;
pub use error::*;
pub use grid::*;
pub use observer::*;
pub use types::*;

mod access;
mod binding;
mod cell;
mod error;
mod grid;
mod observer;
mod types;

/// Validated grid configuration: width, height and mine count.
///
/// The mine count can never exceed the cell count. Any mutation of the
/// three values re-clamps the mine count against the current product; an
/// oversized request is silently corrected, never rejected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDimensions")]
pub struct Dimensions {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

/// Unvalidated mirror that routes deserialization through the clamping
/// constructor, so the mine-count invariant holds on every construction
/// path.
#[derive(Deserialize)]
struct RawDimensions {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl From<RawDimensions> for Dimensions {
    fn from(raw: RawDimensions) -> Self {
        Self::new(raw.width, raw.height, raw.mines)
    }
}

impl Dimensions {
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Self {
        let mut dimensions = Self {
            width,
            height,
            mines: 0,
        };
        dimensions.set_mines(mines);
        dimensions
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub fn set_width(&mut self, width: Coord) {
        self.width = width;
        self.set_mines(self.mines);
    }

    pub fn set_height(&mut self, height: Coord) {
        self.height = height;
        self.set_mines(self.mines);
    }

    pub fn set_mines(&mut self, mines: CellCount) {
        let total = self.total_cells();
        if mines > total {
            log::debug!("mine count {mines} clamped to {total}");
            self.mines = total;
        } else {
            self.mines = mines;
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Cells that are not mines; the reveal target for a win.
    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_mine_count_clamps_to_cell_count() {
        let dimensions = Dimensions::new(3, 3, 20);
        assert_eq!(dimensions.mines(), 9);
        assert_eq!(dimensions.safe_cell_count(), 0);
    }

    #[test]
    fn shrinking_an_axis_reclamps_the_mine_count() {
        let mut dimensions = Dimensions::new(3, 3, 9);
        dimensions.set_width(1);
        assert_eq!(dimensions.mines(), 3);

        dimensions.set_height(0);
        assert_eq!(dimensions.mines(), 0);
    }

    #[test]
    fn in_range_mine_count_is_kept() {
        let mut dimensions = Dimensions::new(2, 2, 4);
        assert_eq!(dimensions.mines(), 4);

        dimensions.set_mines(5);
        assert_eq!(dimensions.mines(), 4);

        dimensions.set_mines(2);
        assert_eq!(dimensions.mines(), 2);
    }

    #[test]
    fn deserialization_clamps_the_mine_count() {
        use serde::Deserialize;
        use serde::de::value::{Error, MapDeserializer};

        let fields = [("width", 1u32), ("height", 1), ("mines", 9)];
        let dimensions =
            Dimensions::deserialize(MapDeserializer::<_, Error>::new(fields.into_iter()))
                .unwrap();

        assert_eq!(dimensions.mines(), 1);
        assert_eq!(dimensions.safe_cell_count(), 0);
    }

    #[test]
    fn default_is_zeroed() {
        let dimensions = Dimensions::default();
        assert_eq!(dimensions.width(), 0);
        assert_eq!(dimensions.height(), 0);
        assert_eq!(dimensions.mines(), 0);
        assert_eq!(dimensions.total_cells(), 0);
    }
}

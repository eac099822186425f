use std::rc::Rc;

use crate::binding::HostBinding;
use crate::cell::{Cell, CellStatus, MarkOutcome, RevealOutcome};
use crate::error::{Axis, OutOfBounds, Result};
use crate::grid::Grid;
use crate::observer::CellObserver;
use crate::types::{Coord, Position};

impl Grid {
    /// First stage of the two-stage cell access: checks the horizontal
    /// index and yields a read-only view of one column.
    pub fn column(&self, x: Coord) -> Result<Column<'_>> {
        self.check_column(x)?;
        Ok(Column { grid: self, x })
    }

    /// Mutable counterpart of [`column`](Self::column).
    pub fn column_mut(&mut self, x: Coord) -> Result<ColumnMut<'_>> {
        self.check_column(x)?;
        Ok(ColumnMut { grid: self, x })
    }

    fn check_column(&self, x: Coord) -> Result<()> {
        let len = self.dimensions().width();
        if x >= len {
            return Err(OutOfBounds {
                axis: Axis::Horizontal,
                index: x,
                len,
            });
        }
        Ok(())
    }

    fn check_row(&self, y: Coord) -> Result<()> {
        let len = self.dimensions().height();
        if y >= len {
            return Err(OutOfBounds {
                axis: Axis::Vertical,
                index: y,
                len,
            });
        }
        Ok(())
    }
}

/// Read-only view of one grid column, produced by a bounds-checked first
/// indexing stage.
#[derive(Copy, Clone, Debug)]
pub struct Column<'g> {
    grid: &'g Grid,
    x: Coord,
}

impl<'g> Column<'g> {
    /// Second indexing stage: checks the vertical index and yields the
    /// cell itself.
    pub fn cell(self, y: Coord) -> Result<&'g Cell> {
        self.grid.check_row(y)?;
        Ok(self.grid.cell_ref(Position::new(self.x, y)))
    }
}

/// Mutable view of one grid column.
#[derive(Debug)]
pub struct ColumnMut<'g> {
    grid: &'g mut Grid,
    x: Coord,
}

impl<'g> ColumnMut<'g> {
    pub fn cell(self, y: Coord) -> Result<CellMut<'g>> {
        self.grid.check_row(y)?;
        Ok(CellMut {
            position: Position::new(self.x, y),
            grid: self.grid,
        })
    }
}

/// Mutation handle for one cell.
///
/// Player moves route through the grid so that every status change is
/// aggregated and fanned out before the call returns; the handle only
/// remembers which cell it stands for.
#[derive(Debug)]
pub struct CellMut<'g> {
    grid: &'g mut Grid,
    position: Position,
}

impl CellMut<'_> {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn status(&self) -> CellStatus {
        self.grid.cell_ref(self.position).status()
    }

    pub fn adjacent_mines(&self) -> u8 {
        self.grid.cell_ref(self.position).adjacent_mines()
    }

    pub fn neighbors(&self) -> &[Position] {
        self.grid.cell_ref(self.position).neighbors()
    }

    pub fn binding(&self) -> HostBinding {
        self.grid.cell_ref(self.position).binding()
    }

    pub fn set_binding(&mut self, binding: HostBinding) {
        self.grid.cell_mut_ref(self.position).set_binding(binding);
    }

    /// Advances the `Hidden -> Marked -> Queried -> Hidden` cycle. A no-op
    /// on revealed cells.
    pub fn cycle_mark(&mut self) -> MarkOutcome {
        self.grid.cycle_mark_at(self.position)
    }

    /// Reveals this cell, flood-filling from it when it has no adjacent
    /// mines. Always reports the cell's value, even when the current
    /// status blocks the transition.
    pub fn reveal(&mut self) -> RevealOutcome {
        self.grid.reveal_at(self.position)
    }

    pub fn add_observer(&mut self, observer: Rc<dyn CellObserver>) {
        self.grid.cell_mut_ref(self.position).add_observer(observer);
    }

    pub fn remove_observer(&mut self, observer: &Rc<dyn CellObserver>) {
        self.grid
            .cell_mut_ref(self.position)
            .remove_observer(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dimensions;

    #[test]
    fn column_access_is_bounds_checked() {
        let grid = Grid::with_seed(Dimensions::new(3, 2, 0), 0);

        assert!(grid.column(2).is_ok());
        let err = grid.column(3).unwrap_err();
        assert_eq!(
            err,
            OutOfBounds {
                axis: Axis::Horizontal,
                index: 3,
                len: 3,
            }
        );
    }

    #[test]
    fn cell_access_is_bounds_checked() {
        let grid = Grid::with_seed(Dimensions::new(3, 2, 0), 0);

        assert!(grid.column(0).unwrap().cell(1).is_ok());
        let err = grid.column(0).unwrap().cell(2).unwrap_err();
        assert_eq!(
            err,
            OutOfBounds {
                axis: Axis::Vertical,
                index: 2,
                len: 2,
            }
        );
    }

    #[test]
    fn an_empty_grid_rejects_every_access() {
        let mut grid = Grid::default();
        grid.reset_with_mines(0, 0, &[]).unwrap();

        let err = grid.column(0).unwrap_err();
        assert_eq!(err.axis, Axis::Horizontal);
        assert_eq!(err.len, 0);

        let err = grid.column_mut(0).unwrap_err();
        assert_eq!(err.index, 0);
    }

    #[test]
    fn the_mutable_handle_reads_through_to_the_cell() {
        let mut grid = Grid::default();
        grid.reset_with_mines(2, 2, &[Position::new(1, 1)]).unwrap();

        let mut cell = grid.column_mut(0).unwrap().cell(0).unwrap();
        assert_eq!(cell.position(), Position::new(0, 0));
        assert_eq!(cell.status(), CellStatus::Hidden);
        assert_eq!(cell.adjacent_mines(), 1);
        assert_eq!(cell.neighbors().len(), 3);

        assert_eq!(cell.reveal(), RevealOutcome::Clear(1));
        assert_eq!(cell.status(), CellStatus::Unhidden);
    }

    #[test]
    fn cell_bindings_are_stored_per_cell() {
        let mut grid = Grid::with_seed(Dimensions::new(2, 1, 0), 0);

        let mut cell = grid.column_mut(0).unwrap().cell(0).unwrap();
        cell.set_binding(HostBinding::new(11, 13));
        assert_eq!(cell.binding(), HostBinding::new(11, 13));

        let other = grid.column(1).unwrap().cell(0).unwrap();
        assert_eq!(other.binding(), HostBinding::default());
    }
}

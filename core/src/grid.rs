use core::fmt;
use std::collections::VecDeque;
use std::rc::Rc;

use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::Dimensions;
use crate::binding::HostBinding;
use crate::cell::{Cell, CellKind, CellStatus, MarkOutcome, RevealOutcome};
use crate::error::{Axis, OutOfBounds, Result};
use crate::observer::{GridObserver, Subscribers};
use crate::types::{CellCount, Coord, Position, neighbors_of};

/// Aggregate outcome state of one grid instance.
///
/// `Ready` holds from construction or reset until the first cell event.
/// `Lost` is terminal for the life of the grid; `Won` is derived from the
/// counter formula and re-checked after every cell event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ready,
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Won => "WON",
            Self::Lost => "LOST",
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Ready
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The owning aggregate of all cells for one game instance.
///
/// The grid builds the cell arena and its neighbor graph, aggregates every
/// cell event into the running counters and the derived [`GameStatus`],
/// and fans grid-level events out to its observers. Cell references are
/// only valid within one generation: a reset destroys the whole arena.
#[derive(Debug)]
pub struct Grid {
    dimensions: Dimensions,
    cells: Array2<Cell>,
    status: GameStatus,
    unhidden: CellCount,
    marked: CellCount,
    queried: CellCount,
    observers: Subscribers<dyn GridObserver>,
    binding: HostBinding,
    rng: SmallRng,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(Dimensions::default())
    }
}

impl Grid {
    /// Builds a grid and brings it to `Ready` through a full reset, with
    /// mine placement drawn from an OS-seeded generator.
    pub fn new(dimensions: Dimensions) -> Self {
        Self::with_rng(dimensions, SmallRng::from_os_rng())
    }

    /// Deterministic mine placement for a fixed seed.
    pub fn with_seed(dimensions: Dimensions, seed: u64) -> Self {
        Self::with_rng(dimensions, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(dimensions: Dimensions, rng: SmallRng) -> Self {
        let mut grid = Self {
            dimensions: Dimensions::default(),
            cells: empty_arena(),
            status: GameStatus::Ready,
            unhidden: 0,
            marked: 0,
            queried: 0,
            observers: Subscribers::default(),
            binding: HostBinding::default(),
            rng,
        };
        grid.reset_with(dimensions);
        grid
    }

    /// Tears down and rebuilds with the current dimensions.
    pub fn reset(&mut self) {
        self.reset_with(self.dimensions);
    }

    /// Tears down and rebuilds with new dimensions. Grid observers are not
    /// cleared; they persist across resets of the same instance.
    pub fn reset_with(&mut self, dimensions: Dimensions) {
        let mask = place_mines(dimensions, &mut self.rng);
        self.rebuild(dimensions, mask);
    }

    /// Rebuilds with placement drawn from an injected random source.
    pub fn reset_with_rng<R: Rng>(&mut self, dimensions: Dimensions, rng: &mut R) {
        let mask = place_mines(dimensions, rng);
        self.rebuild(dimensions, mask);
    }

    /// Rebuilds with explicit mine positions; the stored mine count is the
    /// number of distinct positions given.
    pub fn reset_with_mines(&mut self, width: Coord, height: Coord, mines: &[Position]) -> Result<()> {
        let mut mask = Array2::from_elem((width as usize, height as usize), false);
        for &position in mines {
            if position.x >= width {
                return Err(OutOfBounds {
                    axis: Axis::Horizontal,
                    index: position.x,
                    len: width,
                });
            }
            if position.y >= height {
                return Err(OutOfBounds {
                    axis: Axis::Vertical,
                    index: position.y,
                    len: height,
                });
            }
            mask[position.nd()] = true;
        }

        let count = mask.iter().filter(|&&mined| mined).count() as CellCount;
        self.rebuild(Dimensions::new(width, height, count), mask);
        Ok(())
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Configured mine count minus marked count; negative when the player
    /// has marked more cells than there are mines.
    pub fn remaining_mines(&self) -> i64 {
        self.dimensions.mines() as i64 - self.marked as i64
    }

    pub fn add_observer(&mut self, observer: Rc<dyn GridObserver>) {
        self.observers.add(observer);
    }

    pub fn remove_observer(&mut self, observer: &Rc<dyn GridObserver>) {
        self.observers.remove(observer);
    }

    pub fn binding(&self) -> HostBinding {
        self.binding
    }

    pub fn set_binding(&mut self, binding: HostBinding) {
        self.binding = binding;
    }

    pub(crate) fn cell_ref(&self, position: Position) -> &Cell {
        &self.cells[position.nd()]
    }

    pub(crate) fn cell_mut_ref(&mut self, position: Position) -> &mut Cell {
        &mut self.cells[position.nd()]
    }

    pub(crate) fn cycle_mark_at(&mut self, position: Position) -> MarkOutcome {
        let Some(next) = self.cells[position.nd()].mark_transition() else {
            return MarkOutcome::NoChange;
        };
        self.cells[position.nd()].set_status(next);
        self.apply_events(&[position]);
        MarkOutcome::Changed
    }

    pub(crate) fn reveal_at(&mut self, position: Position) -> RevealOutcome {
        let outcome = self.cells[position.nd()].reveal_outcome();
        let Some(next) = self.cells[position.nd()].reveal_transition() else {
            return outcome;
        };
        self.cells[position.nd()].set_status(next);
        let mut changed = vec![position];

        // A zero-count cell floods into its neighbors. The state guard is
        // the visited marker: a popped cell that is no longer revealable
        // is skipped, so each cell is revealed at most once per call and
        // the traversal terminates on cyclic adjacency.
        if next == CellStatus::Unhidden && self.cells[position.nd()].adjacent_mines() == 0 {
            let mut to_visit: VecDeque<Position> =
                self.cells[position.nd()].neighbors().iter().copied().collect();

            while let Some(visit) = to_visit.pop_front() {
                let Some(status) = self.cells[visit.nd()].reveal_transition() else {
                    continue;
                };
                self.cells[visit.nd()].set_status(status);
                changed.push(visit);
                log::trace!(
                    "flood revealed {visit}, adjacent mines: {}",
                    self.cells[visit.nd()].adjacent_mines()
                );

                if self.cells[visit.nd()].adjacent_mines() == 0 {
                    to_visit.extend(self.cells[visit.nd()].neighbors().iter().copied());
                }
            }
        }

        self.apply_events(&changed);
        outcome
    }

    /// Feeds a batch of cell status changes through the aggregate state
    /// machine. Per event the dispatch order is fixed: the cell's own
    /// observers, the grid cell-status event, the remaining-mines event
    /// (marks and queries only), and last the game-status event when the
    /// derived status changed.
    fn apply_events(&mut self, changed: &[Position]) {
        for &position in changed {
            let status = self.cells[position.nd()].status();
            let previous = self.status;

            match status {
                // Only reachable by cycling a query back around.
                CellStatus::Hidden => self.queried -= 1,
                CellStatus::Unhidden => self.unhidden += 1,
                CellStatus::Marked => self.marked += 1,
                // Only reachable from a mark.
                CellStatus::Queried => {
                    self.marked -= 1;
                    self.queried += 1;
                }
                CellStatus::Mined => self.status = GameStatus::Lost,
            }

            if self.status != GameStatus::Lost {
                let all_safe_unhidden = self.unhidden == self.dimensions.safe_cell_count();
                self.status = if all_safe_unhidden && self.marked == self.dimensions.mines() {
                    GameStatus::Won
                } else {
                    GameStatus::Running
                };
            }

            let remaining = self.remaining_mines();
            let game_status = self.status;

            let cell = &self.cells[position.nd()];
            for observer in cell.observers_snapshot() {
                observer.on_status_changed(cell, status);
            }
            for observer in self.observers.snapshot() {
                observer.on_cell_status_changed(self, cell, status);
            }
            if matches!(status, CellStatus::Marked | CellStatus::Queried) {
                for observer in self.observers.snapshot() {
                    observer.on_remaining_mines_changed(self, remaining);
                }
            }
            if game_status != previous {
                log::debug!("game status changed: {previous} -> {game_status}");
                for observer in self.observers.snapshot() {
                    observer.on_game_status_changed(self, game_status);
                }
            }
        }
    }

    /// Destroys the current arena. Every cell notifies its own observers
    /// of the deletion and the grid re-broadcasts it, before anything is
    /// dropped. No counter adjustment happens here; a rebuild resets the
    /// counters separately.
    fn tear_down(&mut self) {
        for cell in self.cells.iter() {
            for observer in cell.observers_snapshot() {
                observer.on_deleted(cell);
            }
            for observer in self.observers.snapshot() {
                observer.on_cell_deleted(self, cell);
            }
        }
        self.cells = empty_arena();
    }

    fn rebuild(&mut self, dimensions: Dimensions, mines: Array2<bool>) {
        self.tear_down();

        self.dimensions = dimensions;
        self.status = GameStatus::Ready;
        self.unhidden = 0;
        self.marked = 0;
        self.queried = 0;

        let width = dimensions.width();
        let height = dimensions.height();

        // Construct the arena, a mine variant wherever the mask says so.
        self.cells = Array2::from_shape_fn((width as usize, height as usize), |(x, y)| {
            let kind = if mines[[x, y]] {
                CellKind::Mine
            } else {
                CellKind::Plain
            };
            Cell::new(Position::new(x as Coord, y as Coord), kind)
        });

        // Wire the neighbor graph for every cell.
        for y in 0..height {
            for x in 0..width {
                let position = Position::new(x, y);
                for neighbor in neighbors_of(position, width, height) {
                    self.cells[position.nd()].push_neighbor(neighbor);
                }
            }
        }

        // Only now do mines inform their neighbors. Counting is a function
        // of the finished graph, not a side effect of individual links.
        let mine_positions: Vec<Position> = self
            .cells
            .iter()
            .filter(|cell| cell.kind() == CellKind::Mine)
            .map(|cell| cell.position())
            .collect();
        for position in mine_positions {
            let neighbors: Vec<Position> = self.cells[position.nd()].neighbors().to_vec();
            for neighbor in neighbors {
                self.cells[neighbor.nd()].inc_adjacent_mines();
            }
        }

        log::debug!(
            "grid rebuilt: {width}x{height} with {} mines",
            dimensions.mines()
        );

        for observer in self.observers.snapshot() {
            observer.on_game_status_changed(self, self.status);
        }
    }
}

impl Drop for Grid {
    fn drop(&mut self) {
        self.tear_down();
    }
}

fn empty_arena() -> Array2<Cell> {
    Array2::from_shape_fn((0, 0), |(x, y)| {
        Cell::new(Position::new(x as Coord, y as Coord), CellKind::Plain)
    })
}

/// Rejection-sampling mine placement: draw uniform flat indices and redraw
/// on collision until the configured count is placed. Unbiased, and valid
/// up to a fully mined grid.
fn place_mines<R: Rng>(dimensions: Dimensions, rng: &mut R) -> Array2<bool> {
    let width = dimensions.width();
    let height = dimensions.height();
    let mut mask = Array2::from_elem((width as usize, height as usize), false);

    let total = dimensions.total_cells();
    let mut placed: CellCount = 0;
    while placed < dimensions.mines() {
        let flat = rng.random_range(0..total);
        let position = Position::new(
            (flat % width as CellCount) as Coord,
            (flat / width as CellCount) as Coord,
        );
        if !mask[position.nd()] {
            mask[position.nd()] = true;
            placed += 1;
        }
    }

    log::debug!("placed {placed} mines on a {width}x{height} grid");
    mask
}

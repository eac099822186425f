use core::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::binding::HostBinding;
use crate::observer::{CellObserver, Subscribers};
use crate::types::Position;

/// Mark/reveal state of a single cell.
///
/// `Mined` is terminal and only reachable by revealing a mine. `Unhidden`
/// is terminal for non-mine cells except through a full grid reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Hidden,
    Unhidden,
    Marked,
    Queried,
    Mined,
}

impl CellStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "HIDDEN",
            Self::Unhidden => "UNHIDDEN",
            Self::Marked => "MARKED",
            Self::Queried => "QUERIED",
            Self::Mined => "MINED",
        }
    }

    /// Whether a reveal is still allowed from this state.
    pub(crate) const fn revealable(self) -> bool {
        matches!(self, Self::Hidden | Self::Queried)
    }
}

impl Default for CellStatus {
    fn default() -> Self {
        Self::Hidden
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects the reveal/propagation behavior of a cell. A mine is the hazard
/// itself; its own adjacent-mine count is meaningless to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Plain,
    Mine,
}

/// Result of [`cycle_mark`](crate::CellMut::cycle_mark).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Result of [`reveal`](crate::CellMut::reveal): the adjacent-mine count of
/// the cell, or the mine sentinel. Reported even when the state guard
/// blocked the transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Clear(u8),
    Mine,
}

impl RevealOutcome {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// One grid entity: a position, a mark/reveal state machine, the count of
/// adjacent mines and the wired neighbor positions.
///
/// Cells are owned by the grid arena for exactly one generation between
/// resets; neighbor references are positions into the same generation.
#[derive(Debug)]
pub struct Cell {
    position: Position,
    kind: CellKind,
    status: CellStatus,
    adjacent_mines: u8,
    neighbors: SmallVec<[Position; 8]>,
    observers: Subscribers<dyn CellObserver>,
    binding: HostBinding,
}

impl Cell {
    pub(crate) fn new(position: Position, kind: CellKind) -> Self {
        Self {
            position,
            kind,
            status: CellStatus::default(),
            adjacent_mines: 0,
            neighbors: SmallVec::new(),
            observers: Subscribers::default(),
            binding: HostBinding::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// The wired grid-adjacent positions, clipped at the boundaries.
    pub fn neighbors(&self) -> &[Position] {
        &self.neighbors
    }

    pub fn binding(&self) -> HostBinding {
        self.binding
    }

    pub(crate) fn kind(&self) -> CellKind {
        self.kind
    }

    pub(crate) fn set_status(&mut self, status: CellStatus) {
        self.status = status;
    }

    pub(crate) fn set_binding(&mut self, binding: HostBinding) {
        self.binding = binding;
    }

    pub(crate) fn push_neighbor(&mut self, position: Position) {
        self.neighbors.push(position);
    }

    pub(crate) fn inc_adjacent_mines(&mut self) {
        self.adjacent_mines += 1;
    }

    pub(crate) fn add_observer(&mut self, observer: Rc<dyn CellObserver>) {
        self.observers.add(observer);
    }

    pub(crate) fn remove_observer(&mut self, observer: &Rc<dyn CellObserver>) {
        self.observers.remove(observer);
    }

    pub(crate) fn observers_snapshot(&self) -> Vec<Rc<dyn CellObserver>> {
        self.observers.snapshot()
    }

    /// Next status in the `Hidden -> Marked -> Queried -> Hidden` cycle,
    /// or `None` once the cell is revealed.
    pub(crate) fn mark_transition(&self) -> Option<CellStatus> {
        match self.status {
            CellStatus::Hidden => Some(CellStatus::Marked),
            CellStatus::Marked => Some(CellStatus::Queried),
            CellStatus::Queried => Some(CellStatus::Hidden),
            CellStatus::Unhidden | CellStatus::Mined => None,
        }
    }

    /// Status reached by revealing this cell, if the guard allows it.
    /// Blocked from `Marked` and from the terminal states.
    pub(crate) fn reveal_transition(&self) -> Option<CellStatus> {
        if !self.status.revealable() {
            return None;
        }
        Some(match self.kind {
            CellKind::Plain => CellStatus::Unhidden,
            CellKind::Mine => CellStatus::Mined,
        })
    }

    /// The value every reveal call reports for this cell, whether or not
    /// the transition was allowed.
    pub(crate) fn reveal_outcome(&self) -> RevealOutcome {
        match self.kind {
            CellKind::Plain => RevealOutcome::Clear(self.adjacent_mines),
            CellKind::Mine => RevealOutcome::Mine,
        }
    }
}

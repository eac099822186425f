use core::fmt;
use std::rc::Rc;

use crate::cell::{Cell, CellStatus};
use crate::grid::{GameStatus, Grid};

/// Callbacks fired by a single cell. All methods default to no-ops so an
/// implementor only overrides the events it cares about.
///
/// Notification is direct and synchronous: by the time the mutating call
/// returns, every registered observer has been informed.
pub trait CellObserver {
    /// Called after the cell's status actually changed.
    fn on_status_changed(&self, _cell: &Cell, _status: CellStatus) {}

    /// Called right before the cell is destroyed.
    fn on_deleted(&self, _cell: &Cell) {}
}

/// Grid-level callbacks: per-cell events re-broadcast by the grid, plus the
/// aggregate game-status and remaining-mines events only the grid can
/// derive.
pub trait GridObserver {
    /// Called after any cell of the grid changed its status.
    fn on_cell_status_changed(&self, _grid: &Grid, _cell: &Cell, _status: CellStatus) {}

    /// Called right before a cell is destroyed during grid teardown.
    fn on_cell_deleted(&self, _grid: &Grid, _cell: &Cell) {}

    /// Called after the derived game status changed.
    fn on_game_status_changed(&self, _grid: &Grid, _status: GameStatus) {}

    /// Called after a mark or query changed the remaining-mines count.
    /// The count is the configured mine count minus the marked count and
    /// goes negative when more cells are marked than mines exist.
    fn on_remaining_mines_changed(&self, _grid: &Grid, _remaining: i64) {}
}

/// Identity-keyed observer registry.
///
/// Registering the same observer twice is a no-op, as is removing one that
/// was never registered. Dispatch always runs over a snapshot, so a
/// callback may mutate the registry without corrupting the in-progress
/// notification pass.
pub(crate) struct Subscribers<T: ?Sized> {
    entries: Vec<Rc<T>>,
}

impl<T: ?Sized> Subscribers<T> {
    pub(crate) fn add(&mut self, observer: Rc<T>) {
        if !self.entries.iter().any(|entry| same_observer(entry, &observer)) {
            self.entries.push(observer);
        }
    }

    pub(crate) fn remove(&mut self, observer: &Rc<T>) {
        self.entries.retain(|entry| !same_observer(entry, observer));
    }

    pub(crate) fn snapshot(&self) -> Vec<Rc<T>> {
        self.entries.clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Registration identity is the data address, ignoring vtables.
fn same_observer<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell as StdCell;

    struct Probe {
        hits: StdCell<u32>,
    }

    impl Probe {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                hits: StdCell::new(0),
            })
        }

        fn ping(&self) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    #[test]
    fn duplicate_registration_is_a_noop() {
        let mut subscribers: Subscribers<Probe> = Subscribers::default();
        let probe = Probe::new();

        subscribers.add(probe.clone());
        subscribers.add(probe.clone());
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn removing_an_unregistered_observer_is_a_noop() {
        let mut subscribers: Subscribers<Probe> = Subscribers::default();
        subscribers.add(Probe::new());

        let stranger = Probe::new();
        subscribers.remove(&stranger);
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn snapshot_survives_registry_mutation() {
        let mut subscribers: Subscribers<Probe> = Subscribers::default();
        let first = Probe::new();
        let second = Probe::new();
        subscribers.add(first.clone());
        subscribers.add(second.clone());

        let snapshot = subscribers.snapshot();
        subscribers.remove(&first);
        subscribers.remove(&second);
        assert_eq!(subscribers.len(), 0);

        for probe in &snapshot {
            probe.ping();
        }
        assert_eq!(first.hits.get(), 1);
        assert_eq!(second.hits.get(), 1);
    }
}

use std::sync::{Arc, PoisonError, RwLock};

use crate::trace::TraceStore;

use super::color::{CellColor, VerdictColorMap};
use super::traversal::CellUpdate;

#[derive(Clone, Debug, Default)]
pub struct GridSnapshot {
    columns: usize,
    cells: Vec<CellColor>,
    revision: u64,
}

impl GridSnapshot {
    pub fn read(&self, tp: usize, column: usize) -> CellColor {
        self.index(tp, column)
            .and_then(|index| self.cells.get(index))
            .copied()
            .unwrap_or_default()
    }

    pub fn rows(&self) -> usize {
        self.cells.len().checked_div(self.columns).unwrap_or(0)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn index(&self, tp: usize, column: usize) -> Option<usize> {
        if column >= self.columns || tp >= self.rows() {
            return None;
        }
        tp.checked_mul(self.columns)?.checked_add(column)
    }

    fn cell_mut(&mut self, tp: usize, column: usize) -> Option<&mut CellColor> {
        let index = self.index(tp, column)?;
        self.cells.get_mut(index)
    }

    fn push_rows(&mut self, store: &TraceStore, colors: &VerdictColorMap, from_tp: usize) {
        for row in store.rows().iter().skip(from_tp) {
            self.cells.push(colors.color(&row.explanation));
            self.cells
                .extend(std::iter::repeat_n(CellColor::Neutral, self.columns.saturating_sub(1)));
        }
    }
}

// Snapshots compare by content; the revision only tracks publication.
impl PartialEq for GridSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.cells == other.cells
    }
}

type SharedSnapshot = Arc<RwLock<Arc<GridSnapshot>>>;

/// Owner of the grid colors. Every mutation builds a complete new snapshot
/// and swaps it in, so readers see either the old or the new grid.
pub struct GridStateController {
    shared: SharedSnapshot,
    colors: VerdictColorMap,
}

#[derive(Clone)]
pub struct GridReader {
    shared: SharedSnapshot,
}

impl GridReader {
    pub fn snapshot(&self) -> Arc<GridSnapshot> {
        Arc::clone(&self.shared.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl GridStateController {
    pub fn new(store: &TraceStore, columns: usize, colors: VerdictColorMap) -> Self {
        let controller = Self {
            shared: Arc::new(RwLock::new(Arc::new(GridSnapshot::default()))),
            colors,
        };
        controller.initialize(store, columns);
        controller
    }

    pub fn initialize(&self, store: &TraceStore, columns: usize) {
        let mut guard = self.shared.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = GridSnapshot {
            columns,
            cells: Vec::with_capacity(store.len() * columns),
            revision: guard.revision + 1,
        };
        if columns > 0 {
            next.push_rows(store, &self.colors, 0);
        }

        *guard = Arc::new(next);
    }

    pub fn extend(&self, store: &TraceStore) -> usize {
        let mut guard = self.shared.write().unwrap_or_else(PoisonError::into_inner);

        let existing = guard.rows();
        if store.len() <= existing || guard.columns == 0 {
            return 0;
        }

        let mut next = GridSnapshot::clone(&guard);
        next.push_rows(store, &self.colors, existing);
        next.revision += 1;
        *guard = Arc::new(next);

        store.len() - existing
    }

    /// Writes the whole batch in one publication and returns how many cells
    /// changed color. Updates outside the grid are ignored.
    pub fn apply_batch<'a, I>(&self, updates: I) -> usize
    where
        I: IntoIterator<Item = &'a CellUpdate>,
    {
        let mut guard = self.shared.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = GridSnapshot::clone(&guard);
        let mut changed = 0usize;
        for update in updates {
            if let Some(cell) = next.cell_mut(update.tp, update.column)
                && *cell != update.color
            {
                *cell = update.color;
                changed += 1;
            }
        }

        if changed > 0 {
            next.revision += 1;
            *guard = Arc::new(next);
        }

        changed
    }

    pub fn read(&self, tp: usize, column: usize) -> CellColor {
        self.snapshot().read(tp, column)
    }

    pub fn snapshot(&self) -> Arc<GridSnapshot> {
        Arc::clone(&self.shared.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn reader(&self) -> GridReader {
        GridReader {
            shared: Arc::clone(&self.shared),
        }
    }
}

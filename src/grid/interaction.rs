use std::sync::Arc;

use anyhow::Result;
use log::{debug, info, warn};

use crate::error::GridError;
use crate::trace::{Column, LoadedTrace, SubformulaRegistry, TraceStore};

use super::color::{CellColor, VerdictColorMap};
use super::state::{GridReader, GridSnapshot, GridStateController};
use super::traversal::ExplanationTraversal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Processing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Busy,
    Applied {
        tp: usize,
        updates: usize,
        changed: usize,
        warnings: Vec<GridError>,
    },
    Failed(GridError),
}

pub struct InteractionController {
    store: Arc<TraceStore>,
    registry: Arc<SubformulaRegistry>,
    colors: VerdictColorMap,
    grid: GridStateController,
    state: InteractionState,
    max_depth: usize,
}

impl InteractionController {
    pub fn new(trace: LoadedTrace, max_depth: usize) -> Self {
        let colors = VerdictColorMap;
        let grid = GridStateController::new(&trace.store, trace.registry.len(), colors);

        Self {
            store: Arc::new(trace.store),
            registry: Arc::new(trace.registry),
            colors,
            grid,
            state: InteractionState::Idle,
            max_depth,
        }
    }

    pub fn click(&mut self, tp: usize, column: usize) -> ClickOutcome {
        if column != 0 {
            return ClickOutcome::Ignored;
        }

        if self.state == InteractionState::Processing {
            warn!("dropping click on tp {tp}: previous click still in progress");
            return ClickOutcome::Busy;
        }

        self.state = InteractionState::Processing;
        let outcome = self.propagate(tp);
        self.state = InteractionState::Idle;

        outcome
    }

    fn propagate(&self, tp: usize) -> ClickOutcome {
        let row = match self.store.row_at(tp) {
            Ok(row) => row,
            Err(error) => {
                warn!("ignoring click: {error}");
                return ClickOutcome::Failed(error);
            }
        };

        let traversal = ExplanationTraversal::new(&self.registry, &self.colors, self.store.len())
            .with_max_depth(self.max_depth);
        let changed_cells = match traversal.changed_cells(&row.explanation, tp) {
            Ok(changed_cells) => changed_cells,
            Err(error) => return ClickOutcome::Failed(error),
        };

        let changed = self.grid.apply_batch(&changed_cells.updates);
        debug!(
            "click on tp {tp}: {} updates, {changed} cells recolored, {} warnings",
            changed_cells.updates.len(),
            changed_cells.warnings.len()
        );

        ClickOutcome::Applied {
            tp,
            updates: changed_cells.updates.len(),
            changed,
            warnings: changed_cells.warnings,
        }
    }

    pub fn reset(&mut self) {
        self.grid.initialize(&self.store, self.registry.len());
        self.state = InteractionState::Idle;
        info!("grid reset to root verdicts");
    }

    pub fn refresh(&mut self, trace: LoadedTrace) {
        self.store = Arc::new(trace.store);
        self.registry = Arc::new(trace.registry);
        self.reset();
        info!(
            "trace refreshed: {} time points, {} columns",
            self.store.len(),
            self.registry.len()
        );
    }

    pub fn append(&mut self, trace: LoadedTrace) -> Result<usize> {
        if trace.registry != *self.registry {
            return Err(GridError::RegistryMismatch {
                expected: self.registry.len(),
                found: trace.registry.len(),
            }
            .into());
        }

        let new_rows = trace
            .store
            .rows()
            .iter()
            .skip(self.store.len())
            .cloned()
            .collect::<Vec<_>>();
        if new_rows.is_empty() {
            info!("append found no new time points");
            return Ok(0);
        }

        let extended = self.store.extended(new_rows)?;
        self.store = Arc::new(extended);
        let added = self.grid.extend(&self.store);
        self.state = InteractionState::Idle;

        info!("appended {added} time points");
        Ok(added)
    }

    pub fn render_cell(&self, tp: usize, column: usize) -> CellColor {
        self.grid.read(tp, column)
    }

    pub fn snapshot(&self) -> Arc<GridSnapshot> {
        self.grid.snapshot()
    }

    pub fn reader(&self) -> GridReader {
        self.grid.reader()
    }

    pub fn columns(&self) -> Vec<Column> {
        self.registry.columns()
    }

    pub fn store(&self) -> &TraceStore {
        &self.store
    }

    pub fn registry(&self) -> &SubformulaRegistry {
        &self.registry
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }
}

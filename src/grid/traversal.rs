use std::collections::BTreeSet;

use log::{debug, warn};

use crate::error::GridError;
use crate::trace::{ExplanationNode, SubformulaRegistry};

use super::color::{CellColor, VerdictColorMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellUpdate {
    pub tp: usize,
    pub column: usize,
    pub color: CellColor,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangedCells {
    pub updates: BTreeSet<CellUpdate>,
    pub warnings: Vec<GridError>,
}

pub struct ExplanationTraversal<'a> {
    registry: &'a SubformulaRegistry,
    colors: &'a VerdictColorMap,
    row_count: usize,
    max_depth: usize,
}

impl<'a> ExplanationTraversal<'a> {
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    pub fn new(registry: &'a SubformulaRegistry, colors: &'a VerdictColorMap, row_count: usize) -> Self {
        Self {
            registry,
            colors,
            row_count,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Cells colored by the descendants of `node`, which is owned by
    /// `owning_tp`. The node itself contributes nothing, and `(owning_tp, 0)`
    /// is never part of the result.
    pub fn changed_cells(
        &self,
        node: &ExplanationNode,
        owning_tp: usize,
    ) -> Result<ChangedCells, GridError> {
        let mut changed = ChangedCells::default();
        self.visit_children(node, owning_tp, 1, owning_tp, &mut changed)
            .inspect_err(|error| warn!("aborting traversal: {error}"))?;

        changed
            .updates
            .retain(|update| !(update.tp == owning_tp && update.column == 0));
        Ok(changed)
    }

    fn visit_children(
        &self,
        node: &ExplanationNode,
        node_tp: usize,
        depth: usize,
        root_tp: usize,
        changed: &mut ChangedCells,
    ) -> Result<(), GridError> {
        if node.children.is_empty() {
            return Ok(());
        }

        if depth > self.max_depth {
            return Err(GridError::MalformedExplanation {
                tp: root_tp,
                max_depth: self.max_depth,
            });
        }

        for child in &node.children {
            if child.tp != node_tp && !node.kind.is_temporal() {
                debug!(
                    "{} node for `{}` at tp {node_tp} has a child at tp {}",
                    node.kind.label(),
                    node.formula_id,
                    child.tp
                );
            }

            let column = match self.registry.column_of(&child.formula_id, child.tp) {
                Ok(column) => column,
                Err(error) => {
                    warn!("skipping branch: {error}");
                    changed.warnings.push(error);
                    continue;
                }
            };

            if child.tp >= self.row_count {
                let error = GridError::UnknownTimePoint { tp: child.tp };
                warn!("skipping branch: {error}");
                changed.warnings.push(error);
                continue;
            }

            changed.updates.insert(CellUpdate {
                tp: child.tp,
                column,
                color: self.colors.color(child),
            });

            self.visit_children(child, child.tp, depth + 1, root_tp, changed)?;
        }

        Ok(())
    }
}

use thiserror::Error;

/// Conditions raised while turning a clicked explanation into grid updates.
///
/// `UnregisteredFormula` and `UnknownTimePoint` are recoverable: the traversal
/// skips the offending branch and reports them next to the updates it did
/// produce. `MalformedExplanation` aborts the whole click.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("formula `{formula_id}` referenced at tp {tp} is not registered as a column")]
    UnregisteredFormula { formula_id: String, tp: usize },

    #[error("time point {tp} is not part of the loaded trace")]
    UnknownTimePoint { tp: usize },

    #[error("explanation clicked at tp {tp} is nested deeper than {max_depth} levels")]
    MalformedExplanation { tp: usize, max_depth: usize },

    #[error("appended trace uses a different subformula registry ({expected} columns loaded, {found} offered)")]
    RegistryMismatch { expected: usize, found: usize },
}

impl GridError {
    pub fn is_fatal_for_click(&self) -> bool {
        matches!(self, Self::MalformedExplanation { .. })
    }
}

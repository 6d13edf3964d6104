mod load;
mod model;
mod parse;
mod registry;

pub use load::{LoadedTrace, load_trace};
pub use model::{ExplanationNode, NodeKind, TraceStore, Verdict};
pub use registry::{Column, SubformulaRegistry};

#[cfg(test)]
pub use load::parse_trace;
#[cfg(test)]
pub use model::TraceRow;

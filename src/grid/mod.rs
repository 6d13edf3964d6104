mod color;
mod interaction;
mod state;
mod traversal;

pub use color::CellColor;
pub use interaction::{ClickOutcome, InteractionController, InteractionState};
pub use state::GridReader;
pub use traversal::ExplanationTraversal;

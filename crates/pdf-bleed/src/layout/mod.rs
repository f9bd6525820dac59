//! Page geometry and content placement
//!
//! Everything in this module works in the page-local frame: origin at
//! the trim's top-left corner, y increasing downward. The rendering
//! backend converts to PDF device space in exactly one place.

mod boxes;
mod edges;
mod fit;
mod types;

pub use boxes::compute_boxes;
pub use edges::synthesize_edges;
pub use fit::{solve, solve_into};
pub use types::{EdgeExtensionInstruction, EdgeKind, EdgeSide, PageBoxes, Placement, Rect};

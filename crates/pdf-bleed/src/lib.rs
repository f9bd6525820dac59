pub mod assets;
pub mod compose;
pub mod constants;
pub mod layout;
pub mod marks;
mod options;
mod plan;
pub mod render;
mod types;

pub use assets::{pick_page_box, AssetReader, ImageAssetReader, PdfAssetReader, SourceRect};
pub use compose::{compose, load_image, load_pdf, save_pdf, ComposeOutcome};
pub use layout::{
    compute_boxes, solve, solve_into, synthesize_edges, EdgeExtensionInstruction, EdgeKind,
    EdgeSide, PageBoxes, Placement, Rect,
};
pub use marks::{generate_crop_marks, CropMarkSpec, MarkSegment};
pub use options::*;
pub use plan::{build_page_plans, parse_page_range, PagePlan, PageRange, PlanOutcome};
pub use render::{LopdfBackend, RenderBackend, SourceContent};
pub use types::*;

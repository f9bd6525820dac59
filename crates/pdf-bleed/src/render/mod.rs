//! Rendering backends
//!
//! A backend consumes page plans and produces the output artifact.
//! Conversion from the page-local frame to device coordinates happens
//! inside the backend, in exactly one place; plans never carry device
//! coordinates.

mod page;
mod xobject;

pub use page::{LopdfBackend, SourceContent};
pub use xobject::{copy_object_deep, create_form_xobject, create_image_xobject};

use crate::plan::PagePlan;
use crate::types::Result;

/// Consumer of page plans.
///
/// `reset_origin` must run once per job before any page is emitted:
/// stateful hosts (a desktop automation session kept open across jobs)
/// carry coordinate-origin state between jobs, and stale state shifts
/// every placement silently.
pub trait RenderBackend {
    /// Clear any host coordinate-origin or cross-job state
    fn reset_origin(&mut self);

    /// Realize one page plan
    fn render_page(&mut self, plan: &PagePlan) -> Result<()>;

    /// Emit a page whose content placement failed, with a visible
    /// marker instead of silently missing content
    fn render_error_page(&mut self, plan: &PagePlan, reason: &str) -> Result<()>;
}

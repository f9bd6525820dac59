//! Page box derivation
//!
//! Derives the four nested page boxes from a trim size and per-side
//! bleed offsets. The origin convention (trim top-left, y down) is
//! fixed here and honored by every downstream consumer; backends must
//! not re-derive it, or content silently shifts between renderers.

use super::types::{PageBoxes, Rect};
use crate::types::{BleedSpec, Result, TrimSize};

/// Compute TrimBox, BleedBox, MediaBox and CropBox for one page.
///
/// Total for any positive trim; negative bleed offsets clamp to zero,
/// so `BleedBox ⊇ TrimBox` always holds and zero bleed collapses the
/// BleedBox onto the TrimBox.
pub fn compute_boxes(trim: &TrimSize, bleed: &BleedSpec) -> Result<PageBoxes> {
    let trim_w = trim.width_pt()?;
    let trim_h = trim.height_pt()?;
    let top = bleed.top_pt()?;
    let right = bleed.right_pt()?;
    let bottom = bleed.bottom_pt()?;
    let left = bleed.left_pt()?;

    let trim_box = Rect::new(0.0, 0.0, trim_w, trim_h);
    let bleed_box = Rect::new(-left, -top, trim_w + left + right, trim_h + top + bottom);

    Ok(PageBoxes {
        trim: trim_box,
        bleed: bleed_box,
        media: bleed_box,
        crop: bleed_box,
    })
}

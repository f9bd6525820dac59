//! Crop-mark geometry
//!
//! Short ticks outside each trim corner showing where the sheet is
//! cut. Segments live in the page-local frame; the rendering backend
//! strokes them after converting to device space.

use crate::constants::{CROP_MARK_GAP, CROP_MARK_LENGTH, CROP_MARK_WIDTH};
use crate::layout::PageBoxes;

/// One stroked line segment in the page-local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Crop-mark strokes for one page
#[derive(Debug, Clone, PartialEq)]
pub struct CropMarkSpec {
    pub segments: Vec<MarkSegment>,
    pub line_width: f32,
}

/// Generate crop marks for the given boxes.
///
/// Marks start `CROP_MARK_GAP` outside the trim edges and are
/// shortened so they never cross the MediaBox; a margin too thin to
/// hold any stroke past the gap contributes no segment. Returns `None`
/// when nothing fits.
pub fn generate_crop_marks(boxes: &PageBoxes) -> Option<CropMarkSpec> {
    let trim = boxes.trim;
    let mut segments = Vec::new();

    // Horizontal ticks extend into the left/right margins at the trim's
    // top and bottom edges; vertical ticks extend into the top/bottom
    // margins at the trim's left and right edges.
    if let Some(len) = mark_length(boxes.margin_left()) {
        let x0 = trim.x - CROP_MARK_GAP;
        let x1 = x0 - len;
        segments.push(MarkSegment { x0, y0: trim.y, x1, y1: trim.y });
        segments.push(MarkSegment { x0, y0: trim.bottom(), x1, y1: trim.bottom() });
    }
    if let Some(len) = mark_length(boxes.margin_right()) {
        let x0 = trim.right() + CROP_MARK_GAP;
        let x1 = x0 + len;
        segments.push(MarkSegment { x0, y0: trim.y, x1, y1: trim.y });
        segments.push(MarkSegment { x0, y0: trim.bottom(), x1, y1: trim.bottom() });
    }
    if let Some(len) = mark_length(boxes.margin_top()) {
        let y0 = trim.y - CROP_MARK_GAP;
        let y1 = y0 - len;
        segments.push(MarkSegment { x0: trim.x, y0, x1: trim.x, y1 });
        segments.push(MarkSegment { x0: trim.right(), y0, x1: trim.right(), y1 });
    }
    if let Some(len) = mark_length(boxes.margin_bottom()) {
        let y0 = trim.bottom() + CROP_MARK_GAP;
        let y1 = y0 + len;
        segments.push(MarkSegment { x0: trim.x, y0, x1: trim.x, y1 });
        segments.push(MarkSegment { x0: trim.right(), y0, x1: trim.right(), y1 });
    }

    if segments.is_empty() {
        None
    } else {
        Some(CropMarkSpec {
            segments,
            line_width: CROP_MARK_WIDTH,
        })
    }
}

/// Usable mark length within a margin, or `None` if the margin cannot
/// hold any stroke past the gap
fn mark_length(margin: f32) -> Option<f32> {
    let available = margin - CROP_MARK_GAP;
    if available <= 0.0 {
        None
    } else {
        Some(CROP_MARK_LENGTH.min(available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_boxes;
    use crate::types::{BleedSpec, Length, TrimSize};

    fn boxes(bleed_in: f32) -> PageBoxes {
        compute_boxes(
            &TrimSize::new(Length::inches(4.0), Length::inches(6.0)),
            &BleedSpec::uniform(Length::inches(bleed_in)),
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_bleed_yields_eight_segments() {
        let marks = generate_crop_marks(&boxes(0.25)).unwrap();
        assert_eq!(marks.segments.len(), 8);
        assert_eq!(marks.line_width, CROP_MARK_WIDTH);
    }

    #[test]
    fn test_zero_bleed_yields_none() {
        assert!(generate_crop_marks(&boxes(0.0)).is_none());
    }

    #[test]
    fn test_marks_stay_inside_media_box() {
        // 0.125in = 9pt margin: shorter than the nominal mark length,
        // so every segment is clamped
        let boxes = boxes(0.125);
        let marks = generate_crop_marks(&boxes).unwrap();
        for segment in &marks.segments {
            for (x, y) in [(segment.x0, segment.y0), (segment.x1, segment.y1)] {
                assert!(x >= boxes.media.x - 1e-4 && x <= boxes.media.right() + 1e-4);
                assert!(y >= boxes.media.y - 1e-4 && y <= boxes.media.bottom() + 1e-4);
            }
        }
    }

    #[test]
    fn test_marks_stay_outside_trim() {
        let boxes = boxes(0.5);
        let marks = generate_crop_marks(&boxes).unwrap();
        for segment in &marks.segments {
            let mid_x = (segment.x0 + segment.x1) / 2.0;
            let mid_y = (segment.y0 + segment.y1) / 2.0;
            let strictly_inside = mid_x > boxes.trim.x
                && mid_x < boxes.trim.right()
                && mid_y > boxes.trim.y
                && mid_y < boxes.trim.bottom();
            assert!(!strictly_inside);
        }
    }

    #[test]
    fn test_asymmetric_margin_skips_side() {
        let boxes = compute_boxes(
            &TrimSize::new(Length::inches(4.0), Length::inches(6.0)),
            &BleedSpec::new(
                Length::inches(0.25),
                Length::inches(0.0),
                Length::inches(0.0),
                Length::inches(0.0),
            ),
        )
        .unwrap();
        let marks = generate_crop_marks(&boxes).unwrap();
        // Only the two vertical ticks in the top margin fit
        assert_eq!(marks.segments.len(), 2);
        for segment in &marks.segments {
            assert!(segment.y0 < 0.0 && segment.y1 < 0.0);
        }
    }
}

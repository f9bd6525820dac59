//! Synthetic bleed from edge extension
//!
//! When the source carries no native bleed, the margins are fabricated
//! from the edges of the placed, trimmed content. Each side is handled
//! independently. Instructions are emitted top, bottom, left, right;
//! the left/right destinations span the full bleed height and are
//! applied last, so the side strips own the corner regions.

use super::types::{EdgeExtensionInstruction, EdgeKind, EdgeSide, PageBoxes, Rect};
use crate::constants::SMEAR_EDGE_LINE_PT;
use crate::types::BleedGenerator;

/// Build the edge-extension instructions for one page.
///
/// `content` is the placed content's bounding box; it is clipped to the
/// TrimBox before slicing. A side with zero bleed emits nothing.
pub fn synthesize_edges(
    content: &Rect,
    boxes: &PageBoxes,
    generator: BleedGenerator,
) -> Vec<EdgeExtensionInstruction> {
    let kind = match generator {
        BleedGenerator::None => return Vec::new(),
        BleedGenerator::Mirror => EdgeKind::Mirror,
        BleedGenerator::Smear => EdgeKind::Smear,
    };

    let content = content.intersect(&boxes.trim);
    if content.width <= 0.0 || content.height <= 0.0 {
        return Vec::new();
    }

    let trim = boxes.trim;
    let bleed = boxes.bleed;
    let mut instructions = Vec::new();

    let top = boxes.margin_top();
    if top > 0.0 {
        let thickness = slice_thickness(kind, top, content.height);
        instructions.push(EdgeExtensionInstruction {
            side: EdgeSide::Top,
            source: Rect::new(content.x, content.y, content.width, thickness),
            dest: Rect::new(content.x, trim.y - top, content.width, top),
            kind,
        });
    }

    let bottom = boxes.margin_bottom();
    if bottom > 0.0 {
        let thickness = slice_thickness(kind, bottom, content.height);
        instructions.push(EdgeExtensionInstruction {
            side: EdgeSide::Bottom,
            source: Rect::new(
                content.x,
                content.bottom() - thickness,
                content.width,
                thickness,
            ),
            dest: Rect::new(content.x, trim.bottom(), content.width, bottom),
            kind,
        });
    }

    let left = boxes.margin_left();
    if left > 0.0 {
        let thickness = slice_thickness(kind, left, content.width);
        instructions.push(EdgeExtensionInstruction {
            side: EdgeSide::Left,
            source: Rect::new(content.x, content.y, thickness, content.height),
            dest: Rect::new(trim.x - left, bleed.y, left, bleed.height),
            kind,
        });
    }

    let right = boxes.margin_right();
    if right > 0.0 {
        let thickness = slice_thickness(kind, right, content.width);
        instructions.push(EdgeExtensionInstruction {
            side: EdgeSide::Right,
            source: Rect::new(
                content.right() - thickness,
                content.y,
                thickness,
                content.height,
            ),
            dest: Rect::new(trim.right(), bleed.y, right, bleed.height),
            kind,
        });
    }

    instructions
}

/// Mirror slices are as thick as the margin they fill, clamped to the
/// content extent; smear samples a thin edge line and stretches it.
fn slice_thickness(kind: EdgeKind, margin: f32, content_extent: f32) -> f32 {
    match kind {
        EdgeKind::Mirror => margin.min(content_extent),
        EdgeKind::Smear => SMEAR_EDGE_LINE_PT.min(content_extent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_boxes;
    use crate::types::{BleedSpec, Length, TrimSize};

    const EPS: f32 = 1e-3;

    fn boxes(top: f32, right: f32, bottom: f32, left: f32) -> PageBoxes {
        compute_boxes(
            &TrimSize::new(Length::inches(2.0), Length::inches(2.0)),
            &BleedSpec::new(
                Length::inches(top),
                Length::inches(right),
                Length::inches(bottom),
                Length::inches(left),
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_generator_none_emits_nothing() {
        let boxes = boxes(0.125, 0.125, 0.125, 0.125);
        let content = boxes.trim;
        assert!(synthesize_edges(&content, &boxes, BleedGenerator::None).is_empty());
    }

    #[test]
    fn test_zero_sides_skipped() {
        // Top-only bleed on a 2x2in trim: exactly one instruction
        let boxes = boxes(0.25, 0.0, 0.0, 0.0);
        let content = boxes.trim;
        let instructions = synthesize_edges(&content, &boxes, BleedGenerator::Mirror);

        assert_eq!(instructions.len(), 1);
        let top = &instructions[0];
        assert_eq!(top.side, EdgeSide::Top);
        assert!((top.dest.height - 18.0).abs() < EPS);
        assert!((top.dest.y - -18.0).abs() < EPS);
        // Slice drawn from just inside the top trim edge
        assert!((top.source.y - 0.0).abs() < EPS);
        assert!((top.source.height - 18.0).abs() < EPS);
    }

    #[test]
    fn test_emission_order_and_corner_coverage() {
        let boxes = boxes(0.125, 0.125, 0.125, 0.125);
        let content = boxes.trim;
        let instructions = synthesize_edges(&content, &boxes, BleedGenerator::Mirror);

        let sides: Vec<EdgeSide> = instructions.iter().map(|i| i.side).collect();
        assert_eq!(
            sides,
            vec![EdgeSide::Top, EdgeSide::Bottom, EdgeSide::Left, EdgeSide::Right]
        );

        // Left/right strips span the full bleed height, so the strips
        // applied last own the corner regions
        let left = &instructions[2];
        assert!((left.dest.y - boxes.bleed.y).abs() < EPS);
        assert!((left.dest.bottom() - boxes.bleed.bottom()).abs() < EPS);
        let top_left_corner = Rect::new(
            boxes.bleed.x,
            boxes.bleed.y,
            boxes.margin_left(),
            boxes.margin_top(),
        );
        assert!(left.dest.contains(&top_left_corner, EPS));
        let right = &instructions[3];
        let bottom_right_corner = Rect::new(
            boxes.trim.right(),
            boxes.trim.bottom(),
            boxes.margin_right(),
            boxes.margin_bottom(),
        );
        assert!(right.dest.contains(&bottom_right_corner, EPS));
    }

    #[test]
    fn test_mirror_seam_continuity() {
        let boxes = boxes(0.25, 0.0, 0.0, 0.0);
        let content = boxes.trim;
        let top = synthesize_edges(&content, &boxes, BleedGenerator::Mirror)[0];

        // The seam maps onto itself
        let (x, y) = top.map_point(10.0, 0.0);
        assert!((x - 10.0).abs() < EPS);
        assert!(y.abs() < EPS);
        // A point 5pt inside the trim lands 5pt outside, mirrored
        let (_, y) = top.map_point(10.0, 5.0);
        assert!((y - -5.0).abs() < EPS);
    }

    #[test]
    fn test_mirror_seam_continuity_right() {
        let boxes = boxes(0.0, 0.25, 0.0, 0.0);
        let content = boxes.trim;
        let right = synthesize_edges(&content, &boxes, BleedGenerator::Mirror)[0];
        assert_eq!(right.side, EdgeSide::Right);

        let seam = boxes.trim.right();
        let (x, _) = right.map_point(seam, 50.0);
        assert!((x - seam).abs() < EPS);
        let (x, _) = right.map_point(seam - 7.0, 50.0);
        assert!((x - (seam + 7.0)).abs() < EPS);
    }

    #[test]
    fn test_mirror_thickness_clamps_to_content() {
        // Margin deeper than the placed content itself
        let boxes = compute_boxes(
            &TrimSize::new(Length::points(100.0), Length::points(100.0)),
            &BleedSpec::uniform(Length::points(30.0)),
        )
        .unwrap();
        let content = Rect::new(40.0, 40.0, 20.0, 20.0);
        let instructions = synthesize_edges(&content, &boxes, BleedGenerator::Mirror);
        assert!(instructions.iter().all(|i| i.source.width <= 20.0 + EPS
            && i.source.height <= 20.0 + EPS));
    }

    #[test]
    fn test_smear_stretches_edge_line() {
        let boxes = boxes(0.25, 0.0, 0.0, 0.0);
        let content = boxes.trim;
        let top = synthesize_edges(&content, &boxes, BleedGenerator::Smear)[0];

        assert_eq!(top.kind, EdgeKind::Smear);
        assert!((top.source.height - SMEAR_EDGE_LINE_PT).abs() < EPS);

        // The thin line stretches across the whole margin, parallel axis
        // untouched
        let (sx, sy, _, _) = top.transform();
        assert!((sx - 1.0).abs() < EPS);
        assert!((sy - 18.0 / SMEAR_EDGE_LINE_PT).abs() < EPS);
        // Both ends of the line's thickness stay within the margin
        let (_, y0) = top.map_point(0.0, 0.0);
        let (_, y1) = top.map_point(0.0, SMEAR_EDGE_LINE_PT);
        assert!((y0.min(y1) - top.dest.y).abs() < EPS);
        assert!((y0.max(y1) - top.dest.bottom()).abs() < EPS);
    }

    #[test]
    fn test_content_outside_trim_is_clipped_first() {
        let boxes = boxes(0.125, 0.125, 0.125, 0.125);
        // Oversized content (fill overflow): slices come from the trimmed part
        let content = Rect::new(-20.0, -20.0, 200.0, 200.0);
        let instructions = synthesize_edges(&content, &boxes, BleedGenerator::Mirror);
        for instruction in &instructions {
            assert!(boxes.trim.contains(&instruction.source, EPS));
        }
    }
}

//! Fit resolution
//!
//! One resolver per fit mode. The scaling policy table: proportional
//! fit uses the smaller axis ratio, proportional fill the larger,
//! stretch scales each axis independently.

use super::types::{PageBoxes, Placement, Rect};
use crate::types::{Anchor, BleedError, ContentAsset, FitMode, Result};

/// Resolve the placement for `asset`, targeting the box the mode names.
pub fn solve(
    asset: &ContentAsset,
    boxes: &PageBoxes,
    mode: FitMode,
    anchor: Anchor,
) -> Result<Placement> {
    let target = if mode.targets_bleed() {
        boxes.bleed
    } else {
        boxes.trim
    };
    solve_into(asset, &target, mode, anchor)
}

/// Resolve the placement for `asset` into an explicit target box.
///
/// The plan builder uses this to force the TrimBox as the target while
/// a bleed generator is active: the margins are synthesized from the
/// trimmed content, never sourced.
pub fn solve_into(
    asset: &ContentAsset,
    target: &Rect,
    mode: FitMode,
    anchor: Anchor,
) -> Result<Placement> {
    if !asset.width_pt.is_finite()
        || !asset.height_pt.is_finite()
        || asset.width_pt <= 0.0
        || asset.height_pt <= 0.0
    {
        return Err(BleedError::InvalidAsset(format!(
            "content size {}x{} pt is not placeable",
            asset.width_pt, asset.height_pt
        )));
    }
    if target.width <= 0.0 || target.height <= 0.0 {
        return Err(BleedError::InvalidGeometry(format!(
            "degenerate target box {}x{} pt",
            target.width, target.height
        )));
    }

    Ok(match mode {
        FitMode::FitTrimProportional | FitMode::FitBleedProportional => {
            fit_proportional(asset, target, anchor)
        }
        FitMode::FillBleedProportional => fill_proportional(asset, target, anchor),
        FitMode::StretchTrim | FitMode::StretchBleed => stretch(asset, target),
    })
}

/// Uniform scale; content entirely inside the target, residual space
/// distributed by the anchor. No clip.
fn fit_proportional(asset: &ContentAsset, target: &Rect, anchor: Anchor) -> Placement {
    let scale = (target.width / asset.width_pt).min(target.height / asset.height_pt);
    anchored(asset, target, anchor, scale, None)
}

/// Uniform scale; content covers the target fully, the anchored
/// overflow is clipped to the target box.
fn fill_proportional(asset: &ContentAsset, target: &Rect, anchor: Anchor) -> Placement {
    let scale = (target.width / asset.width_pt).max(target.height / asset.height_pt);
    anchored(asset, target, anchor, scale, Some(*target))
}

/// Independent axis scales; exact fill, intentional distortion. No clip.
fn stretch(asset: &ContentAsset, target: &Rect) -> Placement {
    Placement {
        scale_x: target.width / asset.width_pt,
        scale_y: target.height / asset.height_pt,
        offset_x: target.x,
        offset_y: target.y,
        clip: None,
    }
}

fn anchored(
    asset: &ContentAsset,
    target: &Rect,
    anchor: Anchor,
    scale: f32,
    clip: Option<Rect>,
) -> Placement {
    let (ax, ay) = anchor.fractions();
    let residual_x = target.width - asset.width_pt * scale;
    let residual_y = target.height - asset.height_pt * scale;
    Placement {
        scale_x: scale,
        scale_y: scale,
        offset_x: target.x + residual_x * ax,
        offset_y: target.y + residual_y * ay,
        clip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_boxes;
    use crate::types::{BleedSpec, ContentKind, Length, TrimSize};

    const EPS: f32 = 1e-3;

    fn boxes_4x6_bleed_eighth() -> PageBoxes {
        compute_boxes(
            &TrimSize::new(Length::inches(4.0), Length::inches(6.0)),
            &BleedSpec::uniform(Length::inches(0.125)),
        )
        .unwrap()
    }

    fn asset(width_pt: f32, height_pt: f32) -> ContentAsset {
        ContentAsset {
            width_pt,
            height_pt,
            kind: ContentKind::VectorPage,
            page_index: 0,
        }
    }

    #[test]
    fn test_fit_trim_stays_inside_trim() {
        let boxes = boxes_4x6_bleed_eighth();
        // Wider aspect than the trim, so width limits the scale
        let asset = asset(600.0, 600.0);
        let placement = solve(&asset, &boxes, FitMode::FitTrimProportional, Anchor::Center).unwrap();

        assert!((placement.scale_x - 288.0 / 600.0).abs() < EPS);
        assert_eq!(placement.scale_x, placement.scale_y);
        assert!(placement.clip.is_none());
        assert!(boxes.trim.contains(&placement.content_rect(&asset), EPS));
        // Residual height splits evenly around the center
        assert!((placement.offset_y - (432.0 - 288.0) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_fit_bleed_targets_bleed_box() {
        let boxes = boxes_4x6_bleed_eighth();
        let asset = asset(306.0, 306.0);
        let placement =
            solve(&asset, &boxes, FitMode::FitBleedProportional, Anchor::Center).unwrap();

        assert!((placement.scale_x - 1.0).abs() < EPS);
        assert!(boxes.bleed.contains(&placement.content_rect(&asset), EPS));
        assert_eq!(placement.offset_x, boxes.bleed.x);
    }

    #[test]
    fn test_fill_bleed_covers_and_clips() {
        let boxes = boxes_4x6_bleed_eighth();
        let asset = asset(1200.0, 1800.0);
        let placement = solve(
            &asset,
            &boxes,
            FitMode::FillBleedProportional,
            Anchor::Center,
        )
        .unwrap();

        // Wider axis ratio wins: max(306/1200, 450/1800) = 0.255
        assert!((placement.scale_x - 0.255).abs() < EPS);
        assert_eq!(placement.clip, Some(boxes.bleed));

        // The pre-clip content covers the bleed box on both axes here
        let content = placement.content_rect(&asset);
        assert!(content.contains(&boxes.bleed, EPS));
        // Overflow is trimmed symmetrically for the center anchor
        assert!(((boxes.bleed.y - content.y) - (content.bottom() - boxes.bleed.bottom())).abs() < EPS);
    }

    #[test]
    fn test_fill_anchor_shifts_overflow() {
        let boxes = boxes_4x6_bleed_eighth();
        let asset = asset(1200.0, 1800.0);
        let placement = solve(&asset, &boxes, FitMode::FillBleedProportional, Anchor::Top).unwrap();

        // Top anchor pins the content's top edge to the target's
        let content = placement.content_rect(&asset);
        assert!((content.y - boxes.bleed.y).abs() < EPS);
    }

    #[test]
    fn test_stretch_scales_axes_independently() {
        let boxes = boxes_4x6_bleed_eighth();
        let asset = asset(100.0, 400.0);

        let trim = solve(&asset, &boxes, FitMode::StretchTrim, Anchor::Center).unwrap();
        assert!((trim.scale_x * asset.width_pt - boxes.trim.width).abs() < EPS);
        assert!((trim.scale_y * asset.height_pt - boxes.trim.height).abs() < EPS);
        assert!(trim.clip.is_none());
        assert_eq!((trim.offset_x, trim.offset_y), (0.0, 0.0));

        let bleed = solve(&asset, &boxes, FitMode::StretchBleed, Anchor::Center).unwrap();
        assert!((bleed.scale_x * asset.width_pt - boxes.bleed.width).abs() < EPS);
        assert!((bleed.scale_y * asset.height_pt - boxes.bleed.height).abs() < EPS);
        assert_eq!((bleed.offset_x, bleed.offset_y), (boxes.bleed.x, boxes.bleed.y));
    }

    #[test]
    fn test_zero_asset_rejected() {
        let boxes = boxes_4x6_bleed_eighth();
        let result = solve(
            &asset(0.0, 100.0),
            &boxes,
            FitMode::FitTrimProportional,
            Anchor::Center,
        );
        assert!(matches!(result, Err(BleedError::InvalidAsset(_))));
    }

    #[test]
    fn test_degenerate_target_rejected() {
        let result = solve_into(
            &asset(100.0, 100.0),
            &Rect::new(0.0, 0.0, 0.0, 100.0),
            FitMode::StretchTrim,
            Anchor::Center,
        );
        assert!(matches!(result, Err(BleedError::InvalidGeometry(_))));
    }

    #[test]
    fn test_corner_anchors() {
        let boxes = boxes_4x6_bleed_eighth();
        let asset = asset(100.0, 100.0);
        let placement =
            solve(&asset, &boxes, FitMode::FitTrimProportional, Anchor::TopLeft).unwrap();
        assert_eq!((placement.offset_x, placement.offset_y), (0.0, 0.0));

        let placement =
            solve(&asset, &boxes, FitMode::FitTrimProportional, Anchor::BottomRight).unwrap();
        let content = placement.content_rect(&asset);
        assert!((content.right() - 288.0).abs() < EPS);
        assert!((content.bottom() - 432.0).abs() < EPS);
    }
}

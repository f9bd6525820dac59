//! Page plan building
//!
//! Turns a job description plus one input into an ordered sequence of
//! immutable page plans for a rendering backend. Boxes are computed
//! once per job (all pages share the same trim and bleed); fit,
//! edge extension and crop marks are resolved per page. Identical
//! input always yields an identical plan sequence.

use crate::assets::AssetReader;
use crate::layout::{
    compute_boxes, solve, solve_into, synthesize_edges, EdgeExtensionInstruction, PageBoxes,
    Placement,
};
use crate::marks::{generate_crop_marks, CropMarkSpec};
use crate::options::{InputSpec, JobOptions};
use crate::types::{BleedError, ContentAsset, JobWarning, Result};

/// Everything a backend needs to produce one output page.
/// Constructed once, immutable, consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Index of the source page this plan draws from
    pub page_index: usize,
    pub asset: ContentAsset,
    pub boxes: PageBoxes,
    pub placement: Placement,
    pub edges: Vec<EdgeExtensionInstruction>,
    pub marks: Option<CropMarkSpec>,
}

/// A built plan sequence plus the non-fatal conditions met on the way
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub plans: Vec<PagePlan>,
    pub warnings: Vec<JobWarning>,
}

/// Result of resolving a page-range expression
#[derive(Debug, Clone, PartialEq)]
pub struct PageRange {
    /// Zero-based source page indices, in selection order, deduplicated
    pub indices: Vec<usize>,
    /// Whether the expression selected nothing and the first page was
    /// substituted
    pub fell_back: bool,
}

/// Resolve a 1-based page-range expression ("1-3,5", "all", "*")
/// against a source's page count.
///
/// Out-of-range ends clamp to the source; unparsable tokens and
/// reversed ranges contribute nothing. An expression that selects
/// nothing falls back to the first page rather than failing: a bad
/// range never yields zero pages.
pub fn parse_page_range(spec: &str, max_pages: usize) -> PageRange {
    if max_pages == 0 {
        return PageRange {
            indices: Vec::new(),
            fell_back: false,
        };
    }

    let spec = spec.trim().to_ascii_lowercase();
    if spec.is_empty() || spec == "all" || spec == "*" {
        return PageRange {
            indices: (0..max_pages).collect(),
            fell_back: false,
        };
    }

    let mut indices = Vec::new();
    let mut seen = vec![false; max_pages];
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => match (a.trim().parse::<usize>(), b.trim().parse::<usize>()) {
                (Ok(a), Ok(b)) => (a, b),
                _ => continue,
            },
            None => match token.parse::<usize>() {
                Ok(page) => (page, page),
                Err(_) => continue,
            },
        };
        for page in start.max(1)..=end.min(max_pages) {
            let index = page - 1;
            if !seen[index] {
                seen[index] = true;
                indices.push(index);
            }
        }
    }

    if indices.is_empty() {
        PageRange {
            indices: vec![0],
            fell_back: true,
        }
    } else {
        PageRange {
            indices,
            fell_back: false,
        }
    }
}

/// Build one plan per selected source page.
///
/// Geometry and fit failures abort the whole job; a bad page range
/// only produces a warning (the fallback policy above).
pub fn build_page_plans(
    options: &JobOptions,
    input: &InputSpec,
    reader: &dyn AssetReader,
) -> Result<PlanOutcome> {
    let boxes = compute_boxes(&options.trim, &options.bleed)?;

    let page_count = reader.page_count()?;
    if page_count == 0 {
        return Err(BleedError::InvalidAsset(format!(
            "{} has no pages",
            input.path.display()
        )));
    }

    let mut warnings = Vec::new();
    let range = parse_page_range(&input.pages, page_count);
    if range.fell_back {
        warnings.push(JobWarning::PageRangeFallback {
            spec: input.pages.clone(),
        });
    }

    let generator = options.bleed_generator;
    let mut plans = Vec::with_capacity(range.indices.len());
    for page_index in range.indices {
        let asset = reader.asset(page_index)?;

        // With an active generator the content is placed against the
        // TrimBox whatever the mode names; the margins are synthesized.
        let placement = if generator.is_active() {
            solve_into(&asset, &boxes.trim, options.fit_mode, options.anchor)?
        } else {
            solve(&asset, &boxes, options.fit_mode, options.anchor)?
        };

        let edges = synthesize_edges(&placement.content_rect(&asset), &boxes, generator);

        // Crop marks stay out of margins that edge extensions will paint
        let marks = if options.crop_marks && !generator.is_active() {
            generate_crop_marks(&boxes)
        } else {
            None
        };

        plans.push(PagePlan {
            page_index,
            asset,
            boxes,
            placement,
            edges,
            marks,
        });
    }

    Ok(PlanOutcome { plans, warnings })
}

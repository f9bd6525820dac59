//! Asset readers
//!
//! Probing of source content: page counts, intrinsic sizes, and the
//! source-space rectangle the backend cuts vector content from.

use crate::constants::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT, RASTER_POINTS_PER_PIXEL};
use crate::types::{BleedError, ContentAsset, ContentKind, PdfBoxKind, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;

/// Read-side collaborator of the page plan builder
pub trait AssetReader {
    fn page_count(&self) -> Result<usize>;
    /// Intrinsic description of one page's content
    fn asset(&self, page_index: usize) -> Result<ContentAsset>;
}

/// A rectangle in a source PDF's own coordinate space (origin
/// bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl SourceRect {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// PDF-backed asset reader
pub struct PdfAssetReader<'a> {
    document: &'a Document,
    page_ids: Vec<ObjectId>,
    pdf_box: PdfBoxKind,
}

impl<'a> PdfAssetReader<'a> {
    pub fn new(document: &'a Document, pdf_box: PdfBoxKind) -> Self {
        let page_ids = document.get_pages().into_values().collect();
        Self {
            document,
            page_ids,
            pdf_box,
        }
    }

    pub fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.page_ids.get(page_index).copied().ok_or_else(|| {
            BleedError::InvalidAsset(format!("page {} out of range", page_index + 1))
        })
    }

    /// The source rectangle content is cut from for one page
    pub fn source_rect(&self, page_index: usize) -> Result<SourceRect> {
        let page_id = self.page_id(page_index)?;
        pick_page_box(self.document, page_id, self.pdf_box)
    }
}

impl AssetReader for PdfAssetReader<'_> {
    fn page_count(&self) -> Result<usize> {
        Ok(self.page_ids.len())
    }

    fn asset(&self, page_index: usize) -> Result<ContentAsset> {
        let rect = self.source_rect(page_index)?;
        Ok(ContentAsset {
            width_pt: rect.width(),
            height_pt: rect.height(),
            kind: ContentKind::VectorPage,
            page_index,
        })
    }
}

/// Pick the source box of a page.
///
/// `Auto` prefers trim, then bleed, crop and media; an explicit choice
/// falls back to the MediaBox when the requested entry is absent or
/// degenerate. Pages with no usable box at all get US Letter.
pub fn pick_page_box(
    document: &Document,
    page_id: ObjectId,
    kind: PdfBoxKind,
) -> Result<SourceRect> {
    let page = document.get_dictionary(page_id)?;

    let candidates: &[&[u8]] = match kind {
        PdfBoxKind::Auto => &[b"TrimBox", b"BleedBox", b"CropBox", b"MediaBox"],
        PdfBoxKind::Trim => &[b"TrimBox", b"MediaBox"],
        PdfBoxKind::Bleed => &[b"BleedBox", b"MediaBox"],
        PdfBoxKind::Crop => &[b"CropBox", b"MediaBox"],
        PdfBoxKind::Media => &[b"MediaBox"],
    };
    for key in candidates {
        if let Some(rect) = box_entry(page, key) {
            return Ok(rect);
        }
    }

    Ok(SourceRect {
        x0: 0.0,
        y0: 0.0,
        x1: DEFAULT_PAGE_WIDTH_PT,
        y1: DEFAULT_PAGE_HEIGHT_PT,
    })
}

fn box_entry(page: &Dictionary, key: &[u8]) -> Option<SourceRect> {
    let arr = page.get(key).and_then(|obj| obj.as_array()).ok()?;
    if arr.len() != 4 {
        return None;
    }
    let mut vals = [0.0f32; 4];
    for (slot, obj) in vals.iter_mut().zip(arr) {
        *slot = extract_number(obj)?;
    }
    let rect = SourceRect {
        x0: vals[0].min(vals[2]),
        y0: vals[1].min(vals[3]),
        x1: vals[0].max(vals[2]),
        y1: vals[1].max(vals[3]),
    };
    if rect.width() > 0.0 && rect.height() > 0.0 {
        Some(rect)
    } else {
        None
    }
}

fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Raster-backed asset reader; pixels map to points 1:1
pub struct ImageAssetReader {
    width_px: u32,
    height_px: u32,
}

impl ImageAssetReader {
    /// Probe an image file's dimensions without decoding it
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let (width_px, height_px) = image::image_dimensions(path)?;
        Ok(Self {
            width_px,
            height_px,
        })
    }

    pub fn from_dimensions(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

impl AssetReader for ImageAssetReader {
    fn page_count(&self) -> Result<usize> {
        Ok(1)
    }

    fn asset(&self, page_index: usize) -> Result<ContentAsset> {
        if page_index != 0 {
            return Err(BleedError::InvalidAsset(format!(
                "raster images have a single page, requested {}",
                page_index + 1
            )));
        }
        Ok(ContentAsset {
            width_pt: self.width_px as f32 * RASTER_POINTS_PER_PIXEL,
            height_pt: self.height_px as f32 * RASTER_POINTS_PER_PIXEL,
            kind: ContentKind::RasterImage,
            page_index: 0,
        })
    }
}

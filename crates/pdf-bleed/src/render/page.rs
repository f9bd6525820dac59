//! lopdf rendering backend
//!
//! Writes bleed-aware output pages: the four page boxes, the placed
//! content (with its clip when the fit mode calls for one), the edge
//! extension strips, and crop marks.

use super::xobject::{create_form_xobject, create_image_xobject};
use super::RenderBackend;
use crate::assets::pick_page_box;
use crate::layout::{PageBoxes, Rect};
use crate::marks::CropMarkSpec;
use crate::plan::PagePlan;
use crate::types::{BleedError, PdfBoxKind, Result};
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Content a backend draws from
pub enum SourceContent {
    Pdf {
        document: Document,
        pdf_box: PdfBoxKind,
    },
    Raster {
        image: DynamicImage,
    },
}

/// Backend writing bleed-aware PDF pages with lopdf
pub struct LopdfBackend {
    source: SourceContent,
    source_page_ids: Vec<ObjectId>,
    output: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
    copy_cache: HashMap<ObjectId, ObjectId>,
}

impl LopdfBackend {
    pub fn new(source: SourceContent) -> Self {
        let source_page_ids = match &source {
            SourceContent::Pdf { document, .. } => document.get_pages().into_values().collect(),
            SourceContent::Raster { .. } => Vec::new(),
        };
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();
        Self {
            source,
            source_page_ids,
            output,
            pages_tree_id,
            page_refs: Vec::new(),
            copy_cache: HashMap::new(),
        }
    }

    /// Finish the document: pages tree plus catalog
    pub fn finish(mut self) -> Result<Document> {
        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));
        self.output.trailer.set("Root", catalog_id);

        Ok(self.output)
    }

    /// Build the XObject for a plan's content plus the matrix taking
    /// the XObject's own space onto the placed device rectangle
    fn content_xobject(&mut self, plan: &PagePlan) -> Result<(ObjectId, [f32; 6])> {
        let content = plan.placement.content_rect(&plan.asset);
        // Device origin of the content is its bottom-left corner
        let (dev_x, dev_y) = to_device(content.x, content.bottom(), &plan.boxes);

        match &self.source {
            SourceContent::Pdf { document, pdf_box } => {
                let page_id = *self.source_page_ids.get(plan.page_index).ok_or_else(|| {
                    BleedError::InvalidAsset(format!("page {} out of range", plan.page_index + 1))
                })?;
                let bbox = pick_page_box(document, page_id, *pdf_box)?;
                let xobject_id = create_form_xobject(
                    &mut self.output,
                    document,
                    page_id,
                    &bbox,
                    &mut self.copy_cache,
                )?;
                let sx = plan.placement.scale_x;
                let sy = plan.placement.scale_y;
                let matrix = [
                    sx,
                    0.0,
                    0.0,
                    sy,
                    dev_x - sx * bbox.x0,
                    dev_y - sy * bbox.y0,
                ];
                Ok((xobject_id, matrix))
            }
            SourceContent::Raster { image } => {
                let xobject_id = create_image_xobject(&mut self.output, image)?;
                // Image space is the unit square
                let matrix = [content.width, 0.0, 0.0, content.height, dev_x, dev_y];
                Ok((xobject_id, matrix))
            }
        }
    }

    fn push_page(&mut self, boxes: &PageBoxes, ops: String, resources: Dictionary) -> Result<()> {
        let trim_dev = device_rect(&boxes.trim, boxes);

        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), ops.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_tree_id));
        page_dict.set("MediaBox", rect_array(0.0, 0.0, boxes.media.width, boxes.media.height));
        page_dict.set("CropBox", rect_array(0.0, 0.0, boxes.crop.width, boxes.crop.height));
        page_dict.set("BleedBox", rect_array(0.0, 0.0, boxes.bleed.width, boxes.bleed.height));
        page_dict.set(
            "TrimBox",
            rect_array(trim_dev[0], trim_dev[1], trim_dev[2], trim_dev[3]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.output.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));
        Ok(())
    }
}

impl RenderBackend for LopdfBackend {
    fn reset_origin(&mut self) {
        // lopdf itself holds no cross-job origin state; dropping the
        // copy cache keeps one job's objects out of the next
        self.copy_cache.clear();
    }

    fn render_page(&mut self, plan: &PagePlan) -> Result<()> {
        let (xobject_id, matrix) = self.content_xobject(plan)?;

        let mut ops = String::new();

        // Base content placement
        ops.push_str("q\n");
        if let Some(clip) = &plan.placement.clip {
            ops.push_str(&clip_op(clip, &plan.boxes));
        }
        ops.push_str(&format!("{} cm /P0 Do\nQ\n", matrix_op(&matrix)));

        // Edge extensions, in emission order. Each one re-places the
        // same content through the instruction's page-local affine map
        // (re-expressed in device coordinates) and clips it to the
        // destination margin strip.
        for instruction in &plan.edges {
            let (sx, sy, tx, ty) = instruction.transform();
            let mirror = local_affine_to_device(sx, sy, tx, ty, &plan.boxes);
            ops.push_str("q\n");
            ops.push_str(&clip_op(&instruction.dest, &plan.boxes));
            ops.push_str(&format!(
                "{} cm {} cm /P0 Do\nQ\n",
                matrix_op(&mirror),
                matrix_op(&matrix)
            ));
        }

        if let Some(marks) = &plan.marks {
            ops.push_str(&mark_ops(marks, &plan.boxes));
        }

        let mut xobjects = Dictionary::new();
        xobjects.set("P0", Object::Reference(xobject_id));
        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        self.push_page(&plan.boxes, ops, resources)
    }

    fn render_error_page(&mut self, plan: &PagePlan, reason: &str) -> Result<()> {
        let boxes = &plan.boxes;
        let media_w = boxes.media.width;
        let media_h = boxes.media.height;

        let mut ops = String::new();
        ops.push_str("q\n0.5 w\n0.8 0.1 0.1 RG\n");
        ops.push_str(&format!("0 0 m {} {} l S\n", media_w, media_h));
        ops.push_str(&format!("0 {} m {} 0 l S\n", media_h, media_w));
        ops.push_str(&format!("1 1 {} {} re S\n", media_w - 2.0, media_h - 2.0));
        ops.push_str("Q\n");
        ops.push_str(&format!(
            "BT /F1 8 Tf 0.8 0.1 0.1 rg 6 {} Td ({}) Tj ET\n",
            media_h / 2.0,
            escape_pdf_text(reason)
        ));

        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        let font_id = self.output.add_object(font);

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));

        self.push_page(boxes, ops, resources)
    }
}

/// Convert a page-local point (origin at trim top-left, y down) to PDF
/// device space (origin at media bottom-left, y up). This is the only
/// place the two frames meet.
fn to_device(x: f32, y: f32, boxes: &PageBoxes) -> (f32, f32) {
    (x - boxes.bleed.x, boxes.bleed.bottom() - y)
}

/// Convert a page-local rectangle to device-space [x0, y0, x1, y1]
fn rect_array(x0: f32, y0: f32, x1: f32, y1: f32) -> Object {
    Object::Array(vec![
        Object::Real(x0),
        Object::Real(y0),
        Object::Real(x1),
        Object::Real(y1),
    ])
}

fn device_rect(rect: &Rect, boxes: &PageBoxes) -> [f32; 4] {
    let (x0, y1) = to_device(rect.x, rect.y, boxes);
    let (x1, y0) = to_device(rect.right(), rect.bottom(), boxes);
    [x0, y0, x1, y1]
}

/// Re-express a page-local affine map (scale + translate) in device
/// coordinates. Scales carry over unchanged; only the translation
/// shifts with the frame.
fn local_affine_to_device(sx: f32, sy: f32, tx: f32, ty: f32, boxes: &PageBoxes) -> [f32; 6] {
    let shift_x = -boxes.bleed.x;
    let flip_y = boxes.bleed.bottom();
    [
        sx,
        0.0,
        0.0,
        sy,
        tx + shift_x * (1.0 - sx),
        flip_y * (1.0 - sy) - ty,
    ]
}

fn matrix_op(m: &[f32; 6]) -> String {
    format!("{} {} {} {} {} {}", m[0], m[1], m[2], m[3], m[4], m[5])
}

fn clip_op(rect: &Rect, boxes: &PageBoxes) -> String {
    let [x0, y0, x1, y1] = device_rect(rect, boxes);
    format!("{} {} {} {} re W n\n", x0, y0, x1 - x0, y1 - y0)
}

fn mark_ops(marks: &CropMarkSpec, boxes: &PageBoxes) -> String {
    let mut ops = String::from("q\n0 0 0 RG\n");
    ops.push_str(&format!("{} w\n", marks.line_width));
    for segment in &marks.segments {
        let (x0, y0) = to_device(segment.x0, segment.y0, boxes);
        let (x1, y1) = to_device(segment.x1, segment.y1, boxes);
        ops.push_str(&format!("{} {} m {} {} l S\n", x0, y0, x1, y1));
    }
    ops.push_str("Q\n");
    ops
}

/// Escape characters PDF string literals treat specially; non-ASCII
/// and control bytes are dropped
fn escape_pdf_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\\' => escaped.push_str("\\\\"),
            c if c.is_ascii() && !c.is_ascii_control() => escaped.push(c),
            _ => {}
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_boxes;
    use crate::types::{BleedSpec, Length, TrimSize};

    const EPS: f32 = 1e-3;

    fn boxes_4x6_bleed_eighth() -> PageBoxes {
        compute_boxes(
            &TrimSize::new(Length::inches(4.0), Length::inches(6.0)),
            &BleedSpec::uniform(Length::inches(0.125)),
        )
        .unwrap()
    }

    #[test]
    fn test_to_device_places_trim_inside_media() {
        let boxes = boxes_4x6_bleed_eighth();

        // Trim top-left lands 9pt in from the media's left and top
        let (x, y) = to_device(0.0, 0.0, &boxes);
        assert!((x - 9.0).abs() < EPS);
        assert!((y - 441.0).abs() < EPS);

        let trim = device_rect(&boxes.trim, &boxes);
        assert_eq!(trim, [9.0, 9.0, 297.0, 441.0]);

        let media = device_rect(&boxes.media, &boxes);
        assert_eq!(media, [0.0, 0.0, 306.0, 450.0]);
    }

    #[test]
    fn test_local_affine_round_trips_through_device() {
        let boxes = boxes_4x6_bleed_eighth();
        // Mirror about the trim's top edge: y' = -y in page-local terms
        let m = local_affine_to_device(1.0, -1.0, 0.0, 0.0, &boxes);

        // The trim's top edge is fixed under the mirror
        let (dev_x, dev_y) = to_device(50.0, 0.0, &boxes);
        let (mx, my) = (m[0] * dev_x + m[4], m[3] * dev_y + m[5]);
        assert!((mx - dev_x).abs() < EPS);
        assert!((my - dev_y).abs() < EPS);

        // A point 5pt below the edge maps 5pt above it
        let (dev_x, dev_y) = to_device(50.0, 5.0, &boxes);
        let (expect_x, expect_y) = to_device(50.0, -5.0, &boxes);
        let (mx, my) = (m[0] * dev_x + m[4], m[3] * dev_y + m[5]);
        assert!((mx - expect_x).abs() < EPS);
        assert!((my - expect_y).abs() < EPS);
    }

    #[test]
    fn test_escape_pdf_text() {
        assert_eq!(escape_pdf_text("page (2) a\\b"), "page \\(2\\) a\\\\b");
        assert_eq!(escape_pdf_text("ok\n"), "ok");
    }
}

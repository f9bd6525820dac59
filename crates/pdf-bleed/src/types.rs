use crate::constants::{POINTS_PER_INCH, POINTS_PER_MM};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BleedError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Invalid asset: {0}")]
    InvalidAsset(String),
    #[error("Input not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BleedError>;

/// Non-fatal conditions reported alongside a completed job
#[derive(Debug, Clone, PartialEq)]
pub enum JobWarning {
    /// The page selection matched nothing usable; the first page was substituted
    PageRangeFallback { spec: String },
    /// The backend could not place content for one page; its output
    /// carries an error marker instead
    PlacementFailure { page_index: usize, reason: String },
}

impl std::fmt::Display for JobWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobWarning::PageRangeFallback { spec } => {
                write!(f, "page range {:?} selected nothing, using page 1", spec)
            }
            JobWarning::PlacementFailure { page_index, reason } => {
                write!(f, "page {} could not be placed: {}", page_index + 1, reason)
            }
        }
    }
}

/// Length units accepted in job descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Inch,
    Millimeter,
    Point,
}

impl Unit {
    /// Conversion factor to PDF points
    pub fn factor(self) -> f32 {
        match self {
            Unit::Inch => POINTS_PER_INCH,
            Unit::Millimeter => POINTS_PER_MM,
            Unit::Point => 1.0,
        }
    }

    /// Parse a unit tag; unknown or empty tags fall back to inches
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Unit::Millimeter,
            "pt" | "pts" | "point" | "points" => Unit::Point,
            _ => Unit::Inch,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Inch => "in",
            Unit::Millimeter => "mm",
            Unit::Point => "pt",
        }
    }
}

/// A scalar with a unit tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: Unit,
}

impl Length {
    pub fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn inches(value: f32) -> Self {
        Self::new(value, Unit::Inch)
    }

    pub fn millimeters(value: f32) -> Self {
        Self::new(value, Unit::Millimeter)
    }

    pub fn points(value: f32) -> Self {
        Self::new(value, Unit::Point)
    }

    /// Convert to PDF points; non-finite values are rejected
    pub fn to_points(self) -> Result<f32> {
        if !self.value.is_finite() {
            return Err(BleedError::InvalidGeometry(format!(
                "non-finite length: {}",
                self.value
            )));
        }
        Ok(self.value * self.unit.factor())
    }
}

/// The final, physically cut page size. Both dimensions must be
/// strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimSize {
    pub width: Length,
    pub height: Length,
}

impl TrimSize {
    pub fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }

    pub fn width_pt(&self) -> Result<f32> {
        positive_points(self.width, "trim width")
    }

    pub fn height_pt(&self) -> Result<f32> {
        positive_points(self.height, "trim height")
    }
}

fn positive_points(length: Length, what: &str) -> Result<f32> {
    let points = length.to_points()?;
    if points <= 0.0 {
        return Err(BleedError::InvalidGeometry(format!(
            "{} must be positive, got {} {}",
            what,
            length.value,
            length.unit.label()
        )));
    }
    Ok(points)
}

/// Extra margin beyond the trim on each side. Sides are independent;
/// asymmetric bleed is legal and negative values clamp to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BleedSpec {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl BleedSpec {
    pub fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(length: Length) -> Self {
        Self::new(length, length, length, length)
    }

    pub fn zero() -> Self {
        Self::uniform(Length::points(0.0))
    }

    pub fn top_pt(&self) -> Result<f32> {
        Ok(self.top.to_points()?.max(0.0))
    }

    pub fn right_pt(&self) -> Result<f32> {
        Ok(self.right.to_points()?.max(0.0))
    }

    pub fn bottom_pt(&self) -> Result<f32> {
        Ok(self.bottom.to_points()?.max(0.0))
    }

    pub fn left_pt(&self) -> Result<f32> {
        Ok(self.left.to_points()?.max(0.0))
    }
}

impl Default for BleedSpec {
    fn default() -> Self {
        Self::zero()
    }
}

/// Policy for mapping content dimensions into a target page box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Uniform scale, content entirely inside the TrimBox
    #[default]
    FitTrimProportional,
    /// Uniform scale, content entirely inside the BleedBox
    FitBleedProportional,
    /// Uniform scale, content covers the BleedBox; overflow is clipped
    FillBleedProportional,
    /// Independent axis scales, exact fill of the TrimBox
    StretchTrim,
    /// Independent axis scales, exact fill of the BleedBox
    StretchBleed,
}

impl FitMode {
    /// Whether the mode's named target is the BleedBox (TrimBox otherwise)
    pub fn targets_bleed(self) -> bool {
        matches!(
            self,
            FitMode::FitBleedProportional | FitMode::FillBleedProportional | FitMode::StretchBleed
        )
    }
}

/// Synthetic bleed generation technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BleedGenerator {
    #[default]
    None,
    /// Reflect an edge slice of the trimmed content into each margin
    Mirror,
    /// Stretch the edge line of the trimmed content across each margin
    Smear,
}

impl BleedGenerator {
    pub fn is_active(self) -> bool {
        !matches!(self, BleedGenerator::None)
    }
}

/// Alignment of content within its target box when residual space remains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Fractional position of the content within the residual space,
    /// in the page frame (origin top-left, y down)
    pub fn fractions(self) -> (f32, f32) {
        match self {
            Anchor::Center => (0.5, 0.5),
            Anchor::Top => (0.5, 0.0),
            Anchor::Bottom => (0.5, 1.0),
            Anchor::Left => (0.0, 0.5),
            Anchor::Right => (1.0, 0.5),
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }
}

/// What kind of content an asset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    VectorPage,
    RasterImage,
}

/// Intrinsic description of one piece of placeable content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentAsset {
    pub width_pt: f32,
    pub height_pt: f32,
    pub kind: ContentKind,
    /// Page index into a multi-page vector source (0 for rasters)
    pub page_index: usize,
}

/// Which page box of a source PDF supplies the content region.
/// `Auto` prefers trim, then bleed, crop and media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfBoxKind {
    #[default]
    Auto,
    Trim,
    Bleed,
    Crop,
    Media,
}

//! Shared constants for bleed page composition
//!
//! This module centralizes unit factors and mark/slice metrics used
//! throughout the composition process.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch (the PDF user-space unit)
pub const POINTS_PER_INCH: f32 = 72.0;

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = POINTS_PER_INCH / MM_PER_INCH; // ≈ 2.83465

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

// =============================================================================
// Crop Marks
// =============================================================================

/// Line width for crop marks (points)
pub const CROP_MARK_WIDTH: f32 = 0.25;

/// Length of crop marks (points)
pub const CROP_MARK_LENGTH: f32 = 12.0;

/// Gap between the trim edge and the start of a crop mark (points)
pub const CROP_MARK_GAP: f32 = 3.0;

// =============================================================================
// Edge Extension
// =============================================================================

/// Thickness of the edge line the smear generator samples (points)
pub const SMEAR_EDGE_LINE_PT: f32 = 1.0;

// =============================================================================
// Raster Assets
// =============================================================================

/// Raster pixels map to points 1:1 (a 72 dpi assumption)
pub const RASTER_POINTS_PER_PIXEL: f32 = 1.0;

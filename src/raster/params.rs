//! Parameter types for rasterization and page layout.
//!
//! These structs describe *what* to produce, not *how*. They sit between the
//! export pipeline (which decides what the page looks like) and the
//! [`Rasterizer`](super::Rasterizer) / artifact capabilities (which do the
//! pixel and file work), so either side can be swapped for a mock.
//!
//! ## Types
//!
//! - [`RasterOptions`]: container width, pixel ratio, background, optional fixed height.
//! - [`PageSize`]: A4 or US Letter, in millimetres.
//! - [`Orientation`]: portrait or landscape.
//! - [`Unit`]: the coordinate unit of a paginated artifact.

use crate::config::ExportConfig;
use serde::{Deserialize, Serialize};

/// Instructions for one rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Container width in CSS pixels.
    pub width: u32,
    /// Device pixel ratio; the image is `width * scale` pixels wide.
    pub scale: f64,
    /// CSS color painted behind the content.
    pub background: String,
    /// Fixed height in CSS pixels. `None` captures the full content height.
    pub height: Option<u32>,
}

impl RasterOptions {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            width: config.width,
            scale: config.scale,
            background: config.background.clone(),
            height: None,
        }
    }

    /// Expected pixel width of the produced image.
    pub fn pixel_width(&self) -> u32 {
        (f64::from(self.width) * self.scale).round() as u32
    }
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    /// Portrait `(width, height)` in millimetres.
    pub fn millimetres(self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::Letter => (215.9, 279.4),
        }
    }

    /// Page `(width, height)` for `orientation`, expressed in `unit`.
    pub fn dimensions(self, orientation: Orientation, unit: Unit) -> (f64, f64) {
        let (w, h) = self.millimetres();
        let (w, h) = match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        (unit.from_mm(w), unit.from_mm(h))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Coordinate unit of an artifact page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Mm,
    /// PostScript points, 1/72 inch.
    Pt,
}

impl Unit {
    const PT_PER_MM: f64 = 72.0 / 25.4;

    pub fn from_mm(self, mm: f64) -> f64 {
        match self {
            Self::Mm => mm,
            Self::Pt => mm * Self::PT_PER_MM,
        }
    }

    pub fn to_pt(self, value: f64) -> f64 {
        match self {
            Self::Mm => value * Self::PT_PER_MM,
            Self::Pt => value,
        }
    }
}

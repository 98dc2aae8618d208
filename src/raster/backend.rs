//! Rasterization capability trait and shared types.
//!
//! The [`Rasterizer`] trait turns a staged [`OffscreenContainer`] into a PNG.
//! The export pipeline only ever talks to this trait, so it is identical with
//! a real browser, a mock, or nothing at all.
//!
//! | Implementation | When |
//! |---|---|
//! | `ChromeRasterizer` | `chrome` feature, headless Chrome/Chromium on the host |
//! | [`UnavailableRasterizer`] | no rasterizer compiled in or found |

use super::offscreen::OffscreenContainer;
use super::params::RasterOptions;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("rasterizer unavailable: {0}")]
    Unavailable(String),
    #[error("rasterization failed: {0}")]
    Failed(String),
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
}

/// A rasterized container: PNG bytes plus their pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RasterImage {
    /// Wrap PNG bytes, reading the dimensions from the header.
    pub fn from_png(png: Vec<u8>) -> Result<Self, RasterError> {
        let (width, height) = image::ImageReader::with_format(
            Cursor::new(png.as_slice()),
            image::ImageFormat::Png,
        )
        .into_dimensions()?;
        Ok(Self { png, width, height })
    }

    /// A flat single-color image. Used by the CLI's `--blank` export and tests.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, RasterError> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(Self { png, width, height })
    }
}

/// Capability that rasterizes a staged container to an image.
pub trait Rasterizer {
    /// Short name for logs and `check` output.
    fn name(&self) -> &'static str;

    /// Whether the capability can run at all on this host.
    fn is_available(&self) -> bool;

    /// Rasterize the container at `options.width` CSS pixels and
    /// `options.scale` device pixels per CSS pixel.
    fn rasterize(
        &self,
        container: &OffscreenContainer,
        options: &RasterOptions,
    ) -> Result<RasterImage, RasterError>;
}

/// Stand-in when no rasterizer is compiled in. Always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRasterizer;

impl Rasterizer for UnavailableRasterizer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn rasterize(
        &self,
        _container: &OffscreenContainer,
        _options: &RasterOptions,
    ) -> Result<RasterImage, RasterError> {
        Err(RasterError::Unavailable(
            "built without the `chrome` feature".to_string(),
        ))
    }
}

/// Rasterizer that paints every container as a blank page of the requested
/// width. Lets the export pipeline run end to end without a browser.
#[derive(Debug, Clone)]
pub struct BlankRasterizer {
    pub height: u32,
}

impl Default for BlankRasterizer {
    fn default() -> Self {
        Self { height: 1131 }
    }
}

impl Rasterizer for BlankRasterizer {
    fn name(&self) -> &'static str {
        "blank"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn rasterize(
        &self,
        _container: &OffscreenContainer,
        options: &RasterOptions,
    ) -> Result<RasterImage, RasterError> {
        let height = options.height.unwrap_or(self.height);
        let height = (f64::from(height) * options.scale).round() as u32;
        RasterImage::solid(options.pixel_width(), height, [255, 255, 255])
    }
}

//! Rasterization: turning the rendered resume into pixels.
//!
//! | Step | Where |
//! |---|---|
//! | **Stage** page to a temp file | [`OffscreenContainer`] |
//! | **Rasterize** to PNG | [`Rasterizer`] (`ChromeRasterizer` with the `chrome` feature) |
//! | **Fit** onto a page | [`fit_to_page`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for page-fit math (unit testable)
//! - **Parameters**: Raster options, page sizes, orientation, units
//! - **Backend**: [`Rasterizer`] trait + stand-ins
//! - **Offscreen**: the staged page and its cleanup

pub mod backend;
mod calculations;
#[cfg(feature = "chrome")]
mod chrome;
mod offscreen;
mod params;

pub use backend::{BlankRasterizer, RasterError, RasterImage, Rasterizer, UnavailableRasterizer};
pub use calculations::{Placement, fit_to_page};
#[cfg(feature = "chrome")]
pub use chrome::ChromeRasterizer;
pub use offscreen::OffscreenContainer;
pub use params::{Orientation, PageSize, RasterOptions, Unit};

/// The best rasterizer this build can offer.
pub fn default_rasterizer() -> Box<dyn Rasterizer> {
    #[cfg(feature = "chrome")]
    {
        Box::new(ChromeRasterizer::new())
    }
    #[cfg(not(feature = "chrome"))]
    {
        Box::new(UnavailableRasterizer)
    }
}

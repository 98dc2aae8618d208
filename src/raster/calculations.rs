//! Pure page-fit math.
//!
//! All functions here are pure and testable without any I/O or images.

/// Where an image lands on a page, in page units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Page units per image pixel.
    pub ratio: f64,
}

/// Fit an image onto a page preserving its aspect ratio.
///
/// The ratio is `min(page_w / img_w, page_h / img_h)`. The image is centred
/// horizontally and placed `top_margin` below the top edge. The margin is not
/// subtracted from the available height, so a page-tall image runs past the
/// bottom edge by the margin; pagination is left to the viewer.
///
/// # Arguments
/// * `image` - Image dimensions in pixels `(width, height)`
/// * `page` - Page dimensions in page units `(width, height)`
/// * `top_margin` - Offset from the top edge in page units
///
/// # Examples
/// ```
/// # use portfolio_builder::raster::fit_to_page;
/// // 1600x2000 image on A4 (mm): width-bound, ratio 210/1600
/// let p = fit_to_page((1600, 2000), (210.0, 297.0), 10.0);
/// assert_eq!(p.width, 210.0);
/// assert_eq!(p.x, 0.0);
/// ```
pub fn fit_to_page(image: (u32, u32), page: (f64, f64), top_margin: f64) -> Placement {
    let (img_w, img_h) = (f64::from(image.0.max(1)), f64::from(image.1.max(1)));
    let (page_w, page_h) = page;

    let ratio = (page_w / img_w).min(page_h / img_h);
    let width = img_w * ratio;
    let height = img_h * ratio;

    Placement {
        x: (page_w - width) / 2.0,
        y: top_margin,
        width,
        height,
        ratio,
    }
}

//! Headless Chrome rasterizer.
//!
//! Loads the staged page in a fresh tab, measures the export container, and
//! captures a PNG clipped to it at the requested pixel ratio. Chrome is
//! launched lazily on first use and reused for later exports.

use super::backend::{RasterError, RasterImage, Rasterizer};
use super::offscreen::OffscreenContainer;
use super::params::RasterOptions;
use crate::hooks;
use headless_chrome::protocol::cdp::Page::{CaptureScreenshotFormatOption, Viewport};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

#[derive(Default)]
pub struct ChromeRasterizer {
    browser: OnceLock<Browser>,
}

impl ChromeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn browser(&self, width: u32) -> Result<&Browser, RasterError> {
        if let Some(browser) = self.browser.get() {
            return Ok(browser);
        }
        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some((width, 1200)),
            ..Default::default()
        })
        .map_err(|e| RasterError::Unavailable(e.to_string()))?;
        Ok(self.browser.get_or_init(|| browser))
    }
}

impl Rasterizer for ChromeRasterizer {
    fn name(&self) -> &'static str {
        "chrome"
    }

    fn is_available(&self) -> bool {
        headless_chrome::browser::default_executable().is_ok()
    }

    fn rasterize(
        &self,
        container: &OffscreenContainer,
        options: &RasterOptions,
    ) -> Result<RasterImage, RasterError> {
        let browser = self.browser(options.width)?;
        let selector = format!(".{}", hooks::EXPORT_CONTAINER);
        let tab = OpenTab(browser.new_tab().map_err(failed)?);
        tab.navigate_to(&container.url())
            .map_err(failed)?
            .wait_until_navigated()
            .map_err(failed)?;
        tab.wait_for_element(&selector).map_err(failed)?;

        let script = format!(
            r#"(function() {{
                const el = document.querySelector('{selector}');
                document.body.style.background = '{background}';
                const rect = el.getBoundingClientRect();
                return JSON.stringify({{ x: rect.x, y: rect.y, height: el.scrollHeight }});
            }})()"#,
            background = options.background.replace('\'', ""),
        );
        let value = tab
            .evaluate(&script, false)
            .map_err(failed)?
            .value
            .ok_or_else(|| RasterError::Failed("container could not be measured".to_string()))?;
        let bounds: serde_json::Value = serde_json::from_str(
            value
                .as_str()
                .ok_or_else(|| RasterError::Failed("invalid container bounds".to_string()))?,
        )
        .map_err(|e| RasterError::Failed(e.to_string()))?;

        let height = match options.height {
            Some(h) => f64::from(h),
            None => bounds["height"].as_f64().unwrap_or(0.0),
        };
        tracing::debug!(width = options.width, height, scale = options.scale, "capturing container");

        let png = tab
            .capture_screenshot(
                CaptureScreenshotFormatOption::Png,
                None,
                Some(Viewport {
                    x: bounds["x"].as_f64().unwrap_or(0.0),
                    y: bounds["y"].as_f64().unwrap_or(0.0),
                    width: f64::from(options.width),
                    height,
                    scale: options.scale,
                }),
                true,
            )
            .map_err(failed)?;

        RasterImage::from_png(png)
    }
}

/// Tab closed when dropped, so the shared browser does not collect tabs from
/// failed captures.
struct OpenTab(Arc<Tab>);

impl Deref for OpenTab {
    type Target = Tab;

    fn deref(&self) -> &Tab {
        &self.0
    }
}

impl Drop for OpenTab {
    fn drop(&mut self) {
        if let Err(e) = self.0.close(true) {
            tracing::warn!(error = %e, "failed to close capture tab");
        }
    }
}

fn failed(e: impl std::fmt::Display) -> RasterError {
    RasterError::Failed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn open_tabs(browser: &Browser) -> usize {
        browser.get_tabs().lock().map(|tabs| tabs.len()).unwrap_or(0)
    }

    #[test]
    #[ignore]
    fn failed_capture_closes_its_tab() {
        let rasterizer = ChromeRasterizer::new();
        let options = RasterOptions::default();
        let before = open_tabs(rasterizer.browser(options.width).unwrap());

        // No export container, so the capture never finds its element.
        let container = OffscreenContainer::stage("<p>nothing here</p>").unwrap();
        assert!(rasterizer.rasterize(&container, &options).is_err());

        let browser = rasterizer.browser.get().unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while open_tabs(browser) > before && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(100));
        }
        assert_eq!(open_tabs(browser), before);
    }
}

//! Offscreen staging of the page handed to a rasterizer.
//!
//! The page is written to a temporary `.html` file so an out-of-process
//! renderer can load it by URL. The file lives exactly as long as the
//! [`OffscreenContainer`]: dropping the container removes it, whichever way
//! the export ends.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub struct OffscreenContainer {
    file: NamedTempFile,
    html: String,
}

impl OffscreenContainer {
    /// Write `html` to a fresh temporary file.
    pub fn stage(html: impl Into<String>) -> std::io::Result<Self> {
        let html = html.into();
        let mut file = tempfile::Builder::new()
            .prefix("portfolio-export-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), bytes = html.len(), "staged offscreen page");
        Ok(Self { file, html })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// `file://` URL of the staged page.
    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl std::fmt::Debug for OffscreenContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffscreenContainer")
            .field("path", &self.path())
            .field("bytes", &self.html.len())
            .finish()
    }
}

impl Drop for OffscreenContainer {
    fn drop(&mut self) {
        // NamedTempFile unlinks on its own drop, which runs right after this.
        tracing::debug!(path = %self.file.path().display(), "removing offscreen page");
    }
}

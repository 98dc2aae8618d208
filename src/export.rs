//! Export pipeline: document → offscreen page → raster image → PDF on disk.
//!
//! ```text
//! precondition ─▶ guard ─▶ stage ─▶ rasterize ─▶ fit ─▶ embed ─▶ save
//!   (no side          (in-flight      (offscreen       (page-fit     (atomic
//!    effect)           flag)           container)       math)         persist)
//! ```
//!
//! Progress is reported as a fixed sequence of [`ExportStage`]s over an
//! optional `mpsc` channel. The stages bracket the real work; the percentages
//! are milestones, not measurements.
//!
//! The pipeline talks to its two capabilities through the [`Rasterizer`] and
//! [`ArtifactFactory`] traits only, so tests run it end to end with mocks.

use crate::artifact::{ArtifactError, ArtifactFactory};
use crate::config::BuilderConfig;
use crate::document::Document;
use crate::naming;
use crate::raster::{
    OffscreenContainer, Placement, RasterError, RasterOptions, Rasterizer, Unit, fit_to_page,
};
use crate::render;
use crate::theme::{Palette, Theme};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("name and email are required")]
    MissingIdentity,
    #[error("an export is already running")]
    AlreadyRunning,
    #[error("rasterizer unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),
    #[error("document creation failed: {0}")]
    Artifact(#[from] ArtifactError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Notification text for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingIdentity => {
                "Please fill in at least your name and email before generating PDF"
            }
            Self::AlreadyRunning => "A PDF is already being generated",
            _ => "PDF generation failed. Please try again.",
        }
    }
}

// ============================================================================
// Progress
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Initializing,
    Preparing,
    Rasterizing,
    Composing,
    Finalizing,
    Done,
}

impl ExportStage {
    pub const ALL: [ExportStage; 6] = [
        Self::Initializing,
        Self::Preparing,
        Self::Rasterizing,
        Self::Composing,
        Self::Finalizing,
        Self::Done,
    ];

    pub fn percent(self) -> u8 {
        match self {
            Self::Initializing => 10,
            Self::Preparing => 30,
            Self::Rasterizing => 60,
            Self::Composing => 80,
            Self::Finalizing => 95,
            Self::Done => 100,
        }
    }

    pub fn status(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing PDF generation...",
            Self::Preparing => "Preparing resume for PDF...",
            Self::Rasterizing => "Converting to high-quality image...",
            Self::Composing => "Creating PDF document...",
            Self::Finalizing => "Finalizing PDF...",
            Self::Done => "PDF generated successfully!",
        }
    }
}

/// Events sent while an export runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Progress(ExportStage),
    /// Raster image size in pixels, sent once rasterization returns.
    Rasterized { width: u32, height: u32 },
    Saved { path: PathBuf },
    Failed { error: String },
}

fn emit(events: Option<&Sender<ExportEvent>>, event: ExportEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        tx.send(event).ok();
    }
}

// ============================================================================
// Overlap guard
// ============================================================================

/// Shared in-flight flag. At most one [`InFlight`] token exists at a time.
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    running: Arc<AtomicBool>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the flag, or `None` if an export already holds it.
    pub fn try_acquire(&self) -> Option<InFlight> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                running: Arc::clone(&self.running),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped, on every exit path.
#[derive(Debug)]
pub struct InFlight {
    running: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// What to export and where.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub doc: &'a Document,
    pub theme: Theme,
    pub palette: Palette,
    pub output_dir: &'a Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub file_name: String,
    /// Raster size in pixels.
    pub image: (u32, u32),
    /// Where the image landed on the page, in page units.
    pub placement: Placement,
}

/// Run one export.
///
/// Fails with [`ExportError::MissingIdentity`] before touching anything when
/// name or email is blank, and with [`ExportError::AlreadyRunning`] while
/// another export holds `guard`. The offscreen container is removed on every
/// path, and no file is left at the target when a later step fails.
pub fn run_export(
    rasterizer: &dyn Rasterizer,
    artifacts: &dyn ArtifactFactory,
    guard: &ExportGuard,
    request: &ExportRequest<'_>,
    config: &BuilderConfig,
    events: Option<&Sender<ExportEvent>>,
) -> Result<ExportOutcome, ExportError> {
    if !request.doc.has_identity() {
        return Err(ExportError::MissingIdentity);
    }
    let _in_flight = guard.try_acquire().ok_or(ExportError::AlreadyRunning)?;

    let result = export_inner(rasterizer, artifacts, request, config, events);
    match &result {
        Ok(outcome) => {
            tracing::info!(
                path = %outcome.path.display(),
                rasterizer = rasterizer.name(),
                artifact = artifacts.name(),
                "export saved"
            );
            emit(
                events,
                ExportEvent::Saved {
                    path: outcome.path.clone(),
                },
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "export failed");
            emit(
                events,
                ExportEvent::Failed {
                    error: e.to_string(),
                },
            );
        }
    }
    result
}

fn export_inner(
    rasterizer: &dyn Rasterizer,
    artifacts: &dyn ArtifactFactory,
    request: &ExportRequest<'_>,
    config: &BuilderConfig,
    events: Option<&Sender<ExportEvent>>,
) -> Result<ExportOutcome, ExportError> {
    let export = &config.export;

    emit(events, ExportEvent::Progress(ExportStage::Initializing));
    if !rasterizer.is_available() {
        return Err(ExportError::CapabilityUnavailable(
            rasterizer.name().to_string(),
        ));
    }

    emit(events, ExportEvent::Progress(ExportStage::Preparing));
    let css = render::page_css(config);
    let page = render::export_page(request.doc, request.theme, request.palette, export, &css);
    let container = OffscreenContainer::stage(page.into_string())?;
    tracing::debug!(path = %container.path().display(), "staged export page");

    emit(events, ExportEvent::Progress(ExportStage::Rasterizing));
    let options = RasterOptions::from_config(export);
    let image = rasterizer.rasterize(&container, &options);
    drop(container);
    let image = image?;
    emit(
        events,
        ExportEvent::Rasterized {
            width: image.width,
            height: image.height,
        },
    );

    emit(events, ExportEvent::Progress(ExportStage::Composing));
    let mut artifact = artifacts.new_document(export.orientation, Unit::Mm, export.page_size)?;
    let placement = fit_to_page(
        (image.width, image.height),
        artifact.page_dimensions(),
        export.top_margin_mm,
    );
    artifact.embed_image(&image, &placement)?;

    emit(events, ExportEvent::Progress(ExportStage::Finalizing));
    let file_name = naming::export_file_name(&request.doc.profile.full_name, &export.file_suffix);
    std::fs::create_dir_all(request.output_dir)?;
    let path = request.output_dir.join(&file_name);
    artifact.save(&path)?;

    emit(events, ExportEvent::Progress(ExportStage::Done));
    Ok(ExportOutcome {
        path,
        file_name,
        image: (image.width, image.height),
        placement,
    })
}

//! # Portfolio Builder
//!
//! A form-to-preview engine for resumes and portfolios. Form inputs fill an
//! in-memory document; every change re-renders an HTML preview with the
//! selected theme and color palette; on demand the preview is rasterized and
//! saved as a single-page PDF.
//!
//! # Architecture: Actions In, Patches Out
//!
//! The core never touches a page. A presentation layer turns control events
//! into [`app::Action`]s and applies the [`app::Patch`]es that come back:
//!
//! ```text
//! input/click ─▶ Action ─▶ Builder::dispatch ─▶ Document / Selection
//!                                │
//!                                ├─▶ render  ─▶ Patch::SetMarkup (preview)
//!                                ├─▶ notify  ─▶ Patch::ToggleClass (surfaces)
//!                                └─▶ export  ─▶ Rasterizer ─▶ Artifact ─▶ .pdf
//! ```
//!
//! This split keeps every behavior testable without a browser: a test
//! dispatches actions with an injected clock and asserts on patches.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | `Builder` session state, actions, patches |
//! | [`document`] | Profile, skills, the three entry lists, stable entry ids, demo data |
//! | [`form`] | Field bindings and the summary character counter |
//! | [`sections`] | List editor operations and editable block markup |
//! | [`theme`] | Theme, palette, zoom, selection state |
//! | [`render`] | Preview, placeholder, comparison grid, standalone pages (Maud) |
//! | [`notify`] | Notification bar and modal show/hide transitions |
//! | [`raster`] | Rasterization capability, offscreen staging, page-fit math |
//! | [`artifact`] | Paginated document capability (PDF via lopdf) |
//! | [`export`] | Export pipeline, progress events, overlap guard |
//! | [`naming`] | Export file naming |
//! | [`hooks`] | Element ids and class names shared with the page |
//! | [`config`] | `builder.toml` loading, merging, validation, palette CSS |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Stable Entry Ids
//!
//! List entries get an opaque [`document::EntryId`] when created. Update and
//! remove are keyed by id, so a block can never act on a neighbor after an
//! earlier entry is removed. Display positions ("Experience 2") are derived
//! from list order whenever they are needed.
//!
//! ## Maud Over String Templates
//!
//! All markup, including the editable blocks, is built with Maud. User text is
//! escaped on interpolation, and the website link is only emitted for
//! `http`, `https`, and `mailto` URLs.
//!
//! ## Capabilities Behind Traits
//!
//! Rasterization and PDF writing sit behind [`raster::Rasterizer`] and
//! [`artifact::ArtifactFactory`]. Headless Chrome is optional (`chrome`
//! feature); without it exports fail cleanly with a capability error.

pub mod app;
pub mod artifact;
pub mod config;
pub mod document;
pub mod export;
pub mod form;
pub mod hooks;
pub mod naming;
pub mod notify;
pub mod output;
pub mod raster;
pub mod render;
pub mod sections;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_helpers;

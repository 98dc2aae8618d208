//! Builder application state and the action dispatcher.
//!
//! [`Builder`] owns everything a session has: the document, the selection,
//! the notification and modal surfaces, and the two export capabilities. The
//! presentation layer feeds it [`Action`]s and applies the [`Patch`]es that
//! come back; the builder never touches a page itself.
//!
//! ```text
//! control event ─▶ Action ─▶ Builder::dispatch ─▶ Vec<Patch> ─▶ page
//!                                   ▲
//!              clock ──────▶ Builder::tick (delayed transitions)
//! ```
//!
//! Dispatch is sequential and runs to completion. Time is passed in, so the
//! same sequence of actions and instants always yields the same patches.

use crate::artifact::ArtifactFactory;
use crate::config::BuilderConfig;
use crate::document::{Document, DocumentData, EntryFields, EntryId, ProfileField, SectionKind};
use crate::export::{self, ExportError, ExportEvent, ExportGuard, ExportOutcome, ExportRequest};
use crate::form::{self, SummaryCounter};
use crate::hooks;
use crate::notify::{Notifier, Severity, Surface};
use crate::raster::Rasterizer;
use crate::render;
use crate::sections;
use crate::theme::{Palette, Selection, Theme, Zoom};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

pub const CLEAR_ALL_PROMPT: &str =
    "Are you sure you want to clear all data? This action cannot be undone.";

// ============================================================================
// Patches
// ============================================================================

/// An element or set of elements a patch applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The element with this id.
    Id(&'static str),
    /// Every element carrying this class.
    Class(&'static str),
    /// Every element whose `attr` equals `value`.
    Data { attr: &'static str, value: String },
}

impl Target {
    /// Every element of one list entry's editable block.
    pub fn entry(id: EntryId) -> Self {
        Self::Data {
            attr: hooks::DATA_ENTRY,
            value: id.get().to_string(),
        }
    }
}

/// One change to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    SetMarkup {
        target: Target,
        markup: String,
    },
    /// Value of a form input.
    SetValue {
        target: Target,
        value: String,
    },
    SetText {
        target: Target,
        text: String,
    },
    SetStyle {
        target: Target,
        property: &'static str,
        value: String,
    },
    /// Replace the whole class attribute.
    SetClassName {
        target: Target,
        class: String,
    },
    ToggleClass {
        target: Target,
        class: &'static str,
        on: bool,
    },
    AppendBlock {
        container: &'static str,
        entry: EntryId,
        markup: String,
    },
    RemoveBlock {
        target: Target,
    },
    /// Replace the heading of an entry's block.
    Relabel {
        target: Target,
        label: String,
    },
    ClearContainer {
        target: Target,
    },
    SetDisabled {
        target: Target,
        disabled: bool,
    },
    /// Ask the user; answer with `ConfirmClearAll` or `CancelClearAll`.
    Confirm {
        prompt: String,
    },
    /// Offer a finished file to the user.
    Download {
        path: PathBuf,
    },
}

// ============================================================================
// Actions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadDemo,
    TogglePreview,
    ShowComparison,
    SelectFromComparison(Theme),
    CloseComparison,
    SelectTheme(Theme),
    SelectPalette(Palette),
    Input { field: ProfileField, value: String },
    AddEntry(SectionKind),
    UpdateEntry { id: EntryId, fields: EntryFields },
    RemoveEntry(EntryId),
    ZoomIn,
    ZoomOut,
    Export,
    ClearAll,
    ConfirmClearAll,
    CancelClearAll,
    DismissNotification,
}

impl Action {
    /// The action behind a clicked control, by element id or class hook.
    pub fn from_control(id: &str) -> Option<Self> {
        let action = match id {
            hooks::TRY_LIVE_DEMO => Self::LoadDemo,
            hooks::TOGGLE_PREVIEW => Self::TogglePreview,
            hooks::COMPARE_THEMES => Self::ShowComparison,
            hooks::CLOSE_COMPARE => Self::CloseComparison,
            hooks::ADD_EXPERIENCE => Self::AddEntry(SectionKind::Experience),
            hooks::ADD_EDUCATION => Self::AddEntry(SectionKind::Education),
            hooks::ADD_PROJECT => Self::AddEntry(SectionKind::Projects),
            hooks::ZOOM_IN => Self::ZoomIn,
            hooks::ZOOM_OUT => Self::ZoomOut,
            hooks::GENERATE_PDF => Self::Export,
            hooks::CLEAR_ALL => Self::ClearAll,
            hooks::NOTIFICATION_CLOSE => Self::DismissNotification,
            _ => return None,
        };
        Some(action)
    }

    /// An input event on a bound form field. `None` for unbound ids.
    pub fn input(id: &str, value: impl Into<String>) -> Option<Self> {
        ProfileField::from_hook(id).map(|field| Self::Input {
            field,
            value: value.into(),
        })
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Export waiting for its completion delay before the modal closes.
#[derive(Debug, Clone)]
struct PendingClose {
    at: Instant,
}

pub struct Builder {
    doc: Document,
    selection: Selection,
    config: BuilderConfig,
    notifier: Notifier,
    pdf_modal: Surface,
    compare_modal: Surface,
    rasterizer: Box<dyn Rasterizer>,
    artifacts: Box<dyn ArtifactFactory>,
    guard: ExportGuard,
    export_dir: PathBuf,
    pending_close: Option<PendingClose>,
    confirming_clear: bool,
    last_export: Option<ExportOutcome>,
}

impl Builder {
    /// A session with an empty document and the configured selection.
    pub fn new(
        config: BuilderConfig,
        rasterizer: Box<dyn Rasterizer>,
        artifacts: Box<dyn ArtifactFactory>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        let selection = Selection::new(
            config.preview.theme,
            config.preview.palette,
            Zoom::new(&config.preview.zoom),
        );
        Self {
            doc: Document::new(),
            selection,
            notifier: Notifier::new(&config.notifications),
            pdf_modal: Surface::new(hooks::PDF_MODAL, &config.notifications),
            compare_modal: Surface::new(hooks::COMPARE_MODAL, &config.notifications),
            config,
            rasterizer,
            artifacts,
            guard: ExportGuard::new(),
            export_dir: export_dir.into(),
            pending_close: None,
            confirming_clear: false,
            last_export: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn pdf_modal(&self) -> &Surface {
        &self.pdf_modal
    }

    pub fn compare_modal(&self) -> &Surface {
        &self.compare_modal
    }

    /// Handle on the in-flight flag, shared with anything else that exports.
    pub fn export_guard(&self) -> ExportGuard {
        self.guard.clone()
    }

    /// The most recent successful export.
    pub fn last_export(&self) -> Option<&ExportOutcome> {
        self.last_export.as_ref()
    }

    /// Patches that bring a freshly loaded page in line with the state.
    pub fn initial_patches(&self) -> Vec<Patch> {
        let mut patches = vec![self.preview_patch()];
        patches.extend(self.counter_patches());
        patches.extend(self.zoom_patches());
        patches.extend(theme_patches(self.selection.theme));
        patches.extend(palette_patches(self.selection.palette));
        patches.extend(visibility_patches(self.selection.preview_visible));
        patches
    }

    /// Current preview markup.
    pub fn preview(&self) -> String {
        render::render(&self.doc, self.selection.theme, self.selection.palette).into_string()
    }

    pub fn dispatch(&mut self, action: Action, now: Instant) -> Vec<Patch> {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::LoadDemo => self.load_demo(now),
            Action::TogglePreview => self.toggle_preview(now),
            Action::ShowComparison => self.show_comparison(now),
            Action::SelectFromComparison(theme) => {
                let mut patches = self.select_theme(theme, now);
                patches.extend(self.compare_modal.close(now));
                patches
            }
            Action::CloseComparison => self.compare_modal.close(now),
            Action::SelectTheme(theme) => self.select_theme(theme, now),
            Action::SelectPalette(palette) => self.select_palette(palette, now),
            Action::Input { field, value } => self.input(field, value),
            Action::AddEntry(kind) => self.add_entry(kind, now),
            Action::UpdateEntry { id, fields } => self.update_entry(id, fields),
            Action::RemoveEntry(id) => self.remove_entry(id, now),
            Action::ZoomIn => {
                let changed = self.selection.zoom.zoom_in();
                self.zoomed(changed, now)
            }
            Action::ZoomOut => {
                let changed = self.selection.zoom.zoom_out();
                self.zoomed(changed, now)
            }
            Action::Export => self.export(now),
            Action::ClearAll => {
                self.confirming_clear = true;
                vec![Patch::Confirm {
                    prompt: CLEAR_ALL_PROMPT.to_string(),
                }]
            }
            Action::ConfirmClearAll => self.clear_all(now),
            Action::CancelClearAll => {
                self.confirming_clear = false;
                Vec::new()
            }
            Action::DismissNotification => self.notifier.dismiss(now),
        }
    }

    /// Advance every timer to `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Patch> {
        let mut patches = Vec::new();
        if self.pending_close.as_ref().is_some_and(|p| now >= p.at) {
            self.pending_close = None;
            patches.extend(self.pdf_modal.close(now));
            patches.push(Patch::SetDisabled {
                target: Target::Id(hooks::GENERATE_PDF),
                disabled: false,
            });
            patches.extend(
                self.notifier
                    .show("PDF downloaded successfully! 📄", Severity::Success, now),
            );
        }
        patches.extend(self.notifier.tick(now));
        patches.extend(self.pdf_modal.tick(now));
        patches.extend(self.compare_modal.tick(now));
        patches
    }

    // ------------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------------

    fn preview_patch(&self) -> Patch {
        Patch::SetMarkup {
            target: Target::Id(hooks::PREVIEW_CONTENT),
            markup: self.preview(),
        }
    }

    fn counter_patches(&self) -> Vec<Patch> {
        SummaryCounter::measure(&self.doc.profile.summary, &self.config.summary).patches()
    }

    fn zoom_patches(&self) -> Vec<Patch> {
        let zoom = self.selection.zoom;
        vec![
            Patch::SetStyle {
                target: Target::Id(hooks::PREVIEW_CONTENT),
                property: "transform",
                value: format!("scale({})", zoom.scale()),
            },
            Patch::SetStyle {
                target: Target::Id(hooks::PREVIEW_CONTENT),
                property: "transform-origin",
                value: "top center".to_string(),
            },
            Patch::SetText {
                target: Target::Id(hooks::ZOOM_LEVEL),
                text: zoom.to_string(),
            },
        ]
    }

    fn input(&mut self, field: ProfileField, value: String) -> Vec<Patch> {
        self.doc.set_field(field, value);
        let mut patches = vec![self.preview_patch()];
        if field == ProfileField::Summary {
            patches.extend(self.counter_patches());
        }
        patches
    }

    fn load_demo(&mut self, now: Instant) -> Vec<Patch> {
        self.doc.replace_with(DocumentData::demo());
        let mut patches = form::fill_patches(&self.doc);
        patches.extend(self.counter_patches());
        patches.extend(sections::rebuild_all(&self.doc));
        patches.push(self.preview_patch());
        self.selection.preview_visible = true;
        patches.extend(visibility_patches(true));
        patches.extend(
            self.notifier
                .show("Demo data loaded successfully! 🎯", Severity::Success, now),
        );
        tracing::info!("demo data loaded");
        patches
    }

    fn toggle_preview(&mut self, now: Instant) -> Vec<Patch> {
        let visible = !self.selection.preview_visible;
        self.selection.preview_visible = visible;
        let mut patches = visibility_patches(visible);
        let message = if visible {
            "Preview shown"
        } else {
            "Preview hidden"
        };
        patches.extend(self.notifier.show(message, Severity::Info, now));
        patches
    }

    fn show_comparison(&mut self, now: Instant) -> Vec<Patch> {
        let mut patches = vec![Patch::SetMarkup {
            target: Target::Id(hooks::COMPARISON_GRID),
            markup: render::render_comparison(&DocumentData::demo()).into_string(),
        }];
        patches.extend(self.compare_modal.open(now));
        patches.extend(
            self.notifier
                .show("Theme comparison opened", Severity::Info, now),
        );
        patches
    }

    fn select_theme(&mut self, theme: Theme, now: Instant) -> Vec<Patch> {
        self.selection.theme = theme;
        let mut patches = theme_patches(theme);
        patches.push(self.preview_patch());
        patches.extend(self.notifier.show(
            format!("{} theme selected! ✨", theme.name()),
            Severity::Success,
            now,
        ));
        patches
    }

    fn select_palette(&mut self, palette: Palette, now: Instant) -> Vec<Patch> {
        self.selection.palette = palette;
        let mut patches = palette_patches(palette);
        patches.push(self.preview_patch());
        patches.extend(self.notifier.show(
            format!("{} palette selected! 🎨", palette.name()),
            Severity::Success,
            now,
        ));
        patches
    }

    fn add_entry(&mut self, kind: SectionKind, now: Instant) -> Vec<Patch> {
        let (id, append) = sections::add_entry(&mut self.doc, EntryFields::blank(kind));
        tracing::debug!(%kind, %id, "entry added");
        let mut patches = vec![append, self.preview_patch()];
        patches.extend(
            self.notifier
                .show(sections::added_message(kind), Severity::Success, now),
        );
        patches
    }

    fn update_entry(&mut self, id: EntryId, fields: EntryFields) -> Vec<Patch> {
        match sections::update_entry(&mut self.doc, id, fields) {
            Ok(_) => vec![self.preview_patch()],
            Err(e) => {
                tracing::warn!(%id, error = %e, "update ignored");
                Vec::new()
            }
        }
    }

    fn remove_entry(&mut self, id: EntryId, now: Instant) -> Vec<Patch> {
        match sections::remove_entry(&mut self.doc, id) {
            Ok((kind, mut patches)) => {
                tracing::debug!(%kind, %id, "entry removed");
                patches.push(self.preview_patch());
                patches.extend(
                    self.notifier
                        .show(sections::removed_message(kind), Severity::Info, now),
                );
                patches
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "remove ignored");
                Vec::new()
            }
        }
    }

    fn zoomed(&mut self, changed: bool, now: Instant) -> Vec<Patch> {
        if !changed {
            return Vec::new();
        }
        let mut patches = self.zoom_patches();
        patches.extend(self.notifier.show(
            format!("Zoomed to {}", self.selection.zoom),
            Severity::Info,
            now,
        ));
        patches
    }

    fn clear_all(&mut self, now: Instant) -> Vec<Patch> {
        if !std::mem::take(&mut self.confirming_clear) {
            tracing::debug!("clear-all confirmation without a prompt");
            return Vec::new();
        }
        self.doc.clear();
        let mut patches = form::fill_patches(&self.doc);
        patches.extend(self.counter_patches());
        patches.extend(sections::rebuild_all(&self.doc));
        patches.push(self.preview_patch());
        patches.extend(
            self.notifier
                .show("All data cleared successfully", Severity::Success, now),
        );
        tracing::info!("all data cleared");
        patches
    }

    fn export(&mut self, now: Instant) -> Vec<Patch> {
        if !self.doc.has_identity() {
            let e = ExportError::MissingIdentity;
            return self.notifier.show(e.user_message(), Severity::Error, now);
        }
        if self.pending_close.is_some() {
            let e = ExportError::AlreadyRunning;
            return self.notifier.show(e.user_message(), Severity::Warning, now);
        }

        let mut patches = self.pdf_modal.open(now);
        patches.push(Patch::SetDisabled {
            target: Target::Id(hooks::GENERATE_PDF),
            disabled: true,
        });

        let (tx, rx) = mpsc::channel();
        let request = ExportRequest {
            doc: &self.doc,
            theme: self.selection.theme,
            palette: self.selection.palette,
            output_dir: &self.export_dir,
        };
        let result = export::run_export(
            self.rasterizer.as_ref(),
            self.artifacts.as_ref(),
            &self.guard,
            &request,
            &self.config,
            Some(&tx),
        );
        drop(tx);
        patches.extend(rx.iter().flat_map(|event| progress_patches(&event)));

        match result {
            Ok(outcome) => {
                patches.push(Patch::Download {
                    path: outcome.path.clone(),
                });
                self.last_export = Some(outcome);
                self.pending_close = Some(PendingClose {
                    at: now + self.config.export.completion_delay(),
                });
            }
            Err(e) => {
                patches.extend(self.pdf_modal.close(now));
                patches.push(Patch::SetDisabled {
                    target: Target::Id(hooks::GENERATE_PDF),
                    disabled: false,
                });
                let severity = match e {
                    ExportError::AlreadyRunning => Severity::Warning,
                    _ => Severity::Error,
                };
                patches.extend(self.notifier.show(e.user_message(), severity, now));
            }
        }
        patches
    }
}

fn theme_patches(theme: Theme) -> Vec<Patch> {
    vec![
        Patch::ToggleClass {
            target: Target::Class(hooks::THEME_BUTTON),
            class: hooks::ACTIVE,
            on: false,
        },
        Patch::ToggleClass {
            target: Target::Data {
                attr: hooks::DATA_THEME,
                value: theme.id().to_string(),
            },
            class: hooks::ACTIVE,
            on: true,
        },
    ]
}

fn palette_patches(palette: Palette) -> Vec<Patch> {
    vec![
        Patch::ToggleClass {
            target: Target::Class(hooks::PALETTE_BUTTON),
            class: hooks::ACTIVE,
            on: false,
        },
        Patch::ToggleClass {
            target: Target::Data {
                attr: hooks::DATA_PALETTE,
                value: palette.id().to_string(),
            },
            class: hooks::ACTIVE,
            on: true,
        },
    ]
}

fn visibility_patches(visible: bool) -> Vec<Patch> {
    let (display, label) = if visible {
        ("block", "Hide Preview")
    } else {
        ("none", "Show Preview")
    };
    vec![
        Patch::SetStyle {
            target: Target::Id(hooks::PREVIEW_PANEL),
            property: "display",
            value: display.to_string(),
        },
        Patch::SetText {
            target: Target::Id(hooks::TOGGLE_PREVIEW),
            text: label.to_string(),
        },
    ]
}

fn progress_patches(event: &ExportEvent) -> Vec<Patch> {
    match event {
        ExportEvent::Progress(stage) => vec![
            Patch::SetStyle {
                target: Target::Id(hooks::PDF_PROGRESS),
                property: "width",
                value: format!("{}%", stage.percent()),
            },
            Patch::SetText {
                target: Target::Id(hooks::PDF_STATUS),
                text: stage.status().to_string(),
            },
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::tests::MockFactory;
    use crate::notify::Phase;
    use crate::raster::backend::tests::MockRasterizer;
    use std::time::Duration;
    use tempfile::TempDir;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Harness {
        builder: Builder,
        raster: MockRasterizer,
        factory: MockFactory,
        _dir: TempDir,
    }

    fn harness_with(raster: MockRasterizer, factory: MockFactory) -> Harness {
        let dir = TempDir::new().unwrap();
        let builder = Builder::new(
            BuilderConfig::default(),
            Box::new(raster.clone()),
            Box::new(factory.clone()),
            dir.path(),
        );
        Harness {
            builder,
            raster,
            factory,
            _dir: dir,
        }
    }

    fn harness() -> Harness {
        harness_with(MockRasterizer::new(), MockFactory::new())
    }

    fn message(builder: &Builder) -> Option<String> {
        builder.notifier().current().map(|n| n.message.clone())
    }

    fn type_into(builder: &mut Builder, t: Instant, hook: &str, value: &str) -> Vec<Patch> {
        builder.dispatch(Action::input(hook, value).unwrap(), t)
    }

    #[test]
    fn controls_map_to_actions() {
        assert_eq!(
            Action::from_control(hooks::ADD_PROJECT),
            Some(Action::AddEntry(SectionKind::Projects))
        );
        assert_eq!(Action::from_control(hooks::GENERATE_PDF), Some(Action::Export));
        assert_eq!(Action::from_control("nope"), None);
        assert_eq!(Action::input("nope", "x"), None);
    }

    #[test]
    fn input_is_stored_verbatim() {
        let mut h = harness();
        let t = Instant::now();
        type_into(&mut h.builder, t, hooks::FULL_NAME, "  Jane  ");
        assert_eq!(h.builder.document().profile.full_name, "  Jane  ");
    }

    #[test]
    fn initial_state_is_blank_with_defaults() {
        let h = harness();
        let patches = h.builder.initial_patches();
        assert!(h.builder.preview().contains("preview-placeholder"));
        assert!(patches.contains(&Patch::SetText {
            target: Target::Id(hooks::ZOOM_LEVEL),
            text: "100%".to_string(),
        }));
        assert!(patches.contains(&Patch::SetText {
            target: Target::Id(hooks::SUMMARY_COUNTER),
            text: "0/500".to_string(),
        }));
    }

    #[test]
    fn typing_a_name_rerenders_preview() {
        let mut h = harness();
        let t = Instant::now();
        let patches = type_into(&mut h.builder, t, hooks::FULL_NAME, "Jane Doe");

        let Patch::SetMarkup { target, markup } = &patches[0] else {
            panic!("expected preview markup, got {:?}", patches[0]);
        };
        assert_eq!(*target, Target::Id(hooks::PREVIEW_CONTENT));
        assert!(markup.contains("Jane Doe"));
        assert!(markup.contains("theme-professional"));
        assert!(markup.contains("palette-blue"));
    }

    #[test]
    fn summary_input_updates_counter() {
        let mut h = harness();
        let patches = type_into(&mut h.builder, Instant::now(), hooks::SUMMARY, &"x".repeat(420));
        assert!(patches.contains(&Patch::SetText {
            target: Target::Id(hooks::SUMMARY_COUNTER),
            text: "420/500".to_string(),
        }));
        assert!(patches.contains(&Patch::SetStyle {
            target: Target::Id(hooks::SUMMARY_COUNTER),
            property: "color",
            value: "var(--color-warning)".to_string(),
        }));
    }

    #[test]
    fn theme_selection_marks_one_button_active() {
        let mut h = harness();
        let patches = h.builder.dispatch(Action::SelectTheme(Theme::Modern), Instant::now());

        assert_eq!(h.builder.selection().theme, Theme::Modern);
        assert_eq!(&patches[..2], &theme_patches(Theme::Modern)[..]);
        assert_eq!(message(&h.builder).as_deref(), Some("Modern theme selected! ✨"));
    }

    #[test]
    fn palette_selection_notifies() {
        let mut h = harness();
        h.builder.dispatch(Action::SelectPalette(Palette::Orange), Instant::now());
        assert_eq!(h.builder.selection().palette, Palette::Orange);
        assert_eq!(message(&h.builder).as_deref(), Some("Orange palette selected! 🎨"));
        assert!(h.builder.preview().contains("preview-placeholder"));
    }

    #[test]
    fn zoom_notifies_only_on_change() {
        let mut h = harness();
        let t = Instant::now();
        for _ in 0..5 {
            h.builder.dispatch(Action::ZoomIn, t);
        }
        assert_eq!(h.builder.selection().zoom.level(), 150);
        assert_eq!(message(&h.builder).as_deref(), Some("Zoomed to 150%"));

        h.builder.dispatch(Action::DismissNotification, t);
        assert!(h.builder.dispatch(Action::ZoomIn, t).is_empty());
        assert_eq!(h.builder.selection().zoom.level(), 150);
        assert!(h.builder.notifier().current().is_none());
    }

    #[test]
    fn zoom_sets_scale_transform() {
        let mut h = harness();
        let patches = h.builder.dispatch(Action::ZoomOut, Instant::now());
        assert!(patches.contains(&Patch::SetStyle {
            target: Target::Id(hooks::PREVIEW_CONTENT),
            property: "transform",
            value: "scale(0.9)".to_string(),
        }));
    }

    #[test]
    fn toggle_preview_flips_visibility() {
        let mut h = harness();
        let t = Instant::now();
        let patches = h.builder.dispatch(Action::TogglePreview, t);
        assert!(!h.builder.selection().preview_visible);
        assert!(patches.contains(&Patch::SetText {
            target: Target::Id(hooks::TOGGLE_PREVIEW),
            text: "Show Preview".to_string(),
        }));
        assert_eq!(message(&h.builder).as_deref(), Some("Preview hidden"));

        h.builder.dispatch(Action::TogglePreview, t);
        assert!(h.builder.selection().preview_visible);
        assert_eq!(message(&h.builder).as_deref(), Some("Preview shown"));
    }

    #[test]
    fn demo_fills_form_lists_and_shows_preview() {
        let mut h = harness();
        let t = Instant::now();
        h.builder.dispatch(Action::TogglePreview, t);
        let patches = h.builder.dispatch(Action::LoadDemo, t);

        let doc = h.builder.document();
        assert_eq!(doc.profile.full_name, "John Smith");
        assert!(!doc.experience.is_empty());
        assert!(h.builder.selection().preview_visible);
        assert!(patches.contains(&Patch::SetValue {
            target: Target::Id(hooks::FULL_NAME),
            value: "John Smith".to_string(),
        }));
        let appended = patches
            .iter()
            .filter(|p| matches!(p, Patch::AppendBlock { .. }))
            .count();
        assert_eq!(
            appended,
            doc.experience.len() + doc.education.len() + doc.projects.len()
        );
        assert_eq!(
            message(&h.builder).as_deref(),
            Some("Demo data loaded successfully! 🎯")
        );
    }

    #[test]
    fn add_update_remove_entry() {
        let mut h = harness();
        let t = Instant::now();
        h.builder.dispatch(Action::AddEntry(SectionKind::Experience), t);
        assert_eq!(message(&h.builder).as_deref(), Some("Experience section added! 📝"));
        let id = h.builder.document().section_ids(SectionKind::Experience)[0];

        let fields = sections::fields_from_inputs(
            SectionKind::Experience,
            &[("company-input", "Acme"), ("position-input", "Engineer")],
        );
        h.builder.dispatch(Action::UpdateEntry { id, fields }, t);
        assert!(h.builder.preview().contains("Acme"));

        let patches = h.builder.dispatch(Action::RemoveEntry(id), t);
        assert_eq!(
            patches[0],
            Patch::RemoveBlock {
                target: Target::entry(id)
            }
        );
        assert!(h.builder.document().experience.is_empty());
        assert_eq!(message(&h.builder).as_deref(), Some("Experience removed"));
    }

    #[test]
    fn stale_entry_actions_are_ignored() {
        let mut h = harness();
        let t = Instant::now();
        h.builder.dispatch(Action::AddEntry(SectionKind::Projects), t);
        let id = h.builder.document().section_ids(SectionKind::Projects)[0];
        h.builder.dispatch(Action::RemoveEntry(id), t);

        assert!(h.builder.dispatch(Action::RemoveEntry(id), t).is_empty());
        let fields = EntryFields::blank(SectionKind::Projects);
        assert!(h.builder.dispatch(Action::UpdateEntry { id, fields }, t).is_empty());
    }

    #[test]
    fn comparison_opens_and_select_closes() {
        let mut h = harness();
        let t = Instant::now();
        let patches = h.builder.dispatch(Action::ShowComparison, t);
        assert!(matches!(
            &patches[0],
            Patch::SetMarkup { target: Target::Id(hooks::COMPARISON_GRID), markup } if markup.contains("Select Creative")
        ));
        assert!(h.builder.compare_modal().is_visible());
        assert_eq!(message(&h.builder).as_deref(), Some("Theme comparison opened"));

        h.builder.tick(t + ms(10));
        h.builder
            .dispatch(Action::SelectFromComparison(Theme::Minimal), t + ms(20));
        assert_eq!(h.builder.selection().theme, Theme::Minimal);
        assert!(!h.builder.compare_modal().is_visible());
        h.builder.tick(t + ms(320));
        assert_eq!(h.builder.compare_modal().phase(), Phase::Hidden);
    }

    #[test]
    fn clear_all_requires_confirmation() {
        let mut h = harness();
        let t = Instant::now();
        h.builder.dispatch(Action::LoadDemo, t);

        let patches = h.builder.dispatch(Action::ClearAll, t);
        assert_eq!(
            patches,
            vec![Patch::Confirm {
                prompt: CLEAR_ALL_PROMPT.to_string()
            }]
        );
        assert!(h.builder.dispatch(Action::CancelClearAll, t).is_empty());
        assert_eq!(h.builder.document().profile.full_name, "John Smith");

        // A confirmation nobody asked for does nothing.
        assert!(h.builder.dispatch(Action::ConfirmClearAll, t).is_empty());

        h.builder.dispatch(Action::ClearAll, t);
        h.builder.dispatch(Action::ConfirmClearAll, t);
        assert!(h.builder.document().is_blank());
        assert!(h.builder.document().projects.is_empty());
        assert!(h.builder.preview().contains("preview-placeholder"));
        assert_eq!(
            message(&h.builder).as_deref(),
            Some("All data cleared successfully")
        );
    }

    #[test]
    fn export_without_identity_never_rasterizes() {
        let mut h = harness();
        let t = Instant::now();
        type_into(&mut h.builder, t, hooks::FULL_NAME, "Jane");

        h.builder.dispatch(Action::Export, t);
        assert!(h.raster.get_calls().is_empty());
        assert!(!h.builder.pdf_modal().is_visible());
        let current = h.builder.notifier().current().unwrap();
        assert_eq!(current.severity, Severity::Error);
        assert_eq!(
            current.message,
            "Please fill in at least your name and email before generating PDF"
        );
    }

    #[test]
    fn export_success_closes_modal_after_delay() {
        let mut h = harness();
        let t = Instant::now();
        type_into(&mut h.builder, t, hooks::FULL_NAME, "Jane Doe");
        type_into(&mut h.builder, t, hooks::EMAIL, "jane@example.com");

        let patches = h.builder.dispatch(Action::Export, t);
        assert_eq!(h.raster.get_calls().len(), 1);
        assert!(patches.contains(&Patch::SetStyle {
            target: Target::Id(hooks::PDF_PROGRESS),
            property: "width",
            value: "100%".to_string(),
        }));
        let outcome = h.builder.last_export().unwrap().clone();
        assert_eq!(outcome.file_name, "Jane_Doe_Resume.pdf");
        assert!(patches.contains(&Patch::Download { path: outcome.path }));
        assert!(h.builder.pdf_modal().is_visible());

        h.builder.tick(t + ms(1499));
        assert!(h.builder.pdf_modal().is_visible());
        h.builder.tick(t + ms(1500));
        assert!(!h.builder.pdf_modal().is_visible());
        assert_eq!(
            message(&h.builder).as_deref(),
            Some("PDF downloaded successfully! 📄")
        );
    }

    #[test]
    fn export_while_closing_is_refused() {
        let mut h = harness();
        let t = Instant::now();
        type_into(&mut h.builder, t, hooks::FULL_NAME, "Jane Doe");
        type_into(&mut h.builder, t, hooks::EMAIL, "jane@example.com");
        h.builder.dispatch(Action::Export, t);
        h.builder.dispatch(Action::Export, t + ms(100));
        assert_eq!(h.raster.get_calls().len(), 1);
        assert_eq!(
            h.builder.notifier().current().unwrap().severity,
            Severity::Warning
        );
    }

    #[test]
    fn export_failure_closes_modal_and_reports() {
        let mut h = harness_with(MockRasterizer::failing(), MockFactory::new());
        let t = Instant::now();
        type_into(&mut h.builder, t, hooks::FULL_NAME, "Jane Doe");
        type_into(&mut h.builder, t, hooks::EMAIL, "jane@example.com");

        let patches = h.builder.dispatch(Action::Export, t);
        assert!(!h.builder.pdf_modal().is_visible());
        assert!(h.factory.get_log().is_empty());
        assert!(h.builder.last_export().is_none());
        assert!(patches.contains(&Patch::SetDisabled {
            target: Target::Id(hooks::GENERATE_PDF),
            disabled: false,
        }));
        assert_eq!(
            message(&h.builder).as_deref(),
            Some("PDF generation failed. Please try again.")
        );
        assert!(!h.builder.export_guard().is_running());
    }
}

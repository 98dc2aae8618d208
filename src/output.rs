//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **content-centric, not file-centric**. Each entry leads with its
//! positional index and the text a reader would recognize (position and
//! company, degree and institution, project name), with secondary details as
//! indented context lines. A document prints as an inventory of what the
//! preview will show.
//!
//! # Output Format
//!
//! ## Document
//!
//! ```text
//! John Smith (Senior Product Manager)
//!     Source: resume.json
//!     Contact: john.smith@email.com • +1 (555) 123-4567
//!     Summary: 233/500 characters
//! Experience (1)
//! 001 Senior Manager at Tech Corp
//!     2020 - Present • San Francisco, CA
//! Education (1)
//! 001 MBA Technology Management at Stanford University
//!     2019 • GPA: 3.85
//! Projects (1)
//! 001 AI Recommendation Engine
//!     Technologies: Python, TensorFlow, AWS
//! Skills
//!     Technical: 5 tags
//!     Soft: 4 tags
//! ```
//!
//! ## Export
//!
//! ```text
//! [ 10%] Initializing PDF generation...
//! [ 60%] Converting to high-quality image...
//!     Image: 1600x2262 px
//! Saved → out/John_Smith_Resume.pdf
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::BuilderConfig;
use crate::document::{Document, SectionEntry, SectionKind};
use crate::export::ExportEvent;
use crate::form::{CounterSeverity, SummaryCounter};
use crate::naming;
use crate::render::{SEPARATOR, join_present, split_skills};
use crate::theme::{Palette, Theme};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Entry line: positional index + title, or a marker for entries the preview
/// skips.
///
/// ```text
/// 001 Senior Manager at Tech Corp
/// 002 (hidden: empty)
/// ```
fn entry_line(index: usize, title: &str, displayable: bool) -> String {
    if displayable {
        format!("{} {}", format_index(index), title)
    } else {
        format!("{} (hidden: empty)", format_index(index))
    }
}

/// `a at b`, or whichever is present.
fn role_at(role: &str, place: &str) -> String {
    match (role.is_empty(), place.is_empty()) {
        (false, false) => format!("{role} at {place}"),
        (false, true) => role.to_string(),
        _ => place.to_string(),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

fn section_header(kind: SectionKind, count: usize) -> String {
    let title = match kind {
        SectionKind::Experience => "Experience",
        SectionKind::Education => "Education",
        SectionKind::Projects => "Projects",
    };
    format!("{title} ({count})")
}

fn counter_line(summary: &str, config: &BuilderConfig) -> String {
    let counter = SummaryCounter::measure(summary, &config.summary);
    match counter.severity {
        CounterSeverity::Normal => format!("{} characters", counter.text),
        CounterSeverity::Warning => format!("{} characters (near limit)", counter.text),
        CounterSeverity::Error => format!("{} characters (over limit)", counter.text),
    }
}

// ============================================================================
// Document inventory
// ============================================================================

/// Format a document as an inventory of what the preview shows.
pub fn format_document(doc: &Document, source: Option<&Path>, config: &BuilderConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let profile = &doc.profile;

    let name = if profile.full_name.is_empty() {
        "(no name)"
    } else {
        profile.full_name.as_str()
    };
    if profile.title.is_empty() {
        lines.push(name.to_string());
    } else {
        lines.push(format!("{} ({})", name, profile.title));
    }
    if let Some(source) = source {
        lines.push(format!("{}Source: {}", indent(1), source.display()));
    }
    let contact: Vec<&str> = [
        &profile.email,
        &profile.phone,
        &profile.location,
        &profile.website,
    ]
    .into_iter()
    .map(String::as_str)
    .filter(|s| !s.is_empty())
    .collect();
    if !contact.is_empty() {
        lines.push(format!("{}Contact: {}", indent(1), contact.join(SEPARATOR)));
    }
    if !profile.summary.is_empty() {
        lines.push(format!(
            "{}Summary: {}",
            indent(1),
            counter_line(&profile.summary, config)
        ));
    }

    if !doc.experience.is_empty() {
        lines.push(section_header(SectionKind::Experience, doc.experience.len()));
        for (i, exp) in doc.experience.values().enumerate() {
            let title = role_at(&exp.position, &exp.company);
            lines.push(entry_line(i + 1, &title, exp.is_displayable()));
            let meta = join_present(&exp.duration, &exp.location);
            if !meta.is_empty() {
                lines.push(format!("{}{}", indent(1), meta));
            }
            if !exp.description.is_empty() {
                lines.push(format!("{}{}", indent(1), truncate_desc(&exp.description, 60)));
            }
        }
    }

    if !doc.education.is_empty() {
        lines.push(section_header(SectionKind::Education, doc.education.len()));
        for (i, edu) in doc.education.values().enumerate() {
            let title = role_at(&edu.degree, &edu.institution);
            lines.push(entry_line(i + 1, &title, edu.is_displayable()));
            let gpa = if edu.gpa.is_empty() {
                String::new()
            } else {
                format!("GPA: {}", edu.gpa)
            };
            let meta = join_present(&edu.year, &gpa);
            if !meta.is_empty() {
                lines.push(format!("{}{}", indent(1), meta));
            }
        }
    }

    if !doc.projects.is_empty() {
        lines.push(section_header(SectionKind::Projects, doc.projects.len()));
        for (i, proj) in doc.projects.values().enumerate() {
            lines.push(entry_line(i + 1, &proj.name, proj.is_displayable()));
            if !proj.technologies.is_empty() {
                lines.push(format!("{}Technologies: {}", indent(1), proj.technologies));
            }
        }
    }

    let technical = split_skills(&doc.skills.technical).len();
    let soft = split_skills(&doc.skills.soft).len();
    if technical + soft > 0 {
        lines.push("Skills".to_string());
        if technical > 0 {
            lines.push(format!("{}Technical: {} tags", indent(1), technical));
        }
        if soft > 0 {
            lines.push(format!("{}Soft: {} tags", indent(1), soft));
        }
    }

    lines
}

/// Print a document inventory to stdout.
pub fn print_document(doc: &Document, source: Option<&Path>, config: &BuilderConfig) {
    for line in format_document(doc, source, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the readiness report for `check`: export precondition, target file
/// name, and entries the preview will skip.
pub fn format_check(doc: &Document, config: &BuilderConfig) -> Vec<String> {
    let mut lines = Vec::new();

    if doc.has_identity() {
        let file = naming::export_file_name(&doc.profile.full_name, &config.export.file_suffix);
        lines.push(format!("Export: ready → {}", file));
    } else {
        lines.push("Export: blocked".to_string());
        if doc.profile.full_name.trim().is_empty() {
            lines.push(format!("{}missing full name", indent(1)));
        }
        if doc.profile.email.trim().is_empty() {
            lines.push(format!("{}missing email", indent(1)));
        }
    }

    lines.push(format!(
        "Summary: {}",
        counter_line(&doc.profile.summary, config)
    ));

    let mut hidden = Vec::new();
    hidden.extend(hidden_labels(SectionKind::Experience, doc.experience.values()));
    hidden.extend(hidden_labels(SectionKind::Education, doc.education.values()));
    hidden.extend(hidden_labels(SectionKind::Projects, doc.projects.values()));
    if !hidden.is_empty() {
        lines.push(format!("Hidden from preview ({})", hidden.len()));
        lines.extend(hidden.into_iter().map(|label| format!("{}{}", indent(1), label)));
    }

    lines
}

fn hidden_labels<'a, T: SectionEntry + 'a>(
    kind: SectionKind,
    entries: impl Iterator<Item = &'a T>,
) -> Vec<String> {
    entries
        .enumerate()
        .filter(|(_, e)| !e.is_displayable())
        .map(|(pos, _)| kind.display_label(pos))
        .collect()
}

/// Print the readiness report to stdout.
pub fn print_check(doc: &Document, config: &BuilderConfig) {
    for line in format_check(doc, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Render
// ============================================================================

/// Format the result of writing a standalone page.
///
/// ```text
/// Rendered → resume.html (professional, blue)
/// ```
pub fn format_render_output(path: &Path, theme: Theme, palette: Palette) -> Vec<String> {
    vec![format!(
        "Rendered → {} ({}, {})",
        path.display(),
        theme,
        palette
    )]
}

pub fn print_render_output(path: &Path, theme: Theme, palette: Palette) {
    for line in format_render_output(path, theme, palette) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a single export progress event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::Progress(stage) => {
            vec![format!("[{:>3}%] {}", stage.percent(), stage.status())]
        }
        ExportEvent::Rasterized { width, height } => {
            vec![format!("{}Image: {}x{} px", indent(1), width, height)]
        }
        ExportEvent::Saved { path } => vec![format!("Saved → {}", path.display())],
        ExportEvent::Failed { error } => vec![format!("Failed: {}", error)],
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Preview rendering.
//!
//! [`render`] is a pure function of the document and the selected theme and
//! palette. It runs after every change, so it holds no state and touches no
//! I/O. The same markup is used for the live preview, the theme comparison
//! cards, the CLI's standalone page, and the page staged for rasterization.
//!
//! ## Output
//!
//! ```text
//! div.resume.theme-{t}.palette-{p}
//! ├── div.resume-header        name (or "Your Name"), title, contact line
//! ├── Professional Summary     if summary is non-empty
//! ├── Work Experience          if any entry has company or position
//! ├── Education                if any entry has institution or degree
//! ├── Skills                   if either skill string has a token
//! └── Projects                 if any entry has a name
//! ```
//!
//! A document with no name, no summary, and no experience entries renders the
//! placeholder instead, whatever else it holds.
//!
//! ## Escaping
//!
//! All user text goes through maud's automatic escaping. The website becomes
//! a link only when it uses the `http`, `https`, or `mailto` scheme; any other
//! value is shown as text.

use crate::config::{self, BuilderConfig, ExportConfig};
use crate::document::{Document, DocumentData, EducationEntry, ExperienceEntry, ProjectEntry, SectionEntry};
use crate::hooks;
use crate::theme::{Palette, Theme};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/preview.css");

/// Separator between contact items and between date parts.
pub const SEPARATOR: &str = " • ";

/// Default heading when no name has been entered.
pub const NAME_PLACEHOLDER: &str = "Your Name";

/// Render the preview for `doc` under `theme` and `palette`.
pub fn render(doc: &Document, theme: Theme, palette: Palette) -> Markup {
    if doc.is_blank() {
        return render_placeholder();
    }
    html! {
        div class={ "resume " (theme.class()) " " (palette.class()) } {
            (render_header(doc))
            @if !doc.profile.summary.is_empty() {
                div.resume-section {
                    h3 { "Professional Summary" }
                    p { (doc.profile.summary) }
                }
            }
            (render_experience(doc))
            (render_education(doc))
            (render_skills(doc))
            (render_projects(doc))
        }
    }
}

pub fn render_placeholder() -> Markup {
    html! {
        div.preview-placeholder {
            div.placeholder-icon { "📄" }
            h3 { "Your Portfolio Preview" }
            p {
                "Click \"Try Live Demo\" to see how your resume will look, \
                 or start filling out your information above."
            }
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

fn render_header(doc: &Document) -> Markup {
    let profile = &doc.profile;
    let name = if profile.full_name.is_empty() {
        NAME_PLACEHOLDER
    } else {
        profile.full_name.as_str()
    };

    let mut contact: Vec<Markup> = Vec::new();
    if !profile.email.is_empty() {
        contact.push(html! { "📧 " (profile.email) });
    }
    if !profile.phone.is_empty() {
        contact.push(html! { "📞 " (profile.phone) });
    }
    if !profile.location.is_empty() {
        contact.push(html! { "📍 " (profile.location) });
    }
    if !profile.website.is_empty() {
        contact.push(match safe_href(&profile.website) {
            Some(href) => html! { "🌐 " a href=(href) target="_blank" rel="noopener" { "Website" } },
            None => html! { "🌐 " (profile.website) },
        });
    }

    html! {
        div.resume-header {
            h1.resume-name { (name) }
            @if !profile.title.is_empty() {
                div.resume-title { (profile.title) }
            }
            @if !contact.is_empty() {
                div.resume-contact {
                    @for (i, item) in contact.iter().enumerate() {
                        @if i > 0 { (SEPARATOR) }
                        (item)
                    }
                }
            }
        }
    }
}

fn render_experience(doc: &Document) -> Markup {
    html! {
        @if doc.experience.any_displayable() {
            div.resume-section {
                h3 { "Work Experience" }
                @for exp in doc.experience.values().filter(|e| e.is_displayable()) {
                    (render_experience_item(exp))
                }
            }
        }
    }
}

fn render_experience_item(exp: &ExperienceEntry) -> Markup {
    html! {
        div.resume-item {
            div.resume-item-header {
                div {
                    @if !exp.position.is_empty() {
                        div.resume-item-title { (exp.position) }
                    }
                    @if !exp.company.is_empty() {
                        div.resume-item-subtitle { (exp.company) }
                    }
                }
                div.resume-item-date { (join_present(&exp.duration, &exp.location)) }
            }
            @if !exp.description.is_empty() {
                div.resume-item-description { (exp.description) }
            }
        }
    }
}

fn render_education(doc: &Document) -> Markup {
    html! {
        @if doc.education.any_displayable() {
            div.resume-section {
                h3 { "Education" }
                @for edu in doc.education.values().filter(|e| e.is_displayable()) {
                    (render_education_item(edu))
                }
            }
        }
    }
}

fn render_education_item(edu: &EducationEntry) -> Markup {
    let gpa = if edu.gpa.is_empty() {
        String::new()
    } else {
        format!("GPA: {}", edu.gpa)
    };
    html! {
        div.resume-item {
            div.resume-item-header {
                div {
                    @if !edu.degree.is_empty() {
                        div.resume-item-title { (edu.degree) }
                    }
                    @if !edu.institution.is_empty() {
                        div.resume-item-subtitle { (edu.institution) }
                    }
                }
                div.resume-item-date { (join_present(&edu.year, &gpa)) }
            }
        }
    }
}

fn render_skills(doc: &Document) -> Markup {
    let technical = split_skills(&doc.skills.technical);
    let soft = split_skills(&doc.skills.soft);
    html! {
        @if !technical.is_empty() || !soft.is_empty() {
            div.resume-section {
                h3 { "Skills" }
                (render_skill_group("Technical Skills", &technical))
                (render_skill_group("Soft Skills", &soft))
            }
        }
    }
}

fn render_skill_group(title: &str, skills: &[&str]) -> Markup {
    html! {
        @if !skills.is_empty() {
            div.resume-item {
                div.resume-item-title { (title) }
                div.skills-list {
                    @for skill in skills {
                        span.skill-tag { (skill) }
                    }
                }
            }
        }
    }
}

fn render_projects(doc: &Document) -> Markup {
    html! {
        @if doc.projects.any_displayable() {
            div.resume-section {
                h3 { "Projects" }
                @for project in doc.projects.values().filter(|p| p.is_displayable()) {
                    (render_project_item(project))
                }
            }
        }
    }
}

fn render_project_item(project: &ProjectEntry) -> Markup {
    html! {
        div.resume-item {
            div.resume-item-title { (project.name) }
            @if !project.technologies.is_empty() {
                div.resume-item-subtitle { "Technologies: " (project.technologies) }
            }
            @if !project.description.is_empty() {
                div.resume-item-description { (project.description) }
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Split a comma-separated skill string into trimmed, non-empty tokens.
pub fn split_skills(skills: &str) -> Vec<&str> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `a • b` when both are present, otherwise whichever one is.
pub fn join_present(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => format!("{a}{SEPARATOR}{b}"),
        (false, true) => a.to_string(),
        (true, false) => b.to_string(),
        (true, true) => String::new(),
    }
}

/// The website as an `href`, if its scheme is safe to link.
pub fn safe_href(website: &str) -> Option<&str> {
    let url = website.trim();
    let (scheme, rest) = url.split_once(':')?;
    let allowed = ["http", "https", "mailto"]
        .iter()
        .any(|s| scheme.eq_ignore_ascii_case(s));
    (allowed && !rest.is_empty()).then_some(url)
}

// ============================================================================
// Theme comparison
// ============================================================================

/// One card per theme showing a condensed sample resume.
///
/// Each card has a select button carrying the theme in `data-theme`.
pub fn render_comparison(sample: &DocumentData) -> Markup {
    html! {
        @for theme in Theme::ALL {
            div.comparison-item {
                div.comparison-preview {
                    div class={ "resume comparison-resume " (theme.class()) } {
                        div.resume-header {
                            h1.resume-name { (sample.full_name) }
                            div.resume-title { (sample.title) }
                        }
                        @if let Some(exp) = sample.experience.first() {
                            div.resume-section {
                                h3 { "Experience" }
                                div.resume-item {
                                    div.resume-item-title { (exp.position) }
                                    div.resume-item-subtitle { (exp.company) }
                                }
                            }
                        }
                    }
                }
                div.comparison-info {
                    h4 { (theme.name()) }
                    p { "Professional " (theme.id()) " design" }
                    button.btn.btn--sm.btn--primary type="button" data-theme=(theme.id()) {
                        "Select " (theme.name())
                    }
                }
            }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Stylesheet for standalone pages: static styles plus palette variables.
pub fn page_css(config: &BuilderConfig) -> String {
    format!(
        "{}\n\n{}",
        CSS_STATIC,
        config::generate_palette_css(&config.palettes)
    )
}

/// Renders a complete HTML document around `content`.
pub fn standalone_page(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// The page staged for rasterization: the resume inside a fixed-width
/// container on a plain background.
pub fn export_page(
    doc: &Document,
    theme: Theme,
    palette: Palette,
    export: &ExportConfig,
    css: &str,
) -> Markup {
    let style = format!(
        "width: {}px; padding: {}px; background: {}; box-sizing: content-box;",
        export.width, export.padding, export.background
    );
    let content = html! {
        div class=(hooks::EXPORT_CONTAINER) style=(style) {
            (render(doc, theme, palette))
        }
    };
    standalone_page(&page_title(doc), css, content)
}

/// `<title>` for standalone pages.
pub fn page_title(doc: &Document) -> String {
    let name = doc.profile.full_name.trim();
    if name.is_empty() {
        "Portfolio".to_string()
    } else {
        format!("{name} - Resume")
    }
}

//! List editor for the experience, education, and projects sections.
//!
//! Each entry has one editable block in its section's container. Blocks are
//! keyed by [`EntryId`] through a `data-entry` attribute, so:
//!
//! - **add** appends one block,
//! - **update** touches no markup at all (the inputs already hold the values),
//! - **remove** deletes one block and relabels only the blocks after it.
//!
//! Whole containers are rebuilt only when the document is replaced wholesale
//! (demo load, clear all).

use crate::app::{Patch, Target};
use crate::document::{
    Document, DocumentError, EducationEntry, EntryFields, EntryId, ExperienceEntry, ProjectEntry,
    SectionKind,
};
use crate::hooks;
use maud::{Markup, html};

/// Notification shown after a blank entry is added.
pub fn added_message(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Experience => "Experience section added! 📝",
        SectionKind::Education => "Education section added! 🎓",
        SectionKind::Projects => "Project section added! 🚀",
    }
}

/// Notification shown after an entry is removed.
pub fn removed_message(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Experience => "Experience removed",
        SectionKind::Education => "Education removed",
        SectionKind::Projects => "Project removed",
    }
}

/// `(id, "Experience N")` for every entry of `kind`, in display order.
pub fn labels(doc: &Document, kind: SectionKind) -> Vec<(EntryId, String)> {
    doc.section_ids(kind)
        .into_iter()
        .enumerate()
        .map(|(pos, id)| (id, kind.display_label(pos)))
        .collect()
}

/// Current fields of entry `id`.
pub fn fields_of(doc: &Document, id: EntryId) -> Option<EntryFields> {
    match doc.kind_of(id)? {
        SectionKind::Experience => doc.experience.get(id).cloned().map(EntryFields::Experience),
        SectionKind::Education => doc.education.get(id).cloned().map(EntryFields::Education),
        SectionKind::Projects => doc.projects.get(id).cloned().map(EntryFields::Project),
    }
}

/// Add an entry and return the patch appending its block.
pub fn add_entry(doc: &mut Document, fields: EntryFields) -> (EntryId, Patch) {
    let kind = fields.kind();
    let id = doc.add_fields(fields.clone());
    let position = doc.section_len(kind) - 1;
    let patch = Patch::AppendBlock {
        container: kind.container(),
        entry: id,
        markup: block(id, position, &fields).into_string(),
    };
    (id, patch)
}

/// Replace the fields of entry `id`. No markup changes.
pub fn update_entry(
    doc: &mut Document,
    id: EntryId,
    fields: EntryFields,
) -> Result<usize, DocumentError> {
    doc.update(id, fields)
}

/// Remove entry `id`. Returns its section and the patches: the block is
/// removed and every following block's label moves down by one.
pub fn remove_entry(
    doc: &mut Document,
    id: EntryId,
) -> Result<(SectionKind, Vec<Patch>), DocumentError> {
    let (kind, position) = doc.remove(id)?;
    let mut patches = vec![Patch::RemoveBlock {
        target: Target::entry(id),
    }];
    patches.extend(
        labels(doc, kind)
            .into_iter()
            .skip(position)
            .map(|(entry, label)| Patch::Relabel {
                target: Target::entry(entry),
                label,
            }),
    );
    Ok((kind, patches))
}

/// Clear every container and append one block per entry.
pub fn rebuild_all(doc: &Document) -> Vec<Patch> {
    let mut patches = Vec::new();
    for kind in SectionKind::ALL {
        patches.push(Patch::ClearContainer {
            target: Target::Id(kind.container()),
        });
        for (position, id) in doc.section_ids(kind).into_iter().enumerate() {
            if let Some(fields) = fields_of(doc, id) {
                patches.push(Patch::AppendBlock {
                    container: kind.container(),
                    entry: id,
                    markup: block(id, position, &fields).into_string(),
                });
            }
        }
    }
    patches
}

// ============================================================================
// Input parsing
// ============================================================================

/// Build entry fields from a block's inputs, given as `(input class, value)`.
///
/// Unknown classes are ignored and missing ones are left empty.
pub fn fields_from_inputs(kind: SectionKind, inputs: &[(&str, &str)]) -> EntryFields {
    let value = |class: &str| {
        inputs
            .iter()
            .rev()
            .find(|(c, _)| *c == class)
            .map(|(_, v)| v.to_string())
            .unwrap_or_default()
    };
    match kind {
        SectionKind::Experience => EntryFields::Experience(ExperienceEntry {
            company: value("company-input"),
            position: value("position-input"),
            duration: value("duration-input"),
            location: value("location-input"),
            description: value("description-input"),
        }),
        SectionKind::Education => EntryFields::Education(EducationEntry {
            institution: value("institution-input"),
            degree: value("degree-input"),
            year: value("year-input"),
            gpa: value("gpa-input"),
        }),
        SectionKind::Projects => EntryFields::Project(ProjectEntry {
            name: value("name-input"),
            technologies: value("tech-input"),
            description: value("desc-input"),
        }),
    }
}

// ============================================================================
// Block markup
// ============================================================================

/// Editable block for one entry at 0-based `position`.
pub fn block(id: EntryId, position: usize, fields: &EntryFields) -> Markup {
    let kind = fields.kind();
    let entry = id.get();
    html! {
        div class={ (kind.item_class()) " dynamic-item" } data-entry=(entry) {
            div.dynamic-header {
                h4 { (kind.display_label(position)) }
                button class=(hooks::REMOVE_BUTTON) type="button" data-entry=(entry) { "Remove" }
            }
            @match fields {
                EntryFields::Experience(e) => { (experience_inputs(e)) }
                EntryFields::Education(e) => { (education_inputs(e)) }
                EntryFields::Project(p) => { (project_inputs(p)) }
            }
        }
    }
}

fn text_input(label: &str, class: &str, value: &str, placeholder: &str) -> Markup {
    html! {
        div.form-group {
            label.form-label { (label) }
            input type="text" class={ "form-control " (class) } value=(value) placeholder=(placeholder);
        }
    }
}

fn text_area(label: &str, class: &str, value: &str, placeholder: &str) -> Markup {
    html! {
        div.form-group {
            label.form-label { (label) }
            textarea class={ "form-control " (class) } placeholder=(placeholder) { (value) }
        }
    }
}

fn experience_inputs(e: &ExperienceEntry) -> Markup {
    html! {
        div.form-row {
            (text_input("Company", "company-input", &e.company, "Company Name"))
            (text_input("Position", "position-input", &e.position, "Job Title"))
        }
        div.form-row {
            (text_input("Duration", "duration-input", &e.duration, "Jan 2020 - Present"))
            (text_input("Location", "location-input", &e.location, "City, State"))
        }
        (text_area("Description", "description-input", &e.description,
            "Describe your key responsibilities and achievements..."))
    }
}

fn education_inputs(e: &EducationEntry) -> Markup {
    html! {
        div.form-row {
            (text_input("Institution", "institution-input", &e.institution, "University Name"))
            (text_input("Degree", "degree-input", &e.degree, "Bachelor of Science"))
        }
        div.form-row {
            (text_input("Year", "year-input", &e.year, "2020"))
            (text_input("GPA", "gpa-input", &e.gpa, "3.8"))
        }
    }
}

fn project_inputs(p: &ProjectEntry) -> Markup {
    html! {
        (text_input("Project Name", "name-input", &p.name, "Project Title"))
        (text_input("Technologies", "tech-input", &p.technologies, "React, Node.js, MongoDB"))
        (text_area("Description", "desc-input", &p.description,
            "Describe the project and your role..."))
    }
}

//! The in-memory document model.
//!
//! A [`Document`] is a profile, two skill strings, and three ordered entry
//! lists (experience, education, projects). It lives for one editing session
//! and is never persisted by the core.
//!
//! ## Entry Identity
//!
//! Every entry receives an [`EntryId`] when it is added. Ids are unique across
//! all three lists and never reused within a document, so an editable block can
//! keep addressing its entry after earlier entries are removed. Display
//! positions ("Experience 2") are derived from list order on demand:
//!
//! ```text
//! add A, B, C      → [A#1, B#2, C#3]   labels 1, 2, 3
//! remove B#2       → [A#1, C#3]        labels 1, 2   (C keeps id #3)
//! update C#3       → still addresses C
//! ```
//!
//! ## File Form
//!
//! [`DocumentData`] is the serializable shape used by the CLI and the demo
//! loader. It carries plain lists without ids; ids are assigned fresh when the
//! data is loaded into a [`Document`].

use crate::hooks;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),
    #[error("no {kind} entry at position {index}")]
    OutOfRange { kind: SectionKind, index: usize },
    #[error("entry {id} belongs to {actual}, not {expected}")]
    KindMismatch {
        id: EntryId,
        expected: SectionKind,
        actual: SectionKind,
    },
}

// ============================================================================
// Identity
// ============================================================================

/// Stable opaque identifier of a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry-{}", self.0)
    }
}

/// The three repeated sections of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Experience,
    Education,
    Projects,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [Self::Experience, Self::Education, Self::Projects];

    /// Singular label used for editable block headings ("Experience 1").
    pub fn label(self) -> &'static str {
        match self {
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Projects => "Project",
        }
    }

    /// Container hook holding the editable blocks of this section.
    pub fn container(self) -> &'static str {
        match self {
            Self::Experience => hooks::EXPERIENCE_LIST,
            Self::Education => hooks::EDUCATION_LIST,
            Self::Projects => hooks::PROJECTS_LIST,
        }
    }

    /// Class carried by every editable block of this section.
    pub fn item_class(self) -> &'static str {
        match self {
            Self::Experience => "experience-item",
            Self::Education => "education-item",
            Self::Projects => "project-item",
        }
    }

    /// Display label for the entry at 0-based `position`.
    pub fn display_label(self, position: usize) -> String {
        format!("{} {}", self.label(), position + 1)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Projects => "projects",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Entries
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub year: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub technologies: String,
    pub description: String,
}

/// Fields of one entry, tagged with the section they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryFields {
    Experience(ExperienceEntry),
    Education(EducationEntry),
    Project(ProjectEntry),
}

impl EntryFields {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Experience(_) => SectionKind::Experience,
            Self::Education(_) => SectionKind::Education,
            Self::Project(_) => SectionKind::Projects,
        }
    }

    /// Blank fields for `kind`.
    pub fn blank(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Experience => Self::Experience(ExperienceEntry::default()),
            SectionKind::Education => Self::Education(EducationEntry::default()),
            SectionKind::Projects => Self::Project(ProjectEntry::default()),
        }
    }
}

/// Behaviour shared by the three entry types, so list editing is written once.
pub trait SectionEntry: Clone + Default + PartialEq + fmt::Debug {
    const KIND: SectionKind;

    /// Whether the entry has enough content to appear in the preview.
    fn is_displayable(&self) -> bool;

    fn list_mut(doc: &mut Document) -> &mut EntryList<Self>;
}

impl SectionEntry for ExperienceEntry {
    const KIND: SectionKind = SectionKind::Experience;

    fn is_displayable(&self) -> bool {
        !self.company.is_empty() || !self.position.is_empty()
    }

    fn list_mut(doc: &mut Document) -> &mut EntryList<Self> {
        &mut doc.experience
    }
}

impl SectionEntry for EducationEntry {
    const KIND: SectionKind = SectionKind::Education;

    fn is_displayable(&self) -> bool {
        !self.institution.is_empty() || !self.degree.is_empty()
    }

    fn list_mut(doc: &mut Document) -> &mut EntryList<Self> {
        &mut doc.education
    }
}

impl SectionEntry for ProjectEntry {
    const KIND: SectionKind = SectionKind::Projects;

    fn is_displayable(&self) -> bool {
        !self.name.is_empty()
    }

    fn list_mut(doc: &mut Document) -> &mut EntryList<Self> {
        &mut doc.projects
    }
}

/// An entry together with its stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub id: EntryId,
    pub data: T,
}

/// Ordered list of entries. Position is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: SectionEntry> EntryList<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    /// Entry data in display order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.data)
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.data)
    }

    pub fn at(&self, index: usize) -> Option<&Entry<T>> {
        self.entries.get(index)
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// True when at least one entry would appear in the preview.
    pub fn any_displayable(&self) -> bool {
        self.values().any(T::is_displayable)
    }

    fn push(&mut self, id: EntryId, data: T) -> usize {
        self.entries.push(Entry { id, data });
        self.entries.len() - 1
    }

    /// Replace the fields of entry `id`. Returns its position.
    pub fn update(&mut self, id: EntryId, data: T) -> Result<usize, DocumentError> {
        let index = self.position(id).ok_or(DocumentError::UnknownEntry(id))?;
        self.entries[index].data = data;
        Ok(index)
    }

    pub fn update_at(&mut self, index: usize, data: T) -> Result<EntryId, DocumentError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(DocumentError::OutOfRange {
                kind: T::KIND,
                index,
            })?;
        entry.data = data;
        Ok(entry.id)
    }

    /// Remove entry `id`. Entries after it shift down one position.
    pub fn remove(&mut self, id: EntryId) -> Result<(usize, T), DocumentError> {
        let index = self.position(id).ok_or(DocumentError::UnknownEntry(id))?;
        Ok((index, self.entries.remove(index).data))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Entry<T>, DocumentError> {
        if index >= self.entries.len() {
            return Err(DocumentError::OutOfRange {
                kind: T::KIND,
                index,
            });
        }
        Ok(self.entries.remove(index))
    }
}

// ============================================================================
// Scalar fields
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub summary: String,
}

/// Comma-separated skill lists, kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skills {
    pub technical: String,
    pub soft: String,
}

/// Every scalar field bound to a form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FullName,
    Title,
    Email,
    Phone,
    Location,
    Website,
    Summary,
    TechnicalSkills,
    SoftSkills,
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        Self::FullName,
        Self::Title,
        Self::Email,
        Self::Phone,
        Self::Location,
        Self::Website,
        Self::Summary,
        Self::TechnicalSkills,
        Self::SoftSkills,
    ];

    /// Element id of the input bound to this field.
    pub fn hook(self) -> &'static str {
        match self {
            Self::FullName => hooks::FULL_NAME,
            Self::Title => hooks::TITLE,
            Self::Email => hooks::EMAIL,
            Self::Phone => hooks::PHONE,
            Self::Location => hooks::LOCATION,
            Self::Website => hooks::WEBSITE,
            Self::Summary => hooks::SUMMARY,
            Self::TechnicalSkills => hooks::TECHNICAL_SKILLS,
            Self::SoftSkills => hooks::SOFT_SKILLS,
        }
    }

    pub fn from_hook(hook: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.hook() == hook)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "Name",
            Self::Title => "Title",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Location => "Location",
            Self::Website => "Website",
            Self::Summary => "Summary",
            Self::TechnicalSkills => "Technical skills",
            Self::SoftSkills => "Soft skills",
        }
    }
}

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub profile: Profile,
    pub skills: Skills,
    pub experience: EntryList<ExperienceEntry>,
    pub education: EntryList<EducationEntry>,
    pub projects: EntryList<ProjectEntry>,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from file data, assigning fresh ids in list order.
    pub fn from_data(data: DocumentData) -> Self {
        let mut doc = Self::new();
        doc.fill(data);
        doc
    }

    /// Snapshot into the serializable file form.
    pub fn to_data(&self) -> DocumentData {
        DocumentData {
            full_name: self.profile.full_name.clone(),
            title: self.profile.title.clone(),
            email: self.profile.email.clone(),
            phone: self.profile.phone.clone(),
            location: self.profile.location.clone(),
            website: self.profile.website.clone(),
            summary: self.profile.summary.clone(),
            technical_skills: self.skills.technical.clone(),
            soft_skills: self.skills.soft.clone(),
            experience: self.experience.values().cloned().collect(),
            education: self.education.values().cloned().collect(),
            projects: self.projects.values().cloned().collect(),
        }
    }

    /// Overwrite every field and list with `data` in one step.
    ///
    /// Ids keep counting from where this document left off, so blocks bound to
    /// removed entries can never alias the new ones.
    pub fn replace_with(&mut self, data: DocumentData) {
        let next_id = self.next_id;
        *self = Self {
            next_id,
            ..Self::default()
        };
        self.fill(data);
    }

    /// Reset to an empty document.
    pub fn clear(&mut self) {
        self.replace_with(DocumentData::default());
    }

    fn fill(&mut self, data: DocumentData) {
        self.profile = Profile {
            full_name: data.full_name,
            title: data.title,
            email: data.email,
            phone: data.phone,
            location: data.location,
            website: data.website,
            summary: data.summary,
        };
        self.skills = Skills {
            technical: data.technical_skills,
            soft: data.soft_skills,
        };
        for entry in data.experience {
            self.add(entry);
        }
        for entry in data.education {
            self.add(entry);
        }
        for entry in data.projects {
            self.add(entry);
        }
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.profile.full_name,
            ProfileField::Title => &self.profile.title,
            ProfileField::Email => &self.profile.email,
            ProfileField::Phone => &self.profile.phone,
            ProfileField::Location => &self.profile.location,
            ProfileField::Website => &self.profile.website,
            ProfileField::Summary => &self.profile.summary,
            ProfileField::TechnicalSkills => &self.skills.technical,
            ProfileField::SoftSkills => &self.skills.soft,
        }
    }

    /// Plain assignment. The empty string is a valid value.
    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::FullName => &mut self.profile.full_name,
            ProfileField::Title => &mut self.profile.title,
            ProfileField::Email => &mut self.profile.email,
            ProfileField::Phone => &mut self.profile.phone,
            ProfileField::Location => &mut self.profile.location,
            ProfileField::Website => &mut self.profile.website,
            ProfileField::Summary => &mut self.profile.summary,
            ProfileField::TechnicalSkills => &mut self.skills.technical,
            ProfileField::SoftSkills => &mut self.skills.soft,
        };
        *slot = value.into();
    }

    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }

    /// Append an entry to its section. Returns the new entry's id.
    pub fn add<T: SectionEntry>(&mut self, data: T) -> EntryId {
        let id = self.allocate_id();
        T::list_mut(self).push(id, data);
        id
    }

    pub fn add_fields(&mut self, fields: EntryFields) -> EntryId {
        match fields {
            EntryFields::Experience(e) => self.add(e),
            EntryFields::Education(e) => self.add(e),
            EntryFields::Project(e) => self.add(e),
        }
    }

    /// Section holding entry `id`, if any.
    pub fn kind_of(&self, id: EntryId) -> Option<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .find(|&kind| self.section_ids(kind).contains(&id))
    }

    pub fn section_len(&self, kind: SectionKind) -> usize {
        match kind {
            SectionKind::Experience => self.experience.len(),
            SectionKind::Education => self.education.len(),
            SectionKind::Projects => self.projects.len(),
        }
    }

    pub fn section_ids(&self, kind: SectionKind) -> Vec<EntryId> {
        match kind {
            SectionKind::Experience => self.experience.ids(),
            SectionKind::Education => self.education.ids(),
            SectionKind::Projects => self.projects.ids(),
        }
    }

    /// Replace the fields of entry `id`. Returns its position.
    pub fn update(&mut self, id: EntryId, fields: EntryFields) -> Result<usize, DocumentError> {
        let actual = self.kind_of(id).ok_or(DocumentError::UnknownEntry(id))?;
        if actual != fields.kind() {
            return Err(DocumentError::KindMismatch {
                id,
                expected: fields.kind(),
                actual,
            });
        }
        match fields {
            EntryFields::Experience(e) => self.experience.update(id, e),
            EntryFields::Education(e) => self.education.update(id, e),
            EntryFields::Project(e) => self.projects.update(id, e),
        }
    }

    /// Remove entry `id` from whichever section holds it.
    ///
    /// Returns the section and the position the entry occupied.
    pub fn remove(&mut self, id: EntryId) -> Result<(SectionKind, usize), DocumentError> {
        let kind = self.kind_of(id).ok_or(DocumentError::UnknownEntry(id))?;
        let position = match kind {
            SectionKind::Experience => self.experience.remove(id)?.0,
            SectionKind::Education => self.education.remove(id)?.0,
            SectionKind::Projects => self.projects.remove(id)?.0,
        };
        Ok((kind, position))
    }

    /// Name and email are both present, the minimum for export.
    pub fn has_identity(&self) -> bool {
        !self.profile.full_name.trim().is_empty() && !self.profile.email.trim().is_empty()
    }

    /// Nothing worth previewing yet: no name, no summary, no experience.
    pub fn is_blank(&self) -> bool {
        self.profile.full_name.is_empty()
            && self.profile.summary.is_empty()
            && self.experience.is_empty()
    }
}

// ============================================================================
// File form
// ============================================================================

/// Serializable document shape, keyed like the form's field ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentData {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub summary: String,
    pub technical_skills: String,
    pub soft_skills: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
}

impl DocumentData {
    /// The sample profile loaded by "Try Live Demo".
    pub fn demo() -> Self {
        Self {
            full_name: "John Smith".to_string(),
            title: "Senior Product Manager".to_string(),
            email: "john.smith@email.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            location: "San Francisco, CA".to_string(),
            website: "https://johnsmith.dev".to_string(),
            summary: "Experienced professional with expertise in project management and team \
                      leadership. Led cross-functional teams and delivered key projects that \
                      increased user engagement by 150% and drove $2M+ revenue growth."
                .to_string(),
            technical_skills: "JavaScript, Python, React, Node.js, AWS".to_string(),
            soft_skills: "Leadership, Strategic Planning, Team Management, Communication"
                .to_string(),
            experience: vec![ExperienceEntry {
                company: "Tech Corp".to_string(),
                position: "Senior Manager".to_string(),
                duration: "2020 - Present".to_string(),
                location: "San Francisco, CA".to_string(),
                description: "Led cross-functional teams and delivered key projects. Increased \
                              user retention by 45% through data-driven feature optimization."
                    .to_string(),
            }],
            education: vec![EducationEntry {
                institution: "Stanford University".to_string(),
                degree: "MBA Technology Management".to_string(),
                year: "2019".to_string(),
                gpa: "3.85".to_string(),
            }],
            projects: vec![ProjectEntry {
                name: "AI Recommendation Engine".to_string(),
                technologies: "Python, TensorFlow, AWS".to_string(),
                description: "Developed machine learning system that increased conversion rates \
                              by 35%"
                    .to_string(),
            }],
        }
    }
}

/// Load a document from a JSON file.
pub fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let content = std::fs::read_to_string(path)?;
    let data: DocumentData = serde_json::from_str(&content)?;
    Ok(Document::from_data(data))
}

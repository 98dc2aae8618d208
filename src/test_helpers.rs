//! Shared test utilities for the portfolio-builder test suite.
//!
//! Builders for documents and entries, plus extractors that flatten a
//! [`Document`] into plain values for assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = named("Jane Doe");
//! doc.add(experience("Acme", "Engineer"));
//! doc.add(experience("Globex", "Lead"));
//!
//! assert_eq!(companies(&doc), vec!["Acme", "Globex"]);
//! assert_eq!(
//!     label_texts(&doc, SectionKind::Experience),
//!     vec!["Experience 1", "Experience 2"],
//! );
//! ```

use crate::document::{Document, EntryId, ExperienceEntry, ProfileField, SectionKind};

// =========================================================================
// Builders
// =========================================================================

/// A document with only the full name set.
pub fn named(name: &str) -> Document {
    let mut doc = Document::new();
    doc.set_field(ProfileField::FullName, name);
    doc
}

/// Experience entry with company and position; other fields blank.
pub fn experience(company: &str, position: &str) -> ExperienceEntry {
    ExperienceEntry {
        company: company.to_string(),
        position: position.to_string(),
        ..ExperienceEntry::default()
    }
}

/// A valid id from a throwaway document.
pub fn doc_id() -> EntryId {
    Document::new().add(ExperienceEntry::default())
}

// =========================================================================
// Extractors
// =========================================================================

/// Company of every experience entry, in display order.
pub fn companies(doc: &Document) -> Vec<&str> {
    doc.experience.values().map(|e| e.company.as_str()).collect()
}

/// Positional labels ("Experience 1", ...) of one section, in display order.
pub fn label_texts(doc: &Document, kind: SectionKind) -> Vec<String> {
    (0..doc.section_len(kind))
        .map(|pos| kind.display_label(pos))
        .collect()
}

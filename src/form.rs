//! Form field bindings and the summary character counter.
//!
//! Each scalar input is identified by its element id and maps to exactly one
//! [`ProfileField`]. Input is applied as-is: no trimming, no validation, no
//! length limit. The summary counter is guidance only.

use crate::app::{Patch, Target};
use crate::config::SummaryConfig;
use crate::document::{Document, ProfileField};
use crate::hooks;

/// Visual band of the summary counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterSeverity {
    Normal,
    Warning,
    Error,
}

impl CounterSeverity {
    /// CSS color applied to the counter text.
    pub fn color(self) -> &'static str {
        match self {
            Self::Normal => "var(--color-text-secondary)",
            Self::Warning => "var(--color-warning)",
            Self::Error => "var(--color-error)",
        }
    }
}

/// Summary counter state for a given text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCounter {
    /// Length in characters, not bytes.
    pub length: usize,
    pub severity: CounterSeverity,
    pub text: String,
}

impl SummaryCounter {
    pub fn measure(summary: &str, config: &SummaryConfig) -> Self {
        let length = summary.chars().count();
        let severity = if length > config.error_above {
            CounterSeverity::Error
        } else if length > config.warning_above {
            CounterSeverity::Warning
        } else {
            CounterSeverity::Normal
        };
        Self {
            length,
            severity,
            text: format!("{length}/{}", config.soft_limit),
        }
    }

    pub fn patches(&self) -> Vec<Patch> {
        vec![
            Patch::SetText {
                target: Target::Id(hooks::SUMMARY_COUNTER),
                text: self.text.clone(),
            },
            Patch::SetStyle {
                target: Target::Id(hooks::SUMMARY_COUNTER),
                property: "color",
                value: self.severity.color().to_string(),
            },
        ]
    }
}

/// Patches that write every scalar field of `doc` back into the form.
pub fn fill_patches(doc: &Document) -> Vec<Patch> {
    ProfileField::ALL
        .into_iter()
        .map(|field| Patch::SetValue {
            target: Target::Id(field.hook()),
            value: doc.field(field).to_string(),
        })
        .collect()
}

//! Export file naming.
//!
//! The exported file is named after the person on the resume:
//!
//! - `"Jane Doe"` → `Jane_Doe_Resume.pdf`
//! - `"José O'Brien"` → `Jos__O_Brien_Resume.pdf`
//! - `""` → `Portfolio_Resume.pdf`
//!
//! Every character outside `[A-Za-z0-9]` becomes `_`, one for one, so the
//! name stays recognisable and the result is always a safe single path
//! component.

/// Base name used when the full name is empty.
pub const FALLBACK_NAME: &str = "Portfolio";

/// Replace every non-ASCII-alphanumeric character with `_`.
pub fn sanitize_name(full_name: &str) -> String {
    full_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// File name for an export of `full_name`: `{sanitized}_{suffix}.pdf`.
pub fn export_file_name(full_name: &str, suffix: &str) -> String {
    let base = if full_name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitize_name(full_name)
    };
    format!("{base}_{suffix}.pdf")
}

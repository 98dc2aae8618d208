//! Named hooks shared between the builder core and its markup template.
//!
//! Every element the core reads from or writes to is addressed through one of
//! these constants. The template must carry the same ids and class names; the
//! mapping is 1:1 and nothing else in the crate spells these strings out.

// ============================================================================
// Scalar form fields
// ============================================================================

pub const FULL_NAME: &str = "fullName";
pub const TITLE: &str = "title";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const LOCATION: &str = "location";
pub const WEBSITE: &str = "website";
pub const SUMMARY: &str = "summary";
pub const TECHNICAL_SKILLS: &str = "technicalSkills";
pub const SOFT_SKILLS: &str = "softSkills";

// ============================================================================
// Containers and displays
// ============================================================================

pub const PREVIEW_PANEL: &str = "previewPanel";
pub const PREVIEW_CONTENT: &str = "previewContent";
pub const ZOOM_LEVEL: &str = "zoomLevel";
pub const SUMMARY_COUNTER: &str = "summaryCounter";
pub const EXPERIENCE_LIST: &str = "experienceList";
pub const EDUCATION_LIST: &str = "educationList";
pub const PROJECTS_LIST: &str = "projectsList";
pub const COMPARISON_GRID: &str = "comparisonGrid";
/// Wrapper of the page staged for rasterization.
pub const EXPORT_CONTAINER: &str = "export-container";

// ============================================================================
// Controls
// ============================================================================

pub const TRY_LIVE_DEMO: &str = "tryLiveDemo";
pub const TOGGLE_PREVIEW: &str = "togglePreview";
pub const COMPARE_THEMES: &str = "compareThemes";
pub const CLOSE_COMPARE: &str = "closeCompare";
pub const ADD_EXPERIENCE: &str = "addExperience";
pub const ADD_EDUCATION: &str = "addEducation";
pub const ADD_PROJECT: &str = "addProject";
pub const ZOOM_IN: &str = "zoomIn";
pub const ZOOM_OUT: &str = "zoomOut";
pub const GENERATE_PDF: &str = "generatePDF";
pub const CLEAR_ALL: &str = "clearAll";

// ============================================================================
// Modals and notification
// ============================================================================

pub const PDF_MODAL: &str = "pdfModal";
pub const PDF_PROGRESS: &str = "pdfProgress";
pub const PDF_STATUS: &str = "pdfStatus";
pub const COMPARE_MODAL: &str = "compareModal";
pub const NOTIFICATION: &str = "notification";

// ============================================================================
// Class hooks
// ============================================================================

pub const NOTIFICATION_ICON: &str = "notification-icon";
pub const NOTIFICATION_MESSAGE: &str = "notification-message";
pub const NOTIFICATION_CLOSE: &str = "notification-close";
pub const THEME_BUTTON: &str = "theme-btn";
pub const PALETTE_BUTTON: &str = "color-btn";
pub const REMOVE_BUTTON: &str = "remove-btn";

pub const ACTIVE: &str = "active";
pub const HIDDEN: &str = "hidden";
pub const SHOW: &str = "show";

// ============================================================================
// Data attributes
// ============================================================================

pub const DATA_THEME: &str = "data-theme";
pub const DATA_PALETTE: &str = "data-palette";
pub const DATA_ENTRY: &str = "data-entry";

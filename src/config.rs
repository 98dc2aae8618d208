//! Builder configuration module.
//!
//! Handles loading, validating, and merging `builder.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top of it, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [preview]
//! theme = "professional"    # professional | creative | minimal | modern
//! palette = "blue"          # blue | green | purple | red | orange
//!
//! [preview.zoom]
//! min = 50                  # Percent
//! max = 150
//! step = 10
//! default = 100
//!
//! [summary]
//! soft_limit = 500          # Shown as "n/500"; never enforced
//! warning_above = 400
//! error_above = 450
//!
//! [notifications]
//! duration_ms = 4000        # Auto-dismiss delay
//! show_delay_ms = 10        # Transition delays for notification and modals
//! hide_delay_ms = 300
//!
//! [export]
//! width = 800               # Offscreen container width (CSS px)
//! padding = 40
//! scale = 2.0               # Rasterization pixel ratio
//! background = "#ffffff"
//! page_size = "a4"          # a4 | letter
//! orientation = "portrait"  # portrait | landscape
//! top_margin_mm = 10.0
//! file_suffix = "Resume"
//! completion_delay_ms = 1500
//!
//! [palettes.blue]
//! primary = "#1d4ed8"
//! accent = "#3b82f6"
//! text = "#1f2937"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::raster::{Orientation, PageSize};
use crate::theme::{Palette, Theme};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Builder configuration loaded from `builder.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Initial theme, palette, and zoom bounds.
    pub preview: PreviewConfig,
    /// Summary character counter bands.
    pub summary: SummaryConfig,
    /// Notification and modal timing.
    pub notifications: NotificationsConfig,
    /// Export pipeline settings.
    pub export: ExportConfig,
    /// Colors behind each `palette-*` class.
    pub palettes: PalettesConfig,
}

impl BuilderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.preview.zoom;
        if zoom.step == 0 {
            return Err(ConfigError::Validation(
                "preview.zoom.step must be non-zero".into(),
            ));
        }
        if zoom.min == 0 || zoom.min >= zoom.max {
            return Err(ConfigError::Validation(
                "preview.zoom.min must be non-zero and below preview.zoom.max".into(),
            ));
        }
        if (zoom.max - zoom.min) % zoom.step != 0 {
            return Err(ConfigError::Validation(
                "preview.zoom range must be a whole number of steps".into(),
            ));
        }
        if !(zoom.min..=zoom.max).contains(&zoom.default) || (zoom.default - zoom.min) % zoom.step != 0
        {
            return Err(ConfigError::Validation(
                "preview.zoom.default must be a step within min..max".into(),
            ));
        }
        let summary = &self.summary;
        if summary.warning_above >= summary.error_above {
            return Err(ConfigError::Validation(
                "summary.warning_above must be below summary.error_above".into(),
            ));
        }
        if self.export.width == 0 {
            return Err(ConfigError::Validation(
                "export.width must be non-zero".into(),
            ));
        }
        if !(self.export.scale > 0.0 && self.export.scale <= 4.0) {
            return Err(ConfigError::Validation(
                "export.scale must be in (0, 4]".into(),
            ));
        }
        if self.export.top_margin_mm < 0.0 {
            return Err(ConfigError::Validation(
                "export.top_margin_mm must not be negative".into(),
            ));
        }
        if self.export.file_suffix.is_empty()
            || !self
                .export
                .file_suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Validation(
                "export.file_suffix must be non-empty and use only [A-Za-z0-9_-]".into(),
            ));
        }
        Ok(())
    }
}

/// Initial selection and zoom bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub theme: Theme,
    pub palette: Palette,
    pub zoom: ZoomConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Professional,
            palette: Palette::Blue,
            zoom: ZoomConfig::default(),
        }
    }
}

/// Zoom bounds in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    pub min: u16,
    pub max: u16,
    pub step: u16,
    pub default: u16,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 50,
            max: 150,
            step: 10,
            default: 100,
        }
    }
}

/// Summary counter bands. Lengths are counted in characters.
///
/// - `len <= warning_above` → normal
/// - `warning_above < len <= error_above` → warning
/// - `len > error_above` → error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    pub soft_limit: usize,
    pub warning_above: usize,
    pub error_above: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            soft_limit: 500,
            warning_above: 400,
            error_above: 450,
        }
    }
}

/// Notification lifetime and show/hide transition delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationsConfig {
    pub duration_ms: u64,
    pub show_delay_ms: u64,
    pub hide_delay_ms: u64,
}

impl NotificationsConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            duration_ms: 4000,
            show_delay_ms: 10,
            hide_delay_ms: 300,
        }
    }
}

/// Export pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Offscreen container width in CSS pixels.
    pub width: u32,
    /// Offscreen container padding in CSS pixels.
    pub padding: u32,
    /// Device pixel ratio used for rasterization.
    pub scale: f64,
    /// Background painted behind the resume.
    pub background: String,
    pub page_size: PageSize,
    pub orientation: Orientation,
    /// Distance from the top edge of the page to the image, in millimetres.
    pub top_margin_mm: f64,
    /// Appended to the sanitized name: `Jane_Doe_Resume.pdf`.
    pub file_suffix: String,
    /// How long the finished progress modal stays up.
    pub completion_delay_ms: u64,
}

impl ExportConfig {
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            padding: 40,
            scale: 2.0,
            background: "#ffffff".to_string(),
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            top_margin_mm: 10.0,
            file_suffix: "Resume".to_string(),
            completion_delay_ms: 1500,
        }
    }
}

/// Colors for one palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteScheme {
    /// Headings and the name.
    pub primary: String,
    /// Rules, links, and skill tags.
    pub accent: String,
    /// Body text.
    pub text: String,
}

impl PaletteScheme {
    fn new(primary: &str, accent: &str, text: &str) -> Self {
        Self {
            primary: primary.to_string(),
            accent: accent.to_string(),
            text: text.to_string(),
        }
    }
}

/// One scheme per [`Palette`] variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PalettesConfig {
    pub blue: PaletteScheme,
    pub green: PaletteScheme,
    pub purple: PaletteScheme,
    pub red: PaletteScheme,
    pub orange: PaletteScheme,
}

impl PalettesConfig {
    pub fn scheme(&self, palette: Palette) -> &PaletteScheme {
        match palette {
            Palette::Blue => &self.blue,
            Palette::Green => &self.green,
            Palette::Purple => &self.purple,
            Palette::Red => &self.red,
            Palette::Orange => &self.orange,
        }
    }
}

impl Default for PalettesConfig {
    fn default() -> Self {
        Self {
            blue: PaletteScheme::new("#1d4ed8", "#3b82f6", "#1f2937"),
            green: PaletteScheme::new("#047857", "#10b981", "#1f2937"),
            purple: PaletteScheme::new("#6d28d9", "#8b5cf6", "#1f2937"),
            red: PaletteScheme::new("#b91c1c", "#ef4444", "#1f2937"),
            orange: PaletteScheme::new("#c2410c", "#f97316", "#1f2937"),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BuilderConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BuilderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuilderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<BuilderConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `builder.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Portfolio Builder Configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Initial theme: professional | creative | minimal | modern
theme = "professional"

# Initial palette: blue | green | purple | red | orange
palette = "blue"

# Zoom bounds in percent. The range must be a whole number of steps.
[preview.zoom]
min = 50
max = 150
step = 10
default = 100

# ---------------------------------------------------------------------------
# Summary character counter (guidance only, text is never truncated)
# ---------------------------------------------------------------------------
[summary]
soft_limit = 500
warning_above = 400
error_above = 450

# ---------------------------------------------------------------------------
# Notifications and modals
# ---------------------------------------------------------------------------
[notifications]
# How long a notification stays before it dismisses itself.
duration_ms = 4000
# Delay between toggling the `hidden` and `show` classes.
show_delay_ms = 10
hide_delay_ms = 300

# ---------------------------------------------------------------------------
# PDF export
# ---------------------------------------------------------------------------
[export]
# Offscreen container size in CSS pixels.
width = 800
padding = 40

# Pixel ratio used when rasterizing the container.
scale = 2.0
background = "#ffffff"

# Page: a4 | letter, portrait | landscape.
page_size = "a4"
orientation = "portrait"
top_margin_mm = 10.0

# Output file is <Sanitized_Name>_<file_suffix>.pdf
file_suffix = "Resume"

# How long the finished progress dialog stays open.
completion_delay_ms = 1500

# ---------------------------------------------------------------------------
# Palettes - exposed as --palette-primary / --palette-accent / --palette-text
# ---------------------------------------------------------------------------
[palettes.blue]
primary = "#1d4ed8"
accent = "#3b82f6"
text = "#1f2937"

[palettes.green]
primary = "#047857"
accent = "#10b981"
text = "#1f2937"

[palettes.purple]
primary = "#6d28d9"
accent = "#8b5cf6"
text = "#1f2937"

[palettes.red]
primary = "#b91c1c"
accent = "#ef4444"
text = "#1f2937"

[palettes.orange]
primary = "#c2410c"
accent = "#f97316"
text = "#1f2937"
"##
}

/// Generate one CSS rule per palette class from the palette config.
pub fn generate_palette_css(palettes: &PalettesConfig) -> String {
    Palette::ALL
        .iter()
        .map(|&palette| {
            let scheme = palettes.scheme(palette);
            format!(
                r#".{class} {{
    --palette-primary: {primary};
    --palette-accent: {accent};
    --palette-text: {text};
}}"#,
                class = palette.class(),
                primary = scheme.primary,
                accent = scheme.accent,
                text = scheme.text,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_preview_settings() {
        let config = BuilderConfig::default();
        assert_eq!(config.preview.theme, Theme::Professional);
        assert_eq!(config.preview.palette, Palette::Blue);
        assert_eq!(config.preview.zoom.default, 100);
    }

    #[test]
    fn default_config_has_export_settings() {
        let config = BuilderConfig::default();
        assert_eq!(config.export.width, 800);
        assert_eq!(config.export.scale, 2.0);
        assert_eq!(config.export.page_size, PageSize::A4);
        assert_eq!(config.export.file_suffix, "Resume");
        assert_eq!(config.export.completion_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn default_notification_timing() {
        let config = NotificationsConfig::default();
        assert_eq!(config.duration(), Duration::from_secs(4));
        assert_eq!(config.show_delay(), Duration::from_millis(10));
        assert_eq!(config.hide_delay(), Duration::from_millis(300));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[preview]
theme = "modern"
"#;
        let config: BuilderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.preview.theme, Theme::Modern);
        // Default values preserved
        assert_eq!(config.preview.palette, Palette::Blue);
        assert_eq!(config.summary.soft_limit, 500);
    }

    #[test]
    fn generate_css_uses_palette_colors() {
        let mut palettes = PalettesConfig::default();
        palettes.green.primary = "#00ff00".to_string();

        let css = generate_palette_css(&palettes);
        assert!(css.contains(".palette-green {"));
        assert!(css.contains("--palette-primary: #00ff00"));
    }

    #[test]
    fn generate_css_covers_every_palette() {
        let css = generate_palette_css(&PalettesConfig::default());
        for palette in Palette::ALL {
            assert!(css.contains(&format!(".{} {{", palette.class())));
        }
        assert!(css.contains("--palette-accent:"));
        assert!(css.contains("--palette-text:"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("builder.toml")).unwrap();
        assert_eq!(config.preview.theme, Theme::Professional);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("builder.toml");
        fs::write(
            &path,
            r#"
[preview]
palette = "purple"

[export]
page_size = "letter"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.preview.palette, Palette::Purple);
        assert_eq!(config.export.page_size, PageSize::Letter);
        // Unspecified values should be defaults
        assert_eq!(config.export.width, 800);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("builder.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("builder.toml");
        fs::write(
            &path,
            r#"
[preview.zoom]
step = 0
"#,
        )
        .unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[summary]
soft_limit = 500
warning_above = 400
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[summary]
warning_above = 300
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let summary = merged.get("summary").unwrap();
        assert_eq!(summary.get("warning_above").unwrap().as_integer(), Some(300));
        assert_eq!(summary.get("soft_limit").unwrap().as_integer(), Some(500));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r##"
[palettes.red]
accent = "#ff0000"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let red = merged.get("palettes").unwrap().get("red").unwrap();
        assert_eq!(red.get("accent").unwrap().as_str(), Some("#ff0000"));
        assert_eq!(red.get("primary").unwrap().as_str(), Some("#b91c1c"));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[export]
widht = 900
"#;
        let result: Result<BuilderConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_palette_rejected() {
        let toml_str = r##"
[palettes.teal]
primary = "#0ff"
accent = "#0ff"
text = "#000"
"##;
        let result: Result<BuilderConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_theme_value_rejected() {
        let toml_str = r#"
[preview]
theme = "retro"
"#;
        let result: Result<BuilderConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(BuilderConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zoom_range_must_be_whole_steps() {
        let mut config = BuilderConfig::default();
        config.preview.zoom.max = 155;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("whole number of steps"));
    }

    #[test]
    fn validate_zoom_default_on_grid() {
        let mut config = BuilderConfig::default();
        config.preview.zoom.default = 105;
        assert!(config.validate().is_err());
        config.preview.zoom.default = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_summary_bands_ordered() {
        let mut config = BuilderConfig::default();
        config.summary.warning_above = 450;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_export_scale() {
        let mut config = BuilderConfig::default();
        config.export.scale = 0.0;
        assert!(config.validate().is_err());
        config.export.scale = 4.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_file_suffix_is_filename_safe() {
        let mut config = BuilderConfig::default();
        config.export.file_suffix = "../cv".to_string();
        assert!(config.validate().is_err());
        config.export.file_suffix = "CV-2026".to_string();
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // resolve_config tests
    // =========================================================================

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config.export.width, 800);
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str(
            r#"
[summary]
warning_above = 900
"#,
        )
        .unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: BuilderConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = BuilderConfig::default();
        assert_eq!(config.preview.zoom, defaults.preview.zoom);
        assert_eq!(config.summary, defaults.summary);
        assert_eq!(config.notifications, defaults.notifications);
        assert_eq!(config.export.file_suffix, defaults.export.file_suffix);
        assert_eq!(config.palettes.orange.accent, defaults.palettes.orange.accent);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["preview", "summary", "notifications", "export", "palettes"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}

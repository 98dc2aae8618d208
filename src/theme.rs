//! Theme, palette, zoom, and preview-visibility selection.
//!
//! Theme and palette are independent enumerations: any theme pairs with any
//! palette and any value is reachable from any other in one step. They reach
//! the preview only as two classes on the rendered root (`theme-*`,
//! `palette-*`), so content generation never branches on them.
//!
//! Zoom is a percentage moved in fixed steps between two bounds. The bounds are
//! soft presentation limits: the preview scale is the only thing they affect.

use crate::config::ZoomConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseSelectionError {
    kind: &'static str,
    value: String,
    expected: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Professional,
    Creative,
    Minimal,
    Modern,
}

impl Theme {
    pub const ALL: [Theme; 4] = [
        Self::Professional,
        Self::Creative,
        Self::Minimal,
        Self::Modern,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Creative => "creative",
            Self::Minimal => "minimal",
            Self::Modern => "modern",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Creative => "Creative",
            Self::Minimal => "Minimal",
            Self::Modern => "Modern",
        }
    }

    /// Class applied to the rendered resume root.
    pub fn class(self) -> String {
        format!("theme-{}", self.id())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Theme {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| ParseSelectionError {
                kind: "theme",
                value: s.to_string(),
                expected: Self::ALL.map(Theme::id).join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Blue,
    Green,
    Purple,
    Red,
    Orange,
}

impl Palette {
    pub const ALL: [Palette; 5] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Red,
        Self::Orange,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Orange => "orange",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Purple => "Purple",
            Self::Red => "Red",
            Self::Orange => "Orange",
        }
    }

    pub fn class(self) -> String {
        format!("palette-{}", self.id())
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Palette {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| ParseSelectionError {
                kind: "palette",
                value: s.to_string(),
                expected: Self::ALL.map(Palette::id).join(", "),
            })
    }
}

/// Preview zoom as an integer percentage.
///
/// Always a multiple of `step` within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom {
    level: u16,
    min: u16,
    max: u16,
    step: u16,
}

impl Zoom {
    /// Zoom at the configured default, clamped and snapped onto the step grid.
    ///
    /// An inverted range collapses to `min`.
    pub fn new(config: &ZoomConfig) -> Self {
        let mut zoom = Self {
            level: config.min,
            min: config.min,
            max: config.max.max(config.min),
            step: config.step.max(1),
        };
        zoom.level = zoom.snap(config.default);
        zoom
    }

    fn snap(&self, level: u16) -> u16 {
        let clamped = level.clamp(self.min, self.max);
        self.min + (clamped - self.min) / self.step * self.step
    }

    pub fn level(self) -> u16 {
        self.level
    }

    /// CSS scale factor for the preview (`1.0` at 100%).
    pub fn scale(self) -> f64 {
        f64::from(self.level) / 100.0
    }

    /// Step up. Returns false when already at the upper bound.
    pub fn zoom_in(&mut self) -> bool {
        if self.level + self.step > self.max {
            return false;
        }
        self.level += self.step;
        true
    }

    /// Step down. Returns false when already at the lower bound.
    pub fn zoom_out(&mut self) -> bool {
        if self.level < self.min + self.step {
            return false;
        }
        self.level -= self.step;
        true
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(&ZoomConfig::default())
    }
}

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.level)
    }
}

/// Everything the user has picked that is not document content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub theme: Theme,
    pub palette: Palette,
    pub zoom: Zoom,
    pub preview_visible: bool,
}

impl Selection {
    pub fn new(theme: Theme, palette: Palette, zoom: Zoom) -> Self {
        Self {
            theme,
            palette,
            zoom,
            preview_visible: true,
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(Theme::Professional, Palette::Blue, Zoom::default())
    }
}

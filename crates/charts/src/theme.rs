// In crates/charts/src/theme.rs

//! Light and dark palettes for the results view.
//!
//! Series colours are the same in both modes; only the chrome (tooltips,
//! grid, ticks, legend) changes with the mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ParseThemeError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

/// What a dataset or data point represents, independent of any theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesRole {
    Equity,
    Drawdown,
    Cumulative,
    Positive,
    Negative,
    Neutral,
}

/// Sign-based emphasis for text such as P&L cells and metric tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    /// `>= 0` is positive, matching how P&L is coloured everywhere.
    pub fn of_sign(is_negative: bool) -> Self {
        if is_negative { Tone::Negative } else { Tone::Positive }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesColors {
    pub border: Color,
    pub fill: Color,
}

/// Resolved colours for one [`ThemeMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub tooltip_background: Color,
    pub tooltip_text: Color,
    pub tooltip_border: Color,
    pub grid: Color,
    pub ticks: Color,
    pub legend_text: Color,
    pub crosshair: Color,
    /// Text colour of non-negative P&L cells.
    pub positive_text: Color,
    pub negative_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            tooltip_background: Color::rgba(10, 19, 38, 0.95),
            tooltip_text: Color::rgb(0xe2, 0xe8, 0xf0),
            tooltip_border: Color::rgb(0x4f, 0x9c, 0xff),
            grid: Color::rgba(148, 163, 184, 0.1),
            ticks: Color::rgb(0x8e, 0xa1, 0xb5),
            legend_text: Color::rgb(0xe2, 0xe8, 0xf0),
            crosshair: Color::rgb(0x4f, 0x9c, 0xff),
            positive_text: Color::rgb(0x2d, 0xd3, 0x6f),
            negative_text: Color::rgb(0xef, 0x44, 0x44),
        }
    }

    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            tooltip_background: Color::rgba(255, 255, 255, 0.95),
            tooltip_text: Color::rgb(0x0f, 0x17, 0x2a),
            tooltip_border: Color::rgb(0x3b, 0x82, 0xf6),
            grid: Color::rgba(100, 116, 139, 0.1),
            ticks: Color::rgb(0x64, 0x74, 0x8b),
            legend_text: Color::rgb(0x0f, 0x17, 0x2a),
            ..Self::dark()
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Border and fill colours of a series role.
    pub fn series(&self, role: SeriesRole) -> SeriesColors {
        let (border, fill) = match role {
            SeriesRole::Equity => (Color::rgb(0x4f, 0x9c, 0xff), Color::rgba(79, 156, 255, 0.1)),
            SeriesRole::Drawdown => (Color::rgb(0xef, 0x44, 0x44), Color::rgba(239, 68, 68, 0.1)),
            SeriesRole::Cumulative => (Color::rgb(0x22, 0xd3, 0xee), Color::rgba(34, 211, 238, 0.1)),
            SeriesRole::Positive => (Color::rgb(0x22, 0xc5, 0x5e), Color::rgba(34, 197, 94, 0.8)),
            SeriesRole::Negative => (Color::rgb(0xef, 0x44, 0x44), Color::rgba(239, 68, 68, 0.8)),
            SeriesRole::Neutral => (Color::rgb(0x8e, 0xa1, 0xb5), Color::rgba(148, 163, 184, 0.8)),
        };
        SeriesColors { border, fill }
    }

    /// Text colour of a sign-based tone. Zero P&L is already `Tone::Positive`.
    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Positive => self.positive_text,
            Tone::Negative => self.negative_text,
            Tone::Neutral => self.ticks,
        }
    }
}

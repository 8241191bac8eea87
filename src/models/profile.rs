use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn palette(self) -> &'static ThemePalette {
        match self {
            Self::Light => &LIGHT_PALETTE,
            Self::Dark => &DARK_PALETTE,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    /// Accepts the bare literal or its JSON-quoted form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"') {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub background: &'static str,
    pub surface: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub text_muted: &'static str,
    pub empty: &'static str,
    pub button: &'static str,
    pub button_secondary: &'static str,
    pub tab_bar: &'static str,
    pub tab_inactive: &'static str,
    pub tab_active: &'static str,
}

pub static DARK_PALETTE: ThemePalette = ThemePalette {
    background: "#0d1117",
    surface: "#161b22",
    border: "#30363d",
    text: "#fff",
    text_secondary: "#8b949e",
    text_muted: "#666",
    empty: "#1e1e1e",
    button: "#238636",
    button_secondary: "#21262d",
    tab_bar: "#161b22",
    tab_inactive: "#8b949e",
    tab_active: "#fff",
};

pub static LIGHT_PALETTE: ThemePalette = ThemePalette {
    background: "#ffffff",
    surface: "#f6f8fa",
    border: "#d0d7de",
    text: "#1f2328",
    text_secondary: "#656d76",
    text_muted: "#999",
    empty: "#ebedf0",
    button: "#2da44e",
    button_secondary: "#f3f4f6",
    tab_bar: "#f6f8fa",
    tab_inactive: "#656d76",
    tab_active: "#1f2328",
};

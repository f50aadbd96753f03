use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TempUnit {
    #[default]
    C,
    F,
}

impl TempUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TempUnit::C => "C",
            TempUnit::F => "F",
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TempUnit::C => celsius,
            TempUnit::F => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

impl fmt::Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TempUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_uppercase().as_str() {
            "C" | "CELSIUS" => Ok(TempUnit::C),
            "F" | "FAHRENHEIT" => Ok(TempUnit::F),
            _ => Err(anyhow!("Unknown temperature unit '{value}'. Supported units: C, F.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow!("Unknown theme '{value}'. Supported themes: light, dark.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub temp_unit: TempUnit,
    pub theme: Theme,
    pub language: String,
    pub favorites: BTreeSet<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            temp_unit: TempUnit::default(),
            theme: Theme::default(),
            language: "en".to_string(),
            favorites: BTreeSet::new(),
        }
    }
}

impl UserPreferences {
    /// Add `name` if absent, remove it if present. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        if self.favorites.remove(name) {
            false
        } else {
            self.favorites.insert(name.to_string());
            true
        }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }
}

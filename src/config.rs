//! Configuration for region coloring
//!
//! Two sources are layered:
//!
//! - user settings from `~/.colored-regions.toml` (or
//!   `%USERPROFILE%\.colored-regions.toml` on Windows)
//! - a project override under the `coloredRegions` key of the workspace's
//!   `package.json`
//!
//! Both use the same shape:
//!
//! ```text
//! colorRange = ["rgba(255,0,0,0.1)", "rgba(0,255,0,0.1)"]
//!
//! [namedColors]
//! "My Color" = "#ff000033"
//! ```
//!
//! Loading never fails. A missing or malformed source counts as empty.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::color::strip_whitespace;
use crate::error::{RegionError, Result};

/// Key holding the override inside `package.json`
pub const PACKAGE_KEY: &str = "coloredRegions";

/// Named colors, indexed under loose spellings of each name
///
/// Inserting `"My Color"` also registers `"mycolor"`, `"my color"` and the
/// other trimmed/stripped/lowercased forms, unless a name already owns them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedColors {
    colors: HashMap<String, String>,
}

impl NamedColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named color, plus its loose spellings that are still free
    pub fn insert(&mut self, name: &str, color: &str) {
        self.colors.insert(name.to_string(), color.to_string());
        self.insert_variants(name, color);
    }

    fn insert_variants(&mut self, name: &str, color: &str) {
        let trimmed = name.trim();
        let stripped = strip_whitespace(name);
        let variants = [
            trimmed.to_string(),
            stripped.clone(),
            name.to_lowercase(),
            trimmed.to_lowercase(),
            stripped.to_lowercase(),
        ];
        for variant in variants {
            self.colors
                .entry(variant)
                .or_insert_with(|| color.to_string());
        }
    }

    /// Look up a color by exact key
    pub fn get(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(|s| s.as_str())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for NamedColors {
    /// Exact names are registered before any loose spelling
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries: Vec<(K, V)> = iter.into_iter().collect();
        let mut named = NamedColors::new();
        for (name, color) in &entries {
            named
                .colors
                .insert(name.as_ref().to_string(), color.as_ref().to_string());
        }
        for (name, color) in &entries {
            named.insert_variants(name.as_ref(), color.as_ref());
        }
        named
    }
}

/// Resolved configuration handed to the scanner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    named_colors: NamedColors,
    color_range: Vec<String>,
}

impl Configuration {
    pub fn new(named_colors: NamedColors, color_range: Vec<String>) -> Self {
        Self {
            named_colors,
            color_range,
        }
    }

    pub fn named_colors(&self) -> &NamedColors {
        &self.named_colors
    }

    pub fn named_colors_mut(&mut self) -> &mut NamedColors {
        &mut self.named_colors
    }

    /// Fallback palette, cycled for markers without a usable color
    pub fn color_range(&self) -> &[String] {
        &self.color_range
    }

    /// Load user settings and the workspace override, then merge them
    ///
    /// `settings_path` defaults to [`Settings::user_path`].
    pub fn load(settings_path: Option<&Path>, workspace: Option<&Path>) -> Self {
        let user = match settings_path {
            Some(path) => Settings::load_toml(path),
            None => Settings::user_path()
                .map(|path| Settings::load_toml(&path))
                .unwrap_or_default(),
        };
        let project = workspace
            .map(Settings::load_package_override)
            .unwrap_or_default();
        user.merge(project).into_configuration()
    }
}

/// Raw settings from a single source, before merging
///
/// Only string values survive; anything else in the source is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Named colors in source order
    pub named_colors: Option<Vec<(String, String)>>,
    /// Fallback palette
    pub color_range: Option<Vec<String>>,
}

impl Settings {
    /// Get the user settings file path
    pub fn user_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".colored-regions.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".colored-regions.toml"))
        }
    }

    /// Extract valid settings from an untyped value
    pub fn from_value(value: &Value) -> Self {
        let mut settings = Settings::default();
        let Some(object) = value.as_object() else {
            return settings;
        };

        if let Some(named) = object.get("namedColors").and_then(Value::as_object) {
            let entries = named
                .iter()
                .filter(|(name, _)| !name.is_empty())
                .filter_map(|(name, color)| match color.as_str() {
                    Some(color) if !color.is_empty() => Some((name.clone(), color.to_string())),
                    _ => None,
                })
                .collect();
            settings.named_colors = Some(entries);
        }

        if let Some(range) = object.get("colorRange").and_then(Value::as_array) {
            let colors = range
                .iter()
                .filter_map(Value::as_str)
                .filter(|color| !color.is_empty())
                .map(str::to_string)
                .collect();
            settings.color_range = Some(colors);
        }

        settings
    }

    /// Parse settings from TOML text
    pub fn parse_toml(contents: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(contents)?;
        let value = serde_json::to_value(table)?;
        Ok(Self::from_value(&value))
    }

    /// Parse the override section of a `package.json`
    pub fn parse_package_json(contents: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(contents)?;
        match json.get(PACKAGE_KEY) {
            Some(section) => Ok(Self::from_value(section)),
            None => Err(RegionError::Message(format!(
                "no `{}` key in package.json",
                PACKAGE_KEY
            ))),
        }
    }

    /// Load a TOML settings file, treating any failure as empty settings
    pub fn load_toml(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No user settings");
                return Settings::default();
            }
        };
        Self::parse_toml(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed settings file");
            Settings::default()
        })
    }

    /// Load the `package.json` override from a workspace directory
    ///
    /// Never fails: anything unexpected yields an empty override.
    pub fn load_package_override(workspace: &Path) -> Self {
        let path = workspace.join("package.json");
        let result = fs::read_to_string(&path)
            .map_err(RegionError::from)
            .and_then(|contents| Self::parse_package_json(&contents));
        match result {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No project override");
                Settings::default()
            }
        }
    }

    /// Layer an override on top of these settings
    ///
    /// Override named colors replace same-named entries; an override palette
    /// replaces the whole palette.
    pub fn merge(mut self, over: Settings) -> Settings {
        if let Some(over_named) = over.named_colors {
            let mut named = self.named_colors.take().unwrap_or_default();
            for (name, color) in over_named {
                match named.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(entry) => entry.1 = color,
                    None => named.push((name, color)),
                }
            }
            self.named_colors = Some(named);
        }
        if over.color_range.is_some() {
            self.color_range = over.color_range;
        }
        self
    }

    /// Build the scanner configuration, expanding loose color names
    pub fn into_configuration(self) -> Configuration {
        let named = self.named_colors.unwrap_or_default().into_iter().collect();
        Configuration::new(named, self.color_range.unwrap_or_default())
    }
}

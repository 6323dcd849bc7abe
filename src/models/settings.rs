use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pixel_dither::Configuration;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::SettingsError;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "PIXELFORGE_CONFIG";

/// Settings loaded from a YAML file.
///
/// ```yaml
/// defaults:
///   target_width: 128
///   target_height: 96
///   dither: floyd_steinberg
/// profiles:
///   gameboy:
///     dither: bayer4
///     palette: { kind: fixed, presets: [game_boy] }
/// ```
///
/// A profile only lists the fields it changes. Nested mappings merge key by
/// key over `defaults`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Configuration,

    #[serde(default)]
    pub profiles: BTreeMap<String, Mapping>,
}

impl Settings {
    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load an explicitly requested settings file. Any failure is an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            profiles = settings.profiles.len(),
            "Loaded settings"
        );
        Ok(settings)
    }

    /// Load `path`, falling back to defaults when it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(%e, "Failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    /// Settings from the file named by `PIXELFORGE_CONFIG`, if set.
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV).ok().map(PathBuf::from) {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// The configuration for `profile`, or the defaults when `None`.
    pub fn resolve(&self, profile: Option<&str>) -> Result<Configuration, SettingsError> {
        let Some(name) = profile else {
            return Ok(self.defaults.clone());
        };
        let overrides = self
            .profiles
            .get(name)
            .ok_or_else(|| SettingsError::UnknownProfile(name.to_string()))?;

        let mut merged = serde_yaml::to_value(&self.defaults)?;
        merge(&mut merged, Value::Mapping(overrides.clone()));
        let config = serde_yaml::from_value(merged)?;
        tracing::debug!(profile = name, "Resolved settings profile");
        Ok(config)
    }
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                if let Some(slot) = base.get_mut(&key) {
                    merge(slot, value);
                } else {
                    base.insert(key, value);
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

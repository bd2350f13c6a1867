use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Settings file read when no path is given
pub const DEFAULT_SETTINGS_FILE: &str = "discovery.yml";

/// Discovery registry settings, usually read from `discovery.yml`:
///
/// ```yaml
/// api_root: https://api.example.com/v1/
/// overlay:
///   - name: accounts
///     template: https://accounts.example.com/{accountNumber}
/// ```
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct DiscoverySettings {
    pub api_root: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlay: Vec<EntrySettings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub underlay: Vec<EntrySettings>,
}

/// A named URI template entry
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct EntrySettings {
    pub name: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DiscoverySettings {
    pub fn from_yaml_str(yml: &str) -> Result<Self, ConfigError> {
        let settings: DiscoverySettings = serde_yaml::from_str(yml)?;
        settings.check_duplicates()?;
        Ok(settings)
    }

    /// Read settings from `path`, or from [`DEFAULT_SETTINGS_FILE`]
    pub fn load(maybe_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = maybe_path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
        tracing::debug!(path = %path.display(), "loading discovery settings");
        let yml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yml)
    }

    pub fn api_root_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_root).map_err(|source| ConfigError::ApiRoot {
            url: self.api_root.clone(),
            source,
        })
    }

    fn check_duplicates(&self) -> Result<(), ConfigError> {
        for entries in [&self.overlay, &self.underlay] {
            let mut seen = HashSet::new();
            for entry in entries {
                if !seen.insert(entry.name.as_str()) {
                    return Err(ConfigError::DuplicateEntry(entry.name.clone()));
                }
            }
        }
        Ok(())
    }
}

//! Editor configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use celestia_session::{SessionOptions, MAX_TABS, WELCOME_CONTENT, WELCOME_NAME};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Maximum number of open tabs, welcome tab included
    pub max_tabs: usize,
    /// Name of the protected welcome tab
    pub welcome_name: String,
    /// Text the welcome tab starts with
    pub welcome_content: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("celestia.db"),
            max_tabs: MAX_TABS,
            welcome_name: WELCOME_NAME.to_string(),
            welcome_content: WELCOME_CONTENT.to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Celestia"))
            .unwrap_or_else(|| PathBuf::from(".celestia"))
    }

    /// Load configuration from a JSON file; a missing file yields defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;

        tracing::info!(path = %path.display(), "Loaded config");

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write then rename so a crash never leaves a half-written file
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tabs == 0 {
            return Err(CoreError::Config(
                "max_tabs must leave room for the welcome tab".to_string(),
            ));
        }
        if self.welcome_name.trim().is_empty() {
            return Err(CoreError::Config("welcome_name cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            max_tabs: self.max_tabs,
            welcome_name: self.welcome_name.trim().to_string(),
            welcome_content: self.welcome_content.clone(),
            ..SessionOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/celestia"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/celestia/celestia.db"));
        assert_eq!(config.max_tabs, 6);

        let options = config.session_options();
        assert_eq!(options, SessionOptions::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_tabs": 10}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_tabs, 10);
        assert_eq!(config.welcome_name, WELCOME_NAME);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::new(dir.path().to_path_buf());
        config.welcome_name = "Start.lua".to_string();

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{"max_tabs": 0}"#).unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::Config(_))));

        std::fs::write(&path, r#"{"welcome_name": "  "}"#).unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::Config(_))));

        std::fs::write(&path, "max_tabs = 3").unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::Serialization(_))));
    }
}

//! Configuration loading and management
//!
//! Handles parsing of the data directory's `config.toml`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::storage::Theme;
use crate::task::Priority;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Task defaults
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Viewer defaults
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks: TasksConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Task-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Priority assigned when `td task new` is called without --priority
    #[serde(default = "default_priority")]
    pub default_priority: String,
}

fn default_priority() -> String {
    "medium".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
        }
    }
}

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme used until prefs.json records a choice
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

impl Config {
    /// Load configuration from a `config.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join("config.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Typed default priority; validated values always parse
    pub fn default_priority(&self) -> Priority {
        self.tasks
            .default_priority
            .parse()
            .unwrap_or(Priority::Medium)
    }

    /// Typed default theme; validated values always parse
    pub fn default_theme(&self) -> Theme {
        self.ui.theme.parse().unwrap_or(Theme::Light)
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.tasks
            .default_priority
            .parse::<Priority>()
            .map_err(|_| {
                crate::error::Error::InvalidConfig(format!(
                    "tasks.default_priority: invalid priority '{}' (expected low|medium|high)",
                    self.tasks.default_priority
                ))
            })?;

        self.ui.theme.parse::<Theme>().map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "ui.theme: invalid theme '{}' (expected light|dark)",
                self.ui.theme
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.tasks.default_priority, "medium");
        assert_eq!(cfg.ui.theme, "light");
        assert_eq!(cfg.default_priority(), Priority::Medium);
        assert_eq!(cfg.default_theme(), Theme::Light);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let content = r#"
[tasks]
default_priority = "high"

[ui]
theme = "dark"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.default_priority(), Priority::High);
        assert_eq!(cfg.default_theme(), Theme::Dark);
    }

    #[test]
    fn invalid_priority_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tasks]\ndefault_priority = \"urgent\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_theme_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui]\ntheme = \"sepia\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.default_priority(), Priority::Medium);
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("default_priority = \"medium\""));
        assert!(written.contains("theme = \"light\""));
    }
}

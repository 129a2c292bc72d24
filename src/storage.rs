//! Storage layer for td
//!
//! All durable state lives under a single data directory:
//!
//! ```text
//! <data-dir>/              # platform data dir, or --data-dir / TD_DATA_DIR
//!   config.toml            # operator configuration
//!   accounts.json          # credential registry
//!   session                # active account username
//!   prefs.json             # display preferences
//!   tasks/
//!     <account>.json       # per-account task list, newest first
//! ```
//!
//! JSON files are written atomically (temp + rename); mutations go through
//! a `<file>.lock` advisory lock so overlapping invocations serialize.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

const CONFIG_FILE: &str = "config.toml";
const ACCOUNTS_FILE: &str = "accounts.json";
const SESSION_FILE: &str = "session";
const PREFS_FILE: &str = "prefs.json";
const TASKS_DIR: &str = "tasks";

/// Storage manager for the td data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at an explicit directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit flag/env value, or the
    /// platform-specific per-user data dir.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = data_dir {
            return Ok(Self::new(dir));
        }

        let dirs = directories::ProjectDirs::from("", "", "td")
            .ok_or(Error::DataDirUnavailable)?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Root of the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the operator configuration file
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Path to the credential registry
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir.join(ACCOUNTS_FILE)
    }

    /// Path to the active-session file
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// Path to the display preferences file
    pub fn prefs_file(&self) -> PathBuf {
        self.data_dir.join(PREFS_FILE)
    }

    /// Path to the per-account task file directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.data_dir.join(TASKS_DIR)
    }

    /// Path to one account's task file
    pub fn tasks_file(&self, account: &str) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", account_key(account)))
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Create the data directory skeleton
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(self.tasks_dir())?;
        Ok(())
    }

    /// Check whether the data directory has been initialized
    pub fn is_initialized(&self) -> bool {
        self.tasks_dir().exists()
    }

    /// Return an error unless `td init` has run for this directory
    pub fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized(self.data_dir.clone()))
        }
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Locked read-modify-write cycle over a JSON file
    ///
    /// Missing files start from `T::default()`. The mutated value is
    /// written atomically before the lock is released.
    pub fn update_json<T, R, F>(&self, path: &Path, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> Result<R>,
    {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let _lock = FileLock::acquire(lock::lock_path_for(path), DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut value = if path.exists() {
            self.read_json(path)?
        } else {
            T::default()
        };

        let result = f(&mut value)?;

        let json = serde_json::to_string_pretty(&value)?;
        lock::write_atomic(path, json.as_bytes())?;

        Ok(result)
    }

    // =========================================================================
    // Display preferences
    // =========================================================================

    /// Read the persisted display preferences, if any
    pub fn read_prefs(&self) -> Result<Option<Prefs>> {
        let path = self.prefs_file();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.read_json(&path)?))
    }

    /// Persist the display preferences
    pub fn write_prefs(&self, prefs: &Prefs) -> Result<()> {
        let json = serde_json::to_string_pretty(prefs)?;
        lock::write_atomic_locked(self.prefs_file(), json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }
}

/// Display theme for the viewer and any themed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::InvalidArgument(format!(
                "invalid theme '{other}' (expected light|dark)"
            ))),
        }
    }
}

/// Persisted display preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefs {
    pub theme: Theme,
}

/// Sanitize an account name for use as a file name
///
/// Mirrors the registry key: alphanumerics, `-`, and `_` pass through,
/// everything else maps to `_`.
pub fn account_key(account: &str) -> String {
    let mut key = String::new();
    for ch in account.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            key.push(ch);
        } else {
            key.push('_');
        }
    }
    if key.is_empty() {
        "_".to_string()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn storage_paths() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let storage = Storage::new(root.clone());

        assert_eq!(storage.config_file(), root.join("config.toml"));
        assert_eq!(storage.accounts_file(), root.join("accounts.json"));
        assert_eq!(storage.session_file(), root.join("session"));
        assert_eq!(storage.prefs_file(), root.join("prefs.json"));
        assert_eq!(storage.tasks_file("alice"), root.join("tasks/alice.json"));
    }

    #[test]
    fn init_creates_directories() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("data"));

        assert!(!storage.is_initialized());
        assert!(storage.require_initialized().is_err());

        storage.init().unwrap();

        assert!(storage.is_initialized());
        assert!(storage.tasks_dir().exists());
        storage.require_initialized().unwrap();
    }

    #[test]
    fn json_round_trip() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init().unwrap();

        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct TestData {
            name: String,
            value: i32,
        }

        let file = storage.data_dir().join("test.json");
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        storage.write_json(&file, &data).unwrap();
        let read_back: TestData = storage.read_json(&file).unwrap();

        assert_eq!(data, read_back);
    }

    #[test]
    fn update_json_starts_from_default() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init().unwrap();

        let file = storage.data_dir().join("list.json");

        let len = storage
            .update_json::<Vec<String>, _, _>(&file, |items| {
                items.push("first".to_string());
                Ok(items.len())
            })
            .unwrap();
        assert_eq!(len, 1);

        let len = storage
            .update_json::<Vec<String>, _, _>(&file, |items| {
                items.push("second".to_string());
                Ok(items.len())
            })
            .unwrap();
        assert_eq!(len, 2);

        let items: Vec<String> = storage.read_json(&file).unwrap();
        assert_eq!(items, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn prefs_round_trip() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init().unwrap();

        assert!(storage.read_prefs().unwrap().is_none());

        storage.write_prefs(&Prefs { theme: Theme::Dark }).unwrap();
        let prefs = storage.read_prefs().unwrap().expect("prefs written");
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.theme.toggled(), Theme::Light);
    }

    #[test]
    fn account_key_sanitizes() {
        assert_eq!(account_key("alice"), "alice");
        assert_eq!(account_key("alice.b@example"), "alice_b_example");
        assert_eq!(account_key(""), "_");
    }

    #[test]
    fn theme_parses_tokens() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("solarized".parse::<Theme>().is_err());
    }
}

//! YAML settings file.
//!
//! # Lookup order
//!
//! 1. An explicit path (`--settings <file>`); missing file is an error.
//! 2. `<home>/.wsops/settings.yaml` if it exists.
//! 3. Built-in defaults.
//!
//! Keys absent from the file keep their defaults, so a file may override a
//! single value.
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::types::ConflictPolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://api.fabric.microsoft.com/v1";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_SCOPE: &str = "https://api.fabric.microsoft.com/.default";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Committing all items from Fabric workspace to Git";
pub const DEFAULT_OUTPUT_FILE: &str = "linkedservice-config.json";

/// Timing of the long-running-operation poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Grace period between an accepted update and the first poll.
    pub initial_delay_secs: u64,
    pub interval_secs: u64,
    /// Upper bound on total polling time.
    pub timeout_secs: u64,
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: 20,
            interval_secs: 10,
            timeout_secs: 1800,
            max_attempts: None,
        }
    }
}

impl PollConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub authority_host: String,
    pub scope: String,
    pub request_timeout_secs: u64,
    pub poll: PollConfig,
    pub conflict_policy: ConflictPolicy,
    pub allow_override_items: bool,
    pub commit_message: String,
    pub output_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            request_timeout_secs: 120,
            poll: PollConfig::default(),
            conflict_policy: ConflictPolicy::default(),
            allow_override_items: true,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `<home>/.wsops/settings.yaml`: pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(".wsops").join("settings.yaml")
}

/// Parse a settings file.
pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Err(SettingsError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve settings for one invocation, following the lookup order above.
pub fn load_at(home: &Path, explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    let default_path = settings_path_at(home);
    if default_path.exists() {
        tracing::debug!(path = %default_path.display(), "loading settings");
        return load_from(&default_path);
    }
    Ok(Settings::default())
}

/// `load_at` convenience wrapper; falls back to defaults when no home
/// directory can be determined.
pub fn load(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    match dirs::home_dir() {
        Some(home) => load_at(&home, explicit),
        None => match explicit {
            Some(path) => load_from(path),
            None => Ok(Settings::default()),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(home: &TempDir, yaml: &str) -> PathBuf {
        let path = settings_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn defaults_when_no_file() {
        let home = TempDir::new().unwrap();
        let settings = load_at(home.path(), None).expect("load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.request_timeout(), Duration::from_secs(120));
        assert_eq!(settings.poll.initial_delay(), Duration::from_secs(20));
        assert_eq!(settings.poll.interval(), Duration::from_secs(10));
        assert_eq!(settings.conflict_policy, ConflictPolicy::PreferRemote);
        assert_eq!(settings.output_file, PathBuf::from("linkedservice-config.json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let home = TempDir::new().unwrap();
        write_settings(
            &home,
            "api_base_url: http://localhost:9000/v1\npoll:\n  interval_secs: 3\n",
        );
        let settings = load_at(home.path(), None).expect("load");
        assert_eq!(settings.api_base_url, "http://localhost:9000/v1");
        assert_eq!(settings.poll.interval_secs, 3);
        assert_eq!(settings.poll.initial_delay_secs, 20);
        assert_eq!(settings.scope, DEFAULT_SCOPE);
    }

    #[test]
    fn explicit_path_wins_over_home() {
        let home = TempDir::new().unwrap();
        write_settings(&home, "commit_message: from-home\n");
        let other = TempDir::new().unwrap();
        let explicit = other.path().join("ci.yaml");
        std::fs::write(&explicit, "commit_message: from-ci\nconflict_policy: PreferWorkspace\n")
            .unwrap();

        let settings = load_at(home.path(), Some(&explicit)).expect("load");
        assert_eq!(settings.commit_message, "from-ci");
        assert_eq!(settings.conflict_policy, ConflictPolicy::PreferWorkspace);
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let home = TempDir::new().unwrap();
        let err = load_at(home.path(), Some(&home.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, SettingsError::NotFound { .. }));
    }

    #[test]
    fn malformed_yaml_names_the_file() {
        let home = TempDir::new().unwrap();
        let path = write_settings(&home, "poll: [not, a, map\n");
        let err = load_at(home.path(), None).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn empty_file_is_defaults() {
        let home = TempDir::new().unwrap();
        write_settings(&home, "\n");
        assert_eq!(load_at(home.path(), None).unwrap(), Settings::default());
    }
}

//! `loan-cli.toml` settings.
//!
//! ## Format
//!
//! Every section and key is optional; missing values take the defaults shown.
//!
//! ```toml
//! [backend]
//! name = "http"
//! base_url = "http://localhost:8080"
//!
//! [session]
//! token_file = "~/.loan-cli/token"   # default: $HOME/.loan-cli/token
//!
//! [logging]
//! level = "warn"                      # any EnvFilter directive
//! file = "loan-cli.log"               # unset: no log file
//! ```
//!
//! Command-line flags override file values; `RUST_LOG` overrides the level.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use loan_core::api::{BackendConfig, DEFAULT_BASE_URL};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "loan-cli.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub backend: BackendSection,
    pub session: SessionSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSection {
    pub name: String,
    pub base_url: String,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            name: "http".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub base_url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] when `path` is `None`.
    ///
    /// An explicitly named file must exist; a missing default file just
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text, &path),
            Err(e) if e.kind() == ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    pub fn apply(
        mut self,
        overrides: Overrides,
    ) -> Self {
        if let Some(backend) = overrides.backend {
            self.backend.name = backend;
        }
        if let Some(url) = overrides.base_url {
            self.backend.base_url = url;
        }
        if let Some(token_file) = overrides.token_file {
            self.session.token_file = Some(token_file);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
        self
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            backend: self.backend.name.clone(),
            base_url: self.backend.base_url.clone(),
        }
    }

    /// Where the session token is kept between runs.
    pub fn token_file(&self) -> PathBuf {
        match &self.session.token_file {
            Some(path) => expand_home(path),
            None => home_dir()
                .map(|home| home.join(".loan-cli").join("token"))
                .unwrap_or_else(|| PathBuf::from(".loan-cli-token")),
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// Replaces a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn parse(text: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_toml(text, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend_config(), BackendConfig::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [backend]
            base_url = "https://loans.example.com"

            [logging]
            file = "cli.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.name, "http");
        assert_eq!(config.backend.base_url, "https://loans.example.com");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.file, Some(PathBuf::from("cli.log")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse("[backend]\nurl = \"x\"\n").unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("test.toml"));
    }

    #[test]
    fn overrides_win_over_file() {
        let config = parse("[backend]\nbase_url = \"http://file\"\n")
            .unwrap()
            .apply(Overrides {
                base_url: Some("http://flag".to_string()),
                log_level: Some("debug".to_string()),
                ..Overrides::default()
            });

        assert_eq!(config.backend.base_url, "http://flag");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let named = dir.path().join("absent.toml");

        assert!(matches!(
            AppConfig::load(Some(&named)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn load_reads_named_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loan-cli.toml");
        fs::write(&path, "[session]\ntoken_file = \"/tmp/tok\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.token_file(), PathBuf::from("/tmp/tok"));
    }
}

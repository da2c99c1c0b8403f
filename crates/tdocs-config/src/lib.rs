//! Configuration management for tdocs.
//!
//! Parses `tdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `content.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the served site directory.
    pub site_dir: Option<PathBuf>,
    /// Override the content store base URL.
    pub base_url: Option<String>,
    /// Override the visit storage file.
    pub storage_file: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tdocs.toml";

/// Default delay before the first-visit flag is written.
const DEFAULT_PERSIST_DELAY_SECS: u64 = 10;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content store configuration.
    pub content: ContentConfig,
    /// Visit flag configuration (paths are relative strings from TOML).
    visit: VisitConfigRaw,
    /// Entries listed on the documentation index page.
    pub index: Vec<IndexEntry>,

    /// Resolved site directory (set after loading).
    #[serde(skip)]
    pub site_dir: PathBuf,
    /// Resolved visit configuration (set after loading).
    #[serde(skip)]
    pub visit_resolved: VisitConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Site directory, relative to the config file.
    site_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            site_dir: None,
        }
    }
}

/// Content store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Base URL pages are fetched from (`{base_url}/pages/{id}.md`).
    pub base_url: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_owned(),
        }
    }
}

/// Raw visit configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VisitConfigRaw {
    storage_file: Option<String>,
    persist_delay_secs: Option<u64>,
}

/// Resolved visit flag configuration.
#[derive(Debug, Default)]
pub struct VisitConfig {
    /// File holding the persisted client storage.
    pub storage_file: PathBuf,
    /// Delay after startup before the first-visit flag is written.
    pub persist_delay: Duration,
}

/// A link on the documentation index page.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct IndexEntry {
    /// Link title.
    pub title: String,
    /// Page id the link points to (`/docs/{page}`).
    pub page: String,
}

impl IndexEntry {
    fn new(title: &str, page: &str) -> Self {
        Self {
            title: title.to_owned(),
            page: page.to_owned(),
        }
    }
}

/// Index entries used when the config lists none.
fn default_index() -> Vec<IndexEntry> {
    vec![
        IndexEntry::new("Commands", "commands"),
        IndexEntry::new("Quickstart", "quickstart"),
    ]
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.base_url`").
        field: String,
        /// Error message (e.g., "${`DOCS_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(site_dir) = &settings.site_dir {
            self.site_dir.clone_from(site_dir);
        }
        if let Some(base_url) = &settings.base_url {
            self.content.base_url.clone_from(base_url);
        }
        if let Some(storage_file) = &settings.storage_file {
            self.visit_resolved.storage_file.clone_from(storage_file);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfig::default(),
            visit: VisitConfigRaw::default(),
            index: default_index(),
            site_dir: base.join("site"),
            visit_resolved: VisitConfig {
                storage_file: base.join(".tdocs").join("storage.json"),
                persist_delay: Duration::from_secs(DEFAULT_PERSIST_DELAY_SECS),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        require_non_empty(&self.content.base_url, "content.base_url")?;
        require_http_url(&self.content.base_url, "content.base_url")?;

        for (i, entry) in self.index.iter().enumerate() {
            require_non_empty(&entry.title, &format!("index[{i}].title"))?;
            require_non_empty(&entry.page, &format!("index[{i}].page"))?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.content.base_url = expand::expand_env(&self.content.base_url, "content.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.site_dir = resolve(self.server.site_dir.as_deref(), "site");
        self.visit_resolved = VisitConfig {
            storage_file: resolve(
                self.visit.storage_file.as_deref(),
                ".tdocs/storage.json",
            ),
            persist_delay: Duration::from_secs(
                self.visit
                    .persist_delay_secs
                    .unwrap_or(DEFAULT_PERSIST_DELAY_SECS),
            ),
        };

        if self.index.is_empty() {
            self.index = default_index();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site_dir, PathBuf::from("/test/site"));
        assert_eq!(config.content.base_url, "http://127.0.0.1:8080");
        assert_eq!(
            config.visit_resolved.storage_file,
            PathBuf::from("/test/.tdocs/storage.json")
        );
        assert_eq!(config.visit_resolved.persist_delay, Duration::from_secs(10));
        assert_eq!(config.index, default_index());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_parse_index_entries() {
        let toml = r#"
[[index]]
title = "Modes"
page = "modes"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.index, vec![IndexEntry::new("Modes", "modes")]);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[server]
site_dir = "public"

[visit]
storage_file = "state/local.json"
persist_delay_secs = 3
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.site_dir, PathBuf::from("/project/public"));
        assert_eq!(
            config.visit_resolved.storage_file,
            PathBuf::from("/project/state/local.json")
        );
        assert_eq!(config.visit_resolved.persist_delay, Duration::from_secs(3));
        // Empty index falls back to the built-in entries
        assert_eq!(config.index, default_index());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[content]
base_url = "https://docs.example.com"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(config.content.base_url, "https://docs.example.com");
        assert_eq!(config.site_dir, tmp.path().join("site"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/tdocs.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));

        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            site_dir: Some(PathBuf::from("/srv/site")),
            base_url: Some("http://docs.local".to_owned()),
            storage_file: Some(PathBuf::from("/tmp/storage.json")),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.site_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.content.base_url, "http://docs.local");
        assert_eq!(
            config.visit_resolved.storage_file,
            PathBuf::from("/tmp/storage.json")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, config_before.server.host);
        assert_eq!(config.server.port, config_before.server.port);
        assert_eq!(config.site_dir, config_before.site_dir);
    }

    #[test]
    fn test_expand_env_vars_base_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_TDOCS_BASE_URL", "https://docs.test.com");
        }

        let toml = r#"
[content]
base_url = "${TEST_TDOCS_BASE_URL}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.content.base_url, "https://docs.test.com");

        unsafe {
            std::env::remove_var("TEST_TDOCS_BASE_URL");
        }
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config() {
        Config::default_with_base(Path::new("/test")).validate().unwrap();
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content.base_url = "ftp://docs".to_owned();
        assert_validation_error(&config, &["content.base_url", "http://"]);
    }

    #[test]
    fn test_validate_index_entry_page() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.index.push(IndexEntry::new("Broken", ""));
        assert_validation_error(&config, &["index[2].page"]);
    }
}

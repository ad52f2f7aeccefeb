//! Configuration management for docpub.
//!
//! Parses `docpub.toml` configuration files with serde and provides
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
//! - `confluence.base_url`
//! - `confluence.username`
//! - `confluence.api_token`
//! - `confluence.space_key`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override page-id cache file location.
    pub cache_file: Option<PathBuf>,
    /// Override target space key.
    pub space_key: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docpub.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    #[serde(default)]
    docs: DocsConfigRaw,
    /// Publishing behavior configuration.
    pub publishing: PublishingConfig,
    /// Declared page hierarchy (root page id + categories).
    pub hierarchy: HierarchyConfig,
    /// Confluence connection configuration.
    pub confluence: Option<ConfluenceConfig>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    cache_file: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Page-id cache file written at the end of each publish batch.
    pub cache_file: PathBuf,
}

/// Publishing behavior configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Title of the hierarchy root page.
    pub root_title: String,
    /// Skip creating/updating the root page itself.
    pub skip_root_page: bool,
    /// When a page is skipped by configuration, look up the existing remote
    /// page so its id can still parent the children.
    pub use_existing_pages: bool,
    /// Node titles excluded from publishing.
    pub excluded_titles: Vec<String>,
    /// Labels applied to every published page.
    pub labels: Vec<String>,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            root_title: "Documentation".to_owned(),
            skip_root_page: false,
            use_existing_pages: true,
            excluded_titles: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Declared page hierarchy: a root page id plus named categories.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Remote id of the hierarchy root page, if pre-existing.
    pub root_page_id: Option<String>,
    /// Named categories; each resolves to a parent page via its `parent`
    /// reference (`"root"` or another category name).
    pub categories: BTreeMap<String, CategoryConfig>,
}

/// A single hierarchy category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Parent reference: `"root"` or another category name.
    pub parent: String,
}

/// Confluence connection configuration.
#[derive(Debug, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence server base URL.
    pub base_url: String,
    /// Account username (or email for cloud instances).
    pub username: String,
    /// API token used with basic authentication.
    pub api_token: String,
    /// Target space key.
    pub space_key: String,
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.username, "confluence.username")?;
        require_non_empty(&self.api_token, "confluence.api_token")?;
        require_non_empty(&self.space_key, "confluence.space_key")?;
        Ok(())
    }
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
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
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
    /// Otherwise, searches for `docpub.toml` in current directory and parents.
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
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(cache_file) = &settings.cache_file {
            self.docs_resolved.cache_file.clone_from(cache_file);
        }
        if let Some(space_key) = &settings.space_key
            && let Some(confluence) = &mut self.confluence
        {
            confluence.space_key.clone_from(space_key);
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Returns the Confluence config if the `[confluence]` section is present
    /// and all fields are valid. Use this instead of accessing the `confluence`
    /// field directly when the command requires Confluence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation("[confluence] section required in config".into())
        })?;
        conf.validate()?;
        Ok(conf)
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
            docs: DocsConfigRaw::default(),
            publishing: PublishingConfig::default(),
            hierarchy: HierarchyConfig::default(),
            confluence: None,
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                cache_file: base.join(".docpub/page_id_cache.json"),
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

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. The `[confluence]`
    /// section is validated lazily via [`Config::require_confluence`] so
    /// offline commands can run without credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.publishing.root_title, "publishing.root_title")?;

        for (name, category) in &self.hierarchy.categories {
            require_non_empty(&category.parent, &format!("hierarchy.categories.{name}.parent"))?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.username = expand::expand_env(&confluence.username, "confluence.username")?;
            confluence.api_token =
                expand::expand_env(&confluence.api_token, "confluence.api_token")?;
            confluence.space_key =
                expand::expand_env(&confluence.space_key, "confluence.space_key")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            cache_file: resolve(self.docs.cache_file.as_deref(), ".docpub/page_id_cache.json"),
        };
    }
}

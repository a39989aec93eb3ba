//! Configuration management for the managed navigation engine.
//!
//! Parses `navtree.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The loaded [`Config`] is immutable: it is constructed once and handed to
//! the components that need content type ids, variant ids or request
//! parameter names.
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
//! - `links.base_url`
//! - `cache.dir`
//! - `repository.snapshot`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override repository snapshot path.
    pub snapshot: Option<PathBuf>,
    /// Override base URL used for absolute links.
    pub base_url: Option<String>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override maximum tree depth.
    pub max_depth: Option<u32>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "navtree.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content type ids of navigation items.
    pub content_types: ContentTypesConfig,
    /// Variant ids used while building the tree.
    pub variants: VariantsConfig,
    /// Request parameter names.
    pub request: RequestConfig,
    /// Tree building limits.
    pub tree: TreeConfig,
    /// Link rebuilding configuration.
    pub links: LinksConfig,
    /// Tree cache configuration (paths are relative strings from TOML).
    cache: CacheConfigRaw,
    /// Repository configuration (paths are relative strings from TOML).
    repository: RepositoryConfigRaw,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Resolved repository configuration (set after loading).
    #[serde(skip)]
    pub repository_resolved: RepositoryConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Content type ids that identify navigation items in the repository.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentTypesConfig {
    /// Content type of the tree root ("navtree").
    pub navtree: u64,
    /// Content type of ordinary navigation nodes ("navon").
    pub navon: u64,
}

impl Default for ContentTypesConfig {
    fn default() -> Self {
        Self {
            navtree: 311,
            navon: 310,
        }
    }
}

/// Variant ids used to read node details.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VariantsConfig {
    /// Variant that renders a node's landing page, images and theme.
    pub info: u64,
}

impl Default for VariantsConfig {
    fn default() -> Self {
        Self { info: 510 }
    }
}

/// Names of request parameters consumed by the navigation engine.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Parameter carrying an explicit theme.
    pub theme_param: String,
    /// Parameter carrying the variable selector.
    pub variable_selector_param: String,
    /// Parameter carrying the image selector.
    pub image_selector_param: String,
    /// Parameter carrying the session id.
    pub session_param: String,
    /// Command value that puts a request in "edit related content" mode.
    pub edit_related_command: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            theme_param: "nav_theme".to_owned(),
            variable_selector_param: "nav_variableselector".to_owned(),
            image_selector_param: "nav_imageselector".to_owned(),
            session_param: "pssessionid".to_owned(),
            edit_related_command: "editrc".to_owned(),
        }
    }
}

/// Tree building limits.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum absolute level to descend to (unlimited when unset).
    pub max_depth: Option<u32>,
}

/// Link rebuilding configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Base URL that relative link templates are resolved against.
    pub base_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9992/Rhythmyx".to_owned(),
        }
    }
}

/// Raw cache configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved tree cache configuration.
#[derive(Debug, Default)]
pub struct CacheConfig {
    /// Whether built trees are cached.
    pub enabled: bool,
    /// Directory for the file cache. `None` keeps trees in memory.
    pub dir: Option<PathBuf>,
}

/// Raw repository configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RepositoryConfigRaw {
    snapshot: Option<String>,
}

/// Resolved repository configuration with absolute paths.
#[derive(Debug, Default)]
pub struct RepositoryConfig {
    /// YAML snapshot of the navigation content.
    pub snapshot: PathBuf,
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
        /// Config field path (e.g., "`links.base_url`").
        field: String,
        /// Error message (e.g., "${`CMS_URL`} not set").
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
    /// Otherwise, searches for `navtree.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
        if let Some(snapshot) = &settings.snapshot {
            self.repository_resolved.snapshot.clone_from(snapshot);
        }
        if let Some(base_url) = &settings.base_url {
            self.links.base_url.clone_from(base_url);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(max_depth) = settings.max_depth {
            self.tree.max_depth = Some(max_depth);
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
            content_types: ContentTypesConfig::default(),
            variants: VariantsConfig::default(),
            request: RequestConfig::default(),
            tree: TreeConfig::default(),
            links: LinksConfig::default(),
            cache: CacheConfigRaw::default(),
            repository: RepositoryConfigRaw::default(),
            cache_resolved: CacheConfig {
                enabled: true,
                dir: None,
            },
            repository_resolved: RepositoryConfig {
                snapshot: base.join("navigation.yaml"),
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
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content_types()?;
        self.validate_request()?;
        self.validate_links()?;
        self.validate_tree()?;
        Ok(())
    }

    fn validate_content_types(&self) -> Result<(), ConfigError> {
        let types = &self.content_types;
        if types.navtree == 0 || types.navon == 0 {
            return Err(ConfigError::Validation(
                "content_types.navtree and content_types.navon must be set".to_owned(),
            ));
        }
        if types.navtree == types.navon {
            return Err(ConfigError::Validation(
                "content_types.navtree and content_types.navon must differ".to_owned(),
            ));
        }
        if self.variants.info == 0 {
            return Err(ConfigError::Validation(
                "variants.info must be set".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_request(&self) -> Result<(), ConfigError> {
        let request = &self.request;
        require_non_empty(&request.theme_param, "request.theme_param")?;
        require_non_empty(
            &request.variable_selector_param,
            "request.variable_selector_param",
        )?;
        require_non_empty(&request.image_selector_param, "request.image_selector_param")?;
        require_non_empty(&request.session_param, "request.session_param")?;
        require_non_empty(&request.edit_related_command, "request.edit_related_command")?;
        Ok(())
    }

    fn validate_links(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.links.base_url, "links.base_url")?;
        require_http_url(&self.links.base_url, "links.base_url")?;
        Ok(())
    }

    fn validate_tree(&self) -> Result<(), ConfigError> {
        if self.tree.max_depth == Some(0) {
            return Err(ConfigError::Validation(
                "tree.max_depth must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.links.base_url = expand::expand_env(&self.links.base_url, "links.base_url")?;
        expand::expand_opt(&mut self.cache.dir, "cache.dir")?;
        expand::expand_opt(&mut self.repository.snapshot, "repository.snapshot")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: self.cache.dir.as_deref().map(|dir| config_dir.join(dir)),
        };
        self.repository_resolved = RepositoryConfig {
            snapshot: config_dir.join(
                self.repository
                    .snapshot
                    .as_deref()
                    .unwrap_or("navigation.yaml"),
            ),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.content_types.navtree, 311);
        assert_eq!(config.content_types.navon, 310);
        assert_eq!(config.variants.info, 510);
        assert_eq!(config.request.session_param, "pssessionid");
        assert_eq!(config.request.edit_related_command, "editrc");
        assert_eq!(
            config.repository_resolved.snapshot,
            PathBuf::from("/test/navigation.yaml")
        );
        assert!(config.cache_resolved.enabled);
        assert!(config.cache_resolved.dir.is_none());
        assert!(config.tree.max_depth.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.content_types.navtree, 311);
        assert_eq!(config.links.base_url, "http://127.0.0.1:9992/Rhythmyx");
    }

    #[test]
    fn test_parse_content_types() {
        let toml = r"
[content_types]
navtree = 7
navon = 8

[variants]
info = 42
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.content_types.navtree, 7);
        assert_eq!(config.content_types.navon, 8);
        assert_eq!(config.variants.info, 42);
    }

    #[test]
    fn test_parse_request_names() {
        let toml = r#"
[request]
theme_param = "theme"
session_param = "sid"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.request.theme_param, "theme");
        assert_eq!(config.request.session_param, "sid");
        // Unset names keep their defaults
        assert_eq!(config.request.image_selector_param, "nav_imageselector");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[cache]
enabled = false
dir = ".nav/cache"

[repository]
snapshot = "content/nav.yaml"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert!(!config.cache_resolved.enabled);
        assert_eq!(
            config.cache_resolved.dir,
            Some(PathBuf::from("/project/.nav/cache"))
        );
        assert_eq!(
            config.repository_resolved.snapshot,
            PathBuf::from("/project/content/nav.yaml")
        );
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert!(config.cache_resolved.enabled);
        assert!(config.cache_resolved.dir.is_none());
        assert_eq!(
            config.repository_resolved.snapshot,
            PathBuf::from("/project/navigation.yaml")
        );
    }

    #[test]
    fn test_apply_cli_settings_snapshot() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            snapshot: Some(PathBuf::from("/other/nav.yaml")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.repository_resolved.snapshot,
            PathBuf::from("/other/nav.yaml")
        );
        assert!(config.cache_resolved.enabled); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            base_url: Some("https://cms.example.com".to_owned()),
            cache_enabled: Some(false),
            max_depth: Some(3),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.links.base_url, "https://cms.example.com");
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.tree.max_depth, Some(3));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.links.base_url, "http://127.0.0.1:9992/Rhythmyx");
        assert!(config.tree.max_depth.is_none());
    }

    #[test]
    fn test_expand_env_vars_links() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("NAV_TEST_CMS_URL", "https://cms.test.com");
        }

        let toml = r#"
[links]
base_url = "${NAV_TEST_CMS_URL}/Rhythmyx"

[repository]
snapshot = "${NAV_TEST_SNAPSHOT:-nav.yaml}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.links.base_url, "https://cms.test.com/Rhythmyx");
        assert_eq!(config.repository.snapshot.as_deref(), Some("nav.yaml"));

        unsafe {
            std::env::remove_var("NAV_TEST_CMS_URL");
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[content_types]
navtree = 20
navon = 21

[repository]
snapshot = "nav.yaml"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_types.navtree, 20);
        assert_eq!(config.repository_resolved.snapshot, dir.path().join("nav.yaml"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/navtree.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            base_url: Some("ftp://cms".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(err.to_string().contains("links.base_url"));
    }

    // Validation tests

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
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_same_content_types() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_types.navon = config.content_types.navtree;
        assert_validation_error(&config, &["must differ"]);
    }

    #[test]
    fn test_validate_zero_content_type() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_types.navtree = 0;
        assert_validation_error(&config, &["content_types.navtree"]);
    }

    #[test]
    fn test_validate_zero_info_variant() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.variants.info = 0;
        assert_validation_error(&config, &["variants.info"]);
    }

    #[test]
    fn test_validate_empty_session_param() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.request.session_param = String::new();
        assert_validation_error(&config, &["request.session_param", "empty"]);
    }

    #[test]
    fn test_validate_base_url_invalid_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.links.base_url = "cms.example.com".to_owned();
        assert_validation_error(&config, &["links.base_url", "http://"]);
    }

    #[test]
    fn test_validate_max_depth_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.tree.max_depth = Some(0);
        assert_validation_error(&config, &["tree.max_depth"]);
    }
}

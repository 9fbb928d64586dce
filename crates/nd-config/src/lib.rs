//! Configuration management for notedown.
//!
//! Parses `notedown.toml` configuration files with serde and provides
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
//! - `notion.token`
//! - `notion.root_page`
//! - `github.repo`
//! - `github.token`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use nd_render::RenderOptions;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "notedown.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the root page id.
    pub root_page: Option<String>,
    /// Override the sync-state file path.
    pub state_file: Option<String>,
    /// Override the watch interval in minutes.
    pub interval_minutes: Option<u64>,
    /// Override the local output directory (selects the filesystem sink).
    pub base_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notion source configuration.
    pub notion: Option<NotionConfig>,
    /// GitHub sink configuration. When present, output goes to a repository.
    pub github: Option<GithubConfig>,
    /// Output layout configuration.
    pub output: OutputConfig,
    /// Renderer options, passed through to the render core.
    pub render: RenderOptions,
    /// Sync driver configuration.
    pub sync: SyncConfig,

    /// Resolved local output directory (set after loading).
    #[serde(skip)]
    pub base_dir_resolved: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Notion source configuration.
#[derive(Debug, Deserialize)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// Root page id to mirror.
    pub root_page: String,
    /// Notion-Version header override.
    #[serde(default)]
    pub api_version: Option<String>,
}

impl NotionConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.token, "notion.token")?;
        require_non_empty(&self.root_page, "notion.root_page")?;
        Ok(())
    }
}

/// GitHub sink configuration.
#[derive(Debug, Deserialize)]
pub struct GithubConfig {
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Access token with contents write permission.
    pub token: String,
    /// Target branch.
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_owned()
}

impl GithubConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a field is empty or the repo is
    /// not in `owner/name` form.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.repo, "github.repo")?;
        require_non_empty(&self.token, "github.token")?;
        require_non_empty(&self.branch, "github.branch")?;
        let mut parts = self.repo.splitn(2, '/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if owner.is_empty() || name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "github.repo must be in owner/name form, got \"{}\"",
                self.repo
            )));
        }
        Ok(())
    }
}

/// Output layout configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Local directory to mirror into (selects the filesystem sink when no
    /// `[github]` section is present).
    pub base_dir: Option<String>,
    /// Directory prefix for rendered documents.
    pub posts_dir: String,
    /// Directory prefix for re-hosted images.
    pub images_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            posts_dir: "notion".to_owned(),
            images_dir: "images".to_owned(),
        }
    }
}

/// Sync driver configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Path of the JSON sync-state file.
    pub state_file: String,
    /// Poll interval for `notedown watch`, in minutes.
    pub interval_minutes: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            state_file: ".notedown-state.json".to_owned(),
            interval_minutes: 30,
        }
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
        /// Config field path (e.g., "`notion.token`").
        field: String,
        /// Error message (e.g., "${`NOTION_TOKEN`} not set").
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

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `notedown.toml` in current directory and
    /// parents, falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist or parsing
    /// fails.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root_page) = &settings.root_page {
            match &mut self.notion {
                Some(notion) => notion.root_page.clone_from(root_page),
                None => {
                    self.notion = Some(NotionConfig {
                        token: String::new(),
                        root_page: root_page.clone(),
                        api_version: None,
                    });
                }
            }
        }
        if let Some(state_file) = &settings.state_file {
            self.sync.state_file.clone_from(state_file);
        }
        if let Some(interval) = settings.interval_minutes {
            self.sync.interval_minutes = interval;
        }
        if let Some(base_dir) = &settings.base_dir {
            self.base_dir_resolved = Some(base_dir.clone());
        }
    }

    /// Get validated Notion configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or
    /// invalid.
    pub fn require_notion(&self) -> Result<&NotionConfig, ConfigError> {
        let notion = self.notion.as_ref().ok_or_else(|| {
            ConfigError::Validation("[notion] section required in config".into())
        })?;
        notion.validate()?;
        Ok(notion)
    }

    /// Get validated GitHub configuration, if the section is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is present but
    /// invalid.
    pub fn github_validated(&self) -> Result<Option<&GithubConfig>, ConfigError> {
        match &self.github {
            Some(github) => {
                github.validate()?;
                Ok(Some(github))
            }
            None => Ok(None),
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.interval_minutes == 0 {
            return Err(ConfigError::Validation(
                "sync.interval_minutes must be greater than 0".to_owned(),
            ));
        }
        require_non_empty(&self.sync.state_file, "sync.state_file")?;
        Ok(())
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.base_dir_resolved = config
            .output
            .base_dir
            .as_deref()
            .map(|dir| config_dir.join(dir));
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut notion) = self.notion {
            notion.token = expand::expand_env(&notion.token, "notion.token")?;
            notion.root_page = expand::expand_env(&notion.root_page, "notion.root_page")?;
        }
        if let Some(ref mut github) = self.github {
            github.repo = expand::expand_env(&github.repo, "github.repo")?;
            github.token = expand::expand_env(&github.token, "github.token")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use nd_render::{HeadingLevels, PostFormat};

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.notion.is_none());
        assert!(config.github.is_none());
        assert_eq!(config.output.posts_dir, "notion");
        assert_eq!(config.output.images_dir, "images");
        assert_eq!(config.sync.state_file, ".notedown-state.json");
        assert_eq!(config.sync.interval_minutes, 30);
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.notion.is_none());
        assert_eq!(config.sync.interval_minutes, 30);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[notion]
token = "secret"
root_page = "abc123"

[github]
repo = "octo/blog"
token = "ghp_x"
branch = "source"

[output]
posts_dir = "source/_posts"
images_dir = "source/images"

[render]
heading_levels = "uniform"
nested_list_indent = true
post_format = "blog"

[sync]
state_file = "state.json"
interval_minutes = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let notion = config.notion.as_ref().unwrap();
        assert_eq!(notion.token, "secret");
        assert_eq!(notion.root_page, "abc123");
        let github = config.github.as_ref().unwrap();
        assert_eq!(github.repo, "octo/blog");
        assert_eq!(github.branch, "source");
        assert_eq!(config.output.posts_dir, "source/_posts");
        assert_eq!(config.render.heading_levels, HeadingLevels::Uniform);
        assert!(config.render.nested_list_indent);
        assert_eq!(config.render.post_format, PostFormat::Blog);
        assert_eq!(config.sync.interval_minutes, 10);
    }

    #[test]
    fn test_github_branch_defaults_to_main() {
        let toml = r#"
[github]
repo = "octo/blog"
token = "t"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.github.unwrap().branch, "main");
    }

    #[test]
    fn test_require_notion_missing_section() {
        let config = Config::default();
        let err = config.require_notion().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("[notion]"));
    }

    #[test]
    fn test_require_notion_empty_token() {
        let mut config = Config::default();
        config.notion = Some(NotionConfig {
            token: String::new(),
            root_page: "abc".to_owned(),
            api_version: None,
        });
        let err = config.require_notion().unwrap_err();
        assert!(err.to_string().contains("notion.token"));
    }

    #[test]
    fn test_github_repo_shape_validation() {
        let config = GithubConfig {
            repo: "not-a-repo".to_owned(),
            token: "t".to_owned(),
            branch: "main".to_owned(),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("owner/name"));
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = Config::default();
        config.sync.interval_minutes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval_minutes"));
    }

    #[test]
    fn test_apply_cli_settings_root_page() {
        let mut config = Config::default();
        config.notion = Some(NotionConfig {
            token: "t".to_owned(),
            root_page: "old".to_owned(),
            api_version: None,
        });
        config.apply_cli_settings(&CliSettings {
            root_page: Some("new".to_owned()),
            ..CliSettings::default()
        });
        assert_eq!(config.notion.unwrap().root_page, "new");
    }

    #[test]
    fn test_apply_cli_settings_state_and_interval() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            state_file: Some("custom.json".to_owned()),
            interval_minutes: Some(5),
            ..CliSettings::default()
        });
        assert_eq!(config.sync.state_file, "custom.json");
        assert_eq!(config.sync.interval_minutes, 5);
    }

    #[test]
    fn test_apply_cli_settings_base_dir() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            base_dir: Some(PathBuf::from("/out")),
            ..CliSettings::default()
        });
        assert_eq!(config.base_dir_resolved, Some(PathBuf::from("/out")));
    }

    #[test]
    fn test_apply_cli_settings_empty_is_noop() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.sync.interval_minutes, 30);
        assert!(config.notion.is_none());
    }

    #[test]
    fn test_load_from_file_resolves_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notedown.toml");
        std::fs::write(
            &path,
            r#"
[output]
base_dir = "mirror"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.base_dir_resolved, Some(dir.path().join("mirror")));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        let err = Config::load(Some(Path::new("/nonexistent/notedown.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_expand_env_vars_notion_token() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("ND_TEST_TOKEN", "from-env");
        }
        let toml = r#"
[notion]
token = "${ND_TEST_TOKEN}"
root_page = "abc"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.notion.unwrap().token, "from-env");
        unsafe {
            std::env::remove_var("ND_TEST_TOKEN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("ND_TEST_MISSING_TOKEN");
        }
        let toml = r#"
[github]
repo = "o/r"
token = "${ND_TEST_MISSING_TOKEN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("github.token"));
        assert!(err.to_string().contains("ND_TEST_MISSING_TOKEN"));
    }

    #[test]
    fn test_github_validated_none_when_absent() {
        let config = Config::default();
        assert!(config.github_validated().unwrap().is_none());
    }

    #[test]
    fn test_github_validated_rejects_bad_section() {
        let mut config = Config::default();
        config.github = Some(GithubConfig {
            repo: "o/r".to_owned(),
            token: String::new(),
            branch: "main".to_owned(),
        });
        assert!(config.github_validated().is_err());
    }
}

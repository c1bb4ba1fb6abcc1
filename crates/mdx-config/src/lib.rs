//! Configuration management for MDX content tools.
//!
//! Parses `mdx.toml` files with serde and discovers them in the current
//! directory or its parents. Every section and key is optional:
//!
//! ```toml
//! [content]
//! dir = "${SITE_ROOT:-.}/content"
//! posts_dir = "posts"
//! extension = "mdx"
//!
//! [render]
//! excerpt_max_length = 150
//! words_per_minute = 225
//!
//! [components]
//! categories = ["visualizations", "charts", "common"]
//! ```
//!
//! `content.dir` supports `~`, `${VAR}` and `${VAR:-default}` expansion and
//! is resolved relative to the config file. CLI settings are applied after
//! loading via [`CliSettings`].

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdx.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub content_dir: Option<PathBuf>,
    pub excerpt_max_length: Option<usize>,
    pub words_per_minute: Option<u32>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content: ContentConfig,
    pub render: RenderConfig,
    pub components: ComponentsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Content layout. Subdirectories are relative to the content root.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root as written in the config file.
    pub dir: String,
    pub posts_dir: String,
    pub pages_dir: String,
    pub components_dir: String,
    pub data_dir: String,
    /// Document file extension without the dot.
    pub extension: String,
    /// Index file written by index generation.
    pub index_file: String,

    /// Resolved content root (set after loading).
    #[serde(skip)]
    pub root: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: "content".to_owned(),
            posts_dir: "posts".to_owned(),
            pages_dir: "pages".to_owned(),
            components_dir: "components".to_owned(),
            data_dir: "data".to_owned(),
            extension: "mdx".to_owned(),
            index_file: "index.json".to_owned(),
            root: PathBuf::from("content"),
        }
    }
}

/// Derived metadata settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub excerpt_max_length: usize,
    pub words_per_minute: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            excerpt_max_length: 150,
            words_per_minute: 225,
        }
    }
}

/// Installed component layout: `<components_dir>/<category>/<Name>.<extension>`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    pub categories: Vec<String>,
    pub extension: String,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                "visualizations".to_owned(),
                "charts".to_owned(),
                "common".to_owned(),
            ],
            extension: "jsx".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Validation(String),

    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_positive(value: u64, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `mdx.toml` in the current directory and its parents, falling back
    /// to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading and the result is validated.
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
            let cwd = std::env::current_dir().unwrap_or_default();
            Self::default_with_base(&cwd)
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Parse TOML content, resolving paths against `config_dir`.
    pub fn parse(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve_paths(config_dir)?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive(
            self.render.excerpt_max_length as u64,
            "render.excerpt_max_length",
        )?;
        require_positive(
            u64::from(self.render.words_per_minute),
            "render.words_per_minute",
        )?;
        require_non_empty(&self.content.extension, "content.extension")?;
        require_non_empty(&self.components.extension, "components.extension")?;
        for category in &self.components.categories {
            require_non_empty(category, "components.categories")?;
        }
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

    fn default_with_base(base: &Path) -> Self {
        let mut config = Self::default();
        config.content.root = base.join(&config.content.dir);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::parse(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let dir = expand::expand_path(&self.content.dir, "content.dir")?;
        self.content.root = config_dir.join(dir);
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.content.root.clone_from(content_dir);
        }
        if let Some(excerpt_max_length) = settings.excerpt_max_length {
            self.render.excerpt_max_length = excerpt_max_length;
        }
        if let Some(words_per_minute) = settings.words_per_minute {
            self.render.words_per_minute = words_per_minute;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));
        assert_eq!(config.content.root, PathBuf::from("/site/content"));
        assert_eq!(config.content.posts_dir, "posts");
        assert_eq!(config.content.pages_dir, "pages");
        assert_eq!(config.content.components_dir, "components");
        assert_eq!(config.content.data_dir, "data");
        assert_eq!(config.content.index_file, "index.json");
        assert_eq!(config.render.excerpt_max_length, 150);
        assert_eq!(config.render.words_per_minute, 225);
        assert_eq!(
            config.components.categories,
            ["visualizations", "charts", "common"]
        );
        assert_eq!(config.components.extension, "jsx");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("", Path::new("/site")).unwrap();
        assert_eq!(config.content.root, PathBuf::from("/site/content"));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_all_sections() {
        let toml = r#"
[content]
dir = "blog"
posts_dir = "articles"
extension = "md"
index_file = "site-index.json"

[render]
excerpt_max_length = 80
words_per_minute = 200

[components]
categories = ["widgets"]
extension = "tsx"
"#;
        let config = Config::parse(toml, Path::new("/site")).unwrap();
        assert_eq!(config.content.root, PathBuf::from("/site/blog"));
        assert_eq!(config.content.posts_dir, "articles");
        assert_eq!(config.content.pages_dir, "pages");
        assert_eq!(config.content.extension, "md");
        assert_eq!(config.content.index_file, "site-index.json");
        assert_eq!(config.render.excerpt_max_length, 80);
        assert_eq!(config.render.words_per_minute, 200);
        assert_eq!(config.components.categories, ["widgets"]);
        assert_eq!(config.components.extension, "tsx");
    }

    #[test]
    fn test_absolute_content_dir() {
        let config = Config::parse("[content]\ndir = \"/srv/content\"", Path::new("/site")).unwrap();
        assert_eq!(config.content.root, PathBuf::from("/srv/content"));
    }

    #[test]
    fn test_content_dir_env_default() {
        let toml = "[content]\ndir = \"${MDX_CONFIG_TEST_UNSET_ROOT:-fallback}/content\"";
        let config = Config::parse(toml, Path::new("/site")).unwrap();
        assert_eq!(config.content.root, PathBuf::from("/site/fallback/content"));
    }

    #[test]
    fn test_content_dir_unset_env_is_error() {
        let toml = "[content]\ndir = \"${MDX_CONFIG_TEST_UNSET_ROOT}\"";
        let err = Config::parse(toml, Path::new("/site")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[render\n", Path::new("/site")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_wrong_type() {
        let err = Config::parse("[render]\nwords_per_minute = \"fast\"", Path::new("/")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_zero_words_per_minute() {
        let config = Config::parse("[render]\nwords_per_minute = 0", Path::new("/")).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.words_per_minute"));
    }

    #[test]
    fn test_validate_zero_excerpt_length() {
        let config = Config::parse("[render]\nexcerpt_max_length = 0", Path::new("/")).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_category() {
        let config =
            Config::parse("[components]\ncategories = [\"charts\", \"\"]", Path::new("/")).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("components.categories"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.apply_cli_settings(&CliSettings {
            content_dir: Some(PathBuf::from("/elsewhere")),
            words_per_minute: Some(300),
            ..Default::default()
        });
        assert_eq!(config.content.root, PathBuf::from("/elsewhere"));
        assert_eq!(config.render.words_per_minute, 300);
        assert_eq!(config.render.excerpt_max_length, 150);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nexcerpt_max_length = 99\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.content.root, temp.path().join("content"));
        assert_eq!(config.render.excerpt_max_length, 99);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/mdx.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_cli_settings() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            excerpt_max_length: Some(0),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}

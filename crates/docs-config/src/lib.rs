//! Configuration for the documentation builder.
//!
//! Reads `docs.toml` (given explicitly or discovered in the current
//! directory and its parents), applies command-line overrides from
//! [`CliSettings`], and produces the immutable [`BuildContext`] the rest of
//! the build reads.
//!
//! ```toml
//! [docs]
//! source_dir = "docs"
//! cache_enabled = true
//!
//! [output]
//! dir = "${BUILD_DIR:-docs/html}"
//!
//! [toc]
//! max_depth = 2
//!
//! [site]
//! name = "Acme Handbook"
//! ```
//!
//! `docs.source_dir` and `output.dir` support `${VAR}` and
//! `${VAR:-default}` expansion.

mod context;
mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use context::{BuildContext, DEFAULT_TOC_MAX_DEPTH, normalize_sub_path};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docs.toml";

/// Command-line values that take precedence over `docs.toml`.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Restrict the build to one subtree.
    pub sub_path: Option<String>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Parsed `docs.toml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    docs: DocsConfigRaw,
    output: OutputConfigRaw,
    /// Table of contents defaults.
    pub toc: TocConfig,
    /// Site presentation settings.
    pub site: SiteConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Sub-path restriction from the command line.
    #[serde(skip)]
    pub sub_path: Option<String>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    cache_enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Resolved paths and flags.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Root of the markdown sources.
    pub source_dir: PathBuf,
    /// Explicit output directory. `None` means `<source_dir>/html`.
    pub output_dir: Option<PathBuf>,
    /// Whether the metadata cache is read and written.
    pub cache_enabled: bool,
}

impl DocsConfig {
    /// Output directory, falling back to `<source_dir>/html`.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.source_dir.join("html"))
    }
}

/// `[toc]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Depth used by TOC directives that do not set `maxdepth`.
    pub max_depth: usize,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_TOC_MAX_DEPTH,
        }
    }
}

/// `[site]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name appended to page titles.
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Documentation".to_owned(),
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
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`BUILD_DIR`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration, then apply CLI settings on top.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `docs.toml` in the current directory and its parents, and falls
    /// back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, the file
    /// cannot be parsed, or a value fails validation.
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
            config.apply_cli_settings(settings)?;
        }

        Ok(config)
    }

    /// Freeze the configuration into a [`BuildContext`].
    #[must_use]
    pub fn build_context(&self) -> BuildContext {
        let ctx = BuildContext::new(
            self.docs_resolved.source_dir.clone(),
            self.docs_resolved.output_dir(),
        )
        .with_cache(self.docs_resolved.cache_enabled)
        .with_toc_max_depth(self.toc.max_depth)
        .with_site_name(self.site.name.clone());

        match &self.sub_path {
            Some(sub) => ctx.with_normalized_sub_path(sub.clone()),
            None => ctx,
        }
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) -> Result<(), ConfigError> {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir = Some(output_dir.clone());
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.docs_resolved.cache_enabled = cache_enabled;
        }
        if let Some(sub_path) = &settings.sub_path {
            self.sub_path = Some(normalize_sub_path(sub_path)?);
        }
        Ok(())
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any check fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toc.max_depth == 0 {
            return Err(ConfigError::Validation(
                "toc.max_depth must be at least 1".to_owned(),
            ));
        }
        require_non_empty(&self.site.name, "site.name")?;
        Ok(())
    }

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

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            output: OutputConfigRaw::default(),
            toc: TocConfig::default(),
            site: SiteConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: None,
                cache_enabled: true,
            },
            sub_path: None,
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(source_dir) = &self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(source_dir, "docs.source_dir")?);
        }
        if let Some(dir) = &self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the directory holding `docs.toml`.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            output_dir: self.output.dir.as_deref().map(|dir| config_dir.join(dir)),
            cache_enabled: self.docs.cache_enabled.unwrap_or(true),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/project"));

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/project/docs"));
        assert_eq!(
            config.docs_resolved.output_dir(),
            PathBuf::from("/project/docs/html")
        );
        assert!(config.docs_resolved.cache_enabled);
        assert_eq!(config.toc.max_depth, 2);
        assert_eq!(config.site.name, "Documentation");
    }

    #[test]
    fn test_parse_all_sections() {
        let toml = r#"
[docs]
source_dir = "handbook"
cache_enabled = false

[output]
dir = "build"

[toc]
max_depth = 3

[site]
name = "Acme"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/handbook")
        );
        assert_eq!(config.docs_resolved.output_dir(), PathBuf::from("/project/build"));
        assert!(!config.docs_resolved.cache_enabled);
        assert_eq!(config.toc.max_depth, 3);
        assert_eq!(config.site.name, "Acme");
    }

    #[test]
    fn test_zero_toc_depth_rejected() {
        let config: Config = toml::from_str("[toc]\nmax_depth = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("toc.max_depth"));
    }

    #[test]
    fn test_empty_site_name_rejected() {
        let config: Config = toml::from_str("[site]\nname = \"  \"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_output_follows_overridden_source_dir() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config
            .apply_cli_settings(&CliSettings {
                source_dir: Some(PathBuf::from("/elsewhere")),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(
            config.docs_resolved.output_dir(),
            PathBuf::from("/elsewhere/html")
        );
    }

    #[test]
    fn test_cli_settings_override_file() {
        let mut config: Config = toml::from_str("[output]\ndir = \"build\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));
        config
            .apply_cli_settings(&CliSettings {
                output_dir: Some(PathBuf::from("/tmp/out")),
                cache_enabled: Some(false),
                sub_path: Some("/book/".to_owned()),
                ..Default::default()
            })
            .unwrap();

        let ctx = config.build_context();
        assert_eq!(ctx.output_dir(), Path::new("/tmp/out"));
        assert!(!ctx.cache_enabled());
        assert_eq!(ctx.sub_path(), Some("book"));
    }

    #[test]
    fn test_invalid_sub_path_rejected() {
        let mut config = Config::default_with_base(Path::new("/project"));
        let result = config.apply_cli_settings(&CliSettings {
            sub_path: Some("../outside".to_owned()),
            ..Default::default()
        });

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_build_context_carries_toc_and_site() {
        let mut config: Config =
            toml::from_str("[toc]\nmax_depth = 4\n[site]\nname = \"Acme\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        let ctx = config.build_context();
        assert_eq!(ctx.toc_max_depth(), 4);
        assert_eq!(ctx.site_name(), "Acme");
        assert_eq!(ctx.source_dir(), Path::new("/project/docs"));
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs.toml");
        std::fs::write(&path, "[docs]\nsource_dir = \"src\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, tmp.path().join("src"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/docs.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs.toml");
        std::fs::write(&path, "[docs\nsource_dir =").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_expands_env_in_output_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs.toml");
        std::fs::write(&path, "[output]\ndir = \"${DOCS_CFG_OUT_UNSET:-site}\"\n").unwrap();
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DOCS_CFG_OUT_UNSET");
        }

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.output_dir(), tmp.path().join("site"));
    }
}

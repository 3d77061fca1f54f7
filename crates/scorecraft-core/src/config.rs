//! Configuration loading and discovery.
//!
//! Sources are merged with figment, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config from the XDG config directory
//! 3. Project config, found by walking up from the working directory
//! 4. Explicit files (`--config`)
//! 5. `SCORECRAFT_*` environment variables
//!
//! # Config file locations
//! - `scorecraft.<ext>` in current directory or any parent
//! - `.scorecraft.<ext>` in current directory or any parent
//! - `~/.config/scorecraft/config.<ext>` (user config)
//!
//! Where `<ext>` is one of: `toml`, `yaml`, `yml`, `json`. The walk stops at
//! a `.git` directory.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use scorecraft_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::from(".");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("keywords: {}", config.keywords);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::keywords::KeywordList;

/// Input size limit applied when none is configured: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SCORECRAFT_";

/// The configuration for scorecraft.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON) and `SCORECRAFT_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files. File logging is off when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Target keywords used when a command is given none.
    ///
    /// Accepts an array or a comma-separated string.
    pub keywords: KeywordList,
    /// Minimum acceptable score for `score` and `report`.
    pub min_score: Option<u8>,
    /// Content type sent with optimization requests (default: `article`).
    pub content_type: Option<String>,
    /// Maximum input size in bytes (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored.
    pub disable_input_limit: bool,
}

impl Config {
    /// The effective input size limit, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }

    /// The content type for optimization requests.
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or(crate::collaborator::DEFAULT_CONTENT_TYPE)
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Total number of files merged.
    pub fn file_count(&self) -> usize {
        self.project_files.len()
            + self.explicit_files.len()
            + usize::from(self.user_file.is_some())
    }

    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// File extensions tried for every config name, in order.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "scorecraft";

/// A directory containing this entry is treated as the repository root.
const REPO_MARKER: &str = ".git";

/// Builds the layered [`Config`] for one invocation.
#[derive(Debug)]
pub struct ConfigLoader {
    search_from: Option<Utf8PathBuf>,
    user_config: bool,
    stop_at_repo_root: bool,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads the user config and stops project search at the
    /// repository root.
    pub const fn new() -> Self {
        Self {
            search_from: None,
            user_config: true,
            stop_at_repo_root: true,
            explicit_files: Vec::new(),
        }
    }

    /// Look for project config files from `dir` upward.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.search_from = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Include or skip `~/.config/scorecraft/config.<ext>`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Keep walking past the repository root up to the filesystem root.
    pub const fn search_past_repo_root(mut self) -> Self {
        self.stop_at_repo_root = false;
        self
    }

    /// Merge `path` after every discovered file. Later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source into a [`Config`].
    ///
    /// Also returns the files that contributed so `info` can report them
    /// without searching again.
    #[tracing::instrument(skip(self), fields(search_from = ?self.search_from))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = ConfigSources {
            user_file: self.user_config.then(user_config_file).flatten(),
            project_files: self
                .search_from
                .as_deref()
                .map(|dir| self.project_files(dir))
                .unwrap_or_default(),
            explicit_files: self.explicit_files,
        };

        let files = sources
            .user_file
            .iter()
            .chain(&sources.project_files)
            .chain(&sources.explicit_files);
        let figment = files
            .fold(
                Figment::from(Serialized::defaults(Config::default())),
                |figment, path| merge_file(figment, path),
            )
            // SCORECRAFT_MIN_SCORE=70, SCORECRAFT_KEYWORDS=seo,marketing
            .merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            keyword_count = config.keywords.len(),
            files = sources.file_count(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Config files in the closest directory, from `start` upward, that has
    /// any.
    ///
    /// Within that directory the dotfile comes first, so `scorecraft.toml`
    /// overrides `.scorecraft.toml`. A repository root is still searched
    /// itself; only its parents are skipped.
    fn project_files(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found: Vec<Utf8PathBuf> = [format!(".{APP_NAME}"), APP_NAME.to_string()]
                .iter()
                .flat_map(|stem| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!("{stem}.{ext}")))
                })
                .filter(|path| path.is_file())
                .collect();
            if !found.is_empty() {
                return found;
            }
            if self.stop_at_repo_root && dir != start && dir.join(REPO_MARKER).exists() {
                break;
            }
        }
        Vec::new()
    }
}

/// `config.<ext>` in the platform config directory, if present.
fn user_config_file() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dirs.config_dir().join(format!("config.{ext}")))
        .find(|path| path.is_file())
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
}

/// Merge one file, choosing the provider by extension (TOML otherwise).
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

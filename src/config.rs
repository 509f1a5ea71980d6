//! Organizer configuration.
//!
//! Settings are read from a TOML file. They control which directory entries
//! take part in a run; the category table itself is fixed.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organizer]
//! include_hidden = false
//!
//! [organizer.exclude]
//! filenames = ["Thumbs.db"]
//! extensions = ["part", "tmp"]
//! patterns = ["~*"]
//! regex = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_NAME: &str = ".declutter.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizerConfig {
    #[serde(default)]
    pub organizer: OrganizerSettings,
}

/// The `[organizer]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizerSettings {
    /// Whether to process hidden files (names starting with "."). Defaults to false.
    #[serde(default)]
    pub include_hidden: bool,

    /// Entries kept out of the run.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for keeping files out of a run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// File extensions without the dot, case-insensitive (e.g. "part").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns matched against the file name (e.g. "~*").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, when given
    /// 2. `.declutter.toml` inside the target directory
    /// 3. `~/.config/declutter/config.toml`
    /// 4. built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a file is found (or explicitly named) but cannot be
    /// read or parsed.
    pub fn load(config_path: Option<&Path>, target_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = target_dir.join(LOCAL_CONFIG_NAME);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("declutter")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile into a matcher.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(self) -> Result<EntryFilter, ConfigError> {
        EntryFilter::new(self.organizer)
    }
}

/// Compiled form of [`OrganizerSettings`], deciding which entries a run
/// processes.
#[derive(Debug)]
pub struct EntryFilter {
    include_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl EntryFilter {
    fn new(settings: OrganizerSettings) -> Result<Self, ConfigError> {
        let exclude_patterns = settings
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = settings
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: settings.include_hidden,
            exclude_filenames: settings.exclude.filenames.into_iter().collect(),
            exclude_extensions: settings
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Overrides the hidden-file policy.
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn includes_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Whether a file with this name takes part in the run.
    ///
    /// Checks, in order: hidden policy, exact name, extension, glob, regex.
    pub fn should_include(&self, file_name: &str) -> bool {
        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = Path::new(file_name).extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(file_name))
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            include_hidden: false,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
        }
    }
}

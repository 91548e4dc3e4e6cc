//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.seekfirst/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SeekConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub corpus_path: Option<String>,
    pub books_path: Option<String>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub min_phrase_len: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CORPUS_PATH: &str = "esv.xml";
pub const DEFAULT_BOOKS_PATH: &str = "bible-books.csv";
pub const DEFAULT_LOG_FILE: &str = "seekfirst.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const DEFAULT_MIN_PHRASE_LEN: usize = 3;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub corpus_path: PathBuf,
    pub books_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub min_phrase_len: usize,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Deferred Log
// ============================================================================

/// Log records raised while loading config, before the logger exists.
/// `main` replays them once the logger is up.
#[derive(Debug, Default)]
pub struct DeferredLog {
    records: Vec<(Level, String)>,
}

impl DeferredLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        self.records.push((level, message.into()));
    }

    pub fn records(&self) -> &[(Level, String)] {
        &self.records
    }

    pub fn replay(self) {
        for (level, message) in self.records {
            log::log!(level, "{}", message);
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.seekfirst/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".seekfirst").join("config.toml"))
}

/// Load config from `~/.seekfirst/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SeekConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config(log: &mut DeferredLog) -> Result<SeekConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            log.push(
                Level::Warn,
                "Could not determine home directory, using default config",
            );
            return Ok(SeekConfig::default());
        }
    };
    load_config_from(&path, log)
}

/// Same as [`load_config`] for an explicit path.
pub fn load_config_from(path: &Path, log: &mut DeferredLog) -> Result<SeekConfig, ConfigError> {
    if !path.exists() {
        log.push(
            Level::Info,
            format!("No config file found, generating default at {}", path.display()),
        );
        generate_default_config(path, log);
        return Ok(SeekConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SeekConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    log.push(Level::Info, format!("Loaded config from {}", path.display()));
    log.push(Level::Debug, format!("Config: {:?}", config));
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path, log: &mut DeferredLog) {
    let default_content = r#"# Seekfirst Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# corpus_path = "esv.xml"            # Or SEEKFIRST_CORPUS / --corpus
# books_path = "bible-books.csv"     # Or SEEKFIRST_BOOKS / --books
# log_file = "seekfirst.log"
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"

# [search]
# min_phrase_len = 3                 # A `!phrase` needs more characters than this
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            log.push(Level::Warn, format!("Failed to create config directory: {e}"));
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        log.push(Level::Warn, format!("Failed to write default config: {e}"));
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_corpus` and `cli_books` are from CLI flags (None = not specified).
pub fn resolve(
    config: &SeekConfig,
    cli_corpus: Option<&Path>,
    cli_books: Option<&Path>,
    log: &mut DeferredLog,
) -> ResolvedConfig {
    // Corpus: CLI → env → config → default
    let corpus_path = cli_corpus
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("SEEKFIRST_CORPUS").ok().map(PathBuf::from))
        .or_else(|| config.general.corpus_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS_PATH));

    // Book table: CLI → env → config → default
    let books_path = cli_books
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("SEEKFIRST_BOOKS").ok().map(PathBuf::from))
        .or_else(|| config.general.books_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BOOKS_PATH));

    let log_file = config
        .general
        .log_file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    // Unknown level names fall back to the default rather than failing startup
    let log_level = match config.general.log_level.as_deref() {
        Some(level) => level.parse().unwrap_or_else(|_| {
            log.push(
                Level::Warn,
                format!("Unknown log level {level:?}, using {DEFAULT_LOG_LEVEL}"),
            );
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    ResolvedConfig {
        corpus_path,
        books_path,
        log_file,
        log_level,
        min_phrase_len: config
            .search
            .min_phrase_len
            .unwrap_or(DEFAULT_MIN_PHRASE_LEN),
    }
}

// Configuration loading and parsing (config/league.toml).

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use lfl_core::LeagueSettings;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install default config at {path}: {source}")]
    InstallError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub seeding: Vec<SeedOverride>,
    pub divisions: Vec<DivisionConfig>,
    /// Directory that relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

impl Config {
    /// League metadata for the analytics core.
    pub fn settings(&self) -> LeagueSettings {
        let mut settings = LeagueSettings::new(self.league.name.clone());
        for division in &self.divisions {
            settings = settings.with_division(division.name.clone(), division.team_names.iter().cloned());
        }
        for entry in &self.seeding {
            settings = settings.with_seed_override(entry.short_name.clone(), entry.seed);
        }
        settings
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    source: SourceConfig,
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    seeding: Vec<SeedOverride>,
    #[serde(default)]
    divisions: Vec<DivisionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
}

/// Where league data comes from, selected by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Sleeper {
        league_id: String,
        #[serde(default)]
        base_url: Option<String>,
        /// Last week to fetch. Defaults to the week before the current one.
        #[serde(default)]
        through_week: Option<u32>,
    },
    Snapshot {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Report file. Written to stdout when omitted.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedOverride {
    pub short_name: String,
    pub seed: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DivisionConfig {
    pub name: String,
    pub team_names: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Configuration written to `config/league.toml` when none exists yet.
pub const DEFAULT_LEAGUE_TOML: &str = include_str!("../defaults/league.toml");

fn league_path(base_dir: &Path) -> PathBuf {
    base_dir.join("config").join("league.toml")
}

/// Load and validate `config/league.toml` under `base_dir` without
/// installing the default.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = league_path(base_dir);
    let text = read_file(&path)?;
    let file: LeagueFile =
        toml::from_str(&text).map_err(|source| ConfigError::ParseError { path, source })?;

    let config = Config {
        league: file.league,
        source: file.source,
        output: file.output,
        seeding: file.seeding,
        divisions: file.divisions,
        base_dir: base_dir.to_path_buf(),
    };
    validate(&config)?;
    Ok(config)
}

/// Write [`DEFAULT_LEAGUE_TOML`] to `config/league.toml` unless the file
/// already exists. Returns the path when a file was written.
pub fn ensure_league_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let path = league_path(base_dir);
    let install_err = |source| ConfigError::InstallError {
        path: path.clone(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(install_err)?;
    }

    let mut file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(install_err(e)),
    };
    file.write_all(DEFAULT_LEAGUE_TOML.as_bytes()).map_err(install_err)?;
    info!("installed default config at {}", path.display());
    Ok(Some(path))
}

/// Install the default config if needed, then load from `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_league_config(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.name.trim().is_empty() {
        return Err(invalid("league.name", "must not be empty"));
    }

    match &config.source {
        SourceConfig::Sleeper {
            league_id,
            through_week,
            ..
        } => {
            if league_id.trim().is_empty() {
                return Err(invalid("source.league_id", "must not be empty"));
            }
            if !league_id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(
                    "source.league_id",
                    format!("{league_id} is not a Sleeper league id"),
                ));
            }
            if league_id.bytes().all(|b| b == b'0') {
                return Err(invalid(
                    "source.league_id",
                    "replace the placeholder id with your league's id",
                ));
            }
            if *through_week == Some(0) {
                return Err(invalid("source.through_week", "must be at least 1"));
            }
        }
        SourceConfig::Snapshot { path } => {
            if path.as_os_str().is_empty() {
                return Err(invalid("source.path", "must not be empty"));
            }
        }
    }

    let mut seeds = BTreeSet::new();
    let mut seeded = BTreeSet::new();
    for entry in &config.seeding {
        if entry.seed == 0 {
            return Err(invalid(
                "seeding.seed",
                format!("seed for {} must be at least 1", entry.short_name),
            ));
        }
        if !seeds.insert(entry.seed) {
            return Err(invalid("seeding.seed", format!("seed {} is assigned twice", entry.seed)));
        }
        if !seeded.insert(entry.short_name.as_str()) {
            return Err(invalid(
                "seeding.short_name",
                format!("{} is listed twice", entry.short_name),
            ));
        }
    }

    let mut names = BTreeSet::new();
    let mut members = BTreeSet::new();
    for division in &config.divisions {
        if division.name.trim().is_empty() {
            return Err(invalid("divisions.name", "must not be empty"));
        }
        if !names.insert(division.name.as_str()) {
            return Err(invalid("divisions.name", format!("{} is defined twice", division.name)));
        }
        for team in &division.team_names {
            if !members.insert(team.as_str()) {
                return Err(invalid(
                    "divisions.team_names",
                    format!("{team} appears in more than one division"),
                ));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

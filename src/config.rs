use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cross_xdg::BaseDirs;
use serde::Deserialize;

use crate::interpreter::InterpreterConfig;
use crate::tape::{CellMode, DEFAULT_TAPE_SIZE};

/// File name looked up in the user's config directory.
pub const CONFIG_FILE_NAME: &str = "tapebf.toml";

/// How the CLI presents values produced by `.`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One decimal number per line.
    #[default]
    Numbers,
    /// Each value as a character, no separators.
    Ascii,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numbers" => Ok(OutputFormat::Numbers),
            "ascii" => Ok(OutputFormat::Ascii),
            other => Err(format!("invalid output format '{other}', must be 'numbers' or 'ascii'")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Numbers => write!(f, "numbers"),
            OutputFormat::Ascii => write!(f, "ascii"),
        }
    }
}

/// Effective CLI settings after layering defaults, config file, environment and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub tape_size: usize,
    pub cell_mode: CellMode,
    pub output: OutputFormat,
    /// Register the stock extension commands (`*`, `/`, `_`).
    pub extensions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            cell_mode: CellMode::Unbounded,
            output: OutputFormat::Numbers,
            extensions: false,
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub tape_size: Option<usize>,
    pub cell_mode: Option<CellMode>,
    pub output: Option<OutputFormat>,
    pub extensions: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    interpreter: FileInterpreter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileInterpreter {
    tape_size: Option<usize>,
    cell_mode: Option<CellMode>,
    output: Option<OutputFormat>,
    extensions: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Settings {
    /// Resolve settings: flags -> env -> config file -> defaults.
    ///
    /// A broken config file or bad environment value is logged and skipped.
    pub fn resolve(overrides: Overrides) -> Self {
        let mut settings = Settings::default();

        if let Some(path) = config_path() {
            if path.exists() {
                match settings.merge_file(&path) {
                    Ok(()) => tracing::debug!(path = %path.display(), "loaded config file"),
                    Err(e) => tracing::warn!(error = %e, "ignoring config file"),
                }
            }
        }

        settings.merge_env(|key| std::env::var(key).ok());
        settings.merge_overrides(overrides);
        settings
    }

    /// Layer the `[interpreter]` table of a TOML file over `self`.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn merge_toml(&mut self, content: &str) -> Result<(), toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let FileInterpreter { tape_size, cell_mode, output, extensions } = file.interpreter;

        if let Some(v) = tape_size { self.tape_size = v; }
        if let Some(v) = cell_mode { self.cell_mode = v; }
        if let Some(v) = output { self.output = v; }
        if let Some(v) = extensions { self.extensions = v; }
        Ok(())
    }

    /// Layer `TAPEBF_*` variables, looked up through `var`, over `self`.
    pub fn merge_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env(&var, "TAPEBF_TAPE_SIZE", |s| s.trim().parse::<usize>().map_err(|e| e.to_string())) {
            self.tape_size = v;
        }
        if let Some(v) = parse_env(&var, "TAPEBF_CELL_MODE", CellMode::from_str) {
            self.cell_mode = v;
        }
        if let Some(v) = parse_env(&var, "TAPEBF_OUTPUT", OutputFormat::from_str) {
            self.output = v;
        }
        if let Some(v) = parse_env(&var, "TAPEBF_EXTENSIONS", |s| match s.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(format!("expected 1/0/true/false, got '{other}'")),
        }) {
            self.extensions = v;
        }
    }

    pub fn merge_overrides(&mut self, overrides: Overrides) {
        let Overrides { tape_size, cell_mode, output, extensions } = overrides;

        if let Some(v) = tape_size { self.tape_size = v; }
        if let Some(v) = cell_mode { self.cell_mode = v; }
        if let Some(v) = output { self.output = v; }
        if let Some(v) = extensions { self.extensions = v; }
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig::default()
            .tape_size(self.tape_size)
            .cell_mode(self.cell_mode)
    }
}

fn parse_env<T, V, P>(var: &V, key: &str, parse: P) -> Option<T>
where
    V: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    let raw = var(key)?;
    match parse(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring environment variable");
            None
        }
    }
}

/// `$TAPEBF_CONFIG` if set, else `<config_home>/tapebf.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("TAPEBF_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // ~/.config on every platform; no home directory means no config file.
    let base_dirs = BaseDirs::new().into_iter().next()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push(CONFIG_FILE_NAME);
    Some(path)
}

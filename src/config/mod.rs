use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{billing::Rate, errors::ConfigError};

pub const CONFIG_PATH_ENV: &str = "PARKING_LEDGER_CONFIG";
pub const RATE_ENV: &str = "PARKING_LEDGER_RATE";
pub const CLOCK_ENV: &str = "PARKING_LEDGER_CLOCK";

const APP_DIR: &str = "parking_ledger";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RATE_PER_SECOND: u64 = 10;

/// Which time source the shell drives the ledger with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    #[default]
    System,
    Manual,
}

impl ClockMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Some(Self::System),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub rate_per_second: u64,
    #[serde(default)]
    pub clock: ClockMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_per_second: DEFAULT_RATE_PER_SECOND,
            clock: ClockMode::default(),
        }
    }
}

impl Config {
    pub fn rate(&self) -> Rate {
        Rate::per_second(self.rate_per_second)
    }

    /// Applies `PARKING_LEDGER_RATE` and `PARKING_LEDGER_CLOCK` on top of the
    /// loaded values.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(
            env::var(RATE_ENV).ok().as_deref(),
            env::var(CLOCK_ENV).ok().as_deref(),
        )
    }

    fn apply_overrides(
        &mut self,
        rate: Option<&str>,
        clock: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = rate {
            let parsed = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: RATE_ENV,
                value: raw.to_string(),
            })?;
            self.rate_per_second = parsed;
        }
        if let Some(raw) = clock {
            self.clock = ClockMode::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
                key: CLOCK_ENV,
                value: raw.to_string(),
            })?;
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Resolves the config file from `PARKING_LEDGER_CONFIG`, falling back to
    /// the platform config directory.
    pub fn new() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(Self::with_path(PathBuf::from(path)));
        }
        let base = dirs::config_dir().ok_or(ConfigError::MissingConfigDir)?;
        Ok(Self::with_path(base.join(APP_DIR).join(CONFIG_FILE)))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

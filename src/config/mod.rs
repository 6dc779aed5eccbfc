//! Runtime configuration for the job daemon.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheduler::Schedule;

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

/// User-configurable daemon settings. Trigger hours are UTC; exact times are
/// a configuration detail, not a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Ledger JSON document path. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default = "JobsConfig::default_recurrence_hour")]
    pub recurrence_hour: u32,
    #[serde(default = "JobsConfig::default_alert_hour")]
    pub alert_hour: u32,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            recurrence_hour: Self::default_recurrence_hour(),
            alert_hour: Self::default_alert_hour(),
        }
    }
}

impl JobsConfig {
    fn default_recurrence_hour() -> u32 {
        0
    }

    fn default_alert_hour() -> u32 {
        9
    }

    /// Default config file location under the platform config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fintrack")
            .join("jobs.json")
    }

    pub fn resolve_data_file(&self) -> PathBuf {
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fintrack")
            .join("ledger.json")
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            recurrence_hour: self.recurrence_hour.min(23),
            alert_hour: self.alert_hour.min(23),
        }
    }

    /// Loads from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<JobsConfig, ConfigError> {
        if path.exists() {
            let data = fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(JobsConfig::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, path)?;
        Ok(())
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
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

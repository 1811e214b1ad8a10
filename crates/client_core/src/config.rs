use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::domain::Algorithm;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "dashboard.toml";
pub const EXPERIMENT_RUN_CHOICES: [u32; 4] = [5, 10, 20, 30];

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub default_dataset: String,
    pub default_algorithm: Algorithm,
    pub experiment_runs: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".into(),
            request_timeout: Duration::from_secs(120),
            default_dataset: "small".into(),
            default_algorithm: Algorithm::Greedy,
            experiment_runs: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid api base url '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    default_dataset: Option<String>,
    default_algorithm: Option<Algorithm>,
    experiment_runs: Option<u32>,
}

/// Loads settings from `dashboard.toml` in the working directory (if any) and
/// the process environment.
pub fn load_settings() -> Result<DashboardSettings, SettingsError> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| {
        std::env::var(key).ok()
    })
}

/// Defaults, then the file at `path` when it exists, then environment
/// overrides looked up through `env`.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<DashboardSettings, SettingsError> {
    let mut settings = DashboardSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file: FileSettings = toml::from_str(&raw).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            apply_file(&mut settings, file);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let lookup = |keys: &[&str]| keys.iter().find_map(|key| non_empty(env(key)));

    if let Some(v) = lookup(&["DASHBOARD_API_URL", "APP__API_BASE_URL"]) {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup(&["APP__REQUEST_TIMEOUT_SECS"]) {
        let secs = v
            .parse::<u64>()
            .map_err(|_| SettingsError::InvalidValue {
                key: "APP__REQUEST_TIMEOUT_SECS",
                value: v.clone(),
            })?;
        settings.request_timeout = Duration::from_secs(secs);
    }
    if let Some(v) = lookup(&["APP__DEFAULT_DATASET"]) {
        settings.default_dataset = v;
    }
    if let Some(v) = lookup(&["APP__DEFAULT_ALGORITHM"]) {
        settings.default_algorithm =
            Algorithm::from_wire(&v).ok_or(SettingsError::InvalidValue {
                key: "APP__DEFAULT_ALGORITHM",
                value: v.clone(),
            })?;
    }
    if let Some(v) = lookup(&["APP__EXPERIMENT_RUNS"]) {
        settings.experiment_runs = v
            .parse::<u32>()
            .map_err(|_| SettingsError::InvalidValue {
                key: "APP__EXPERIMENT_RUNS",
                value: v.clone(),
            })?;
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    Ok(settings)
}

/// Command-line flags; applied last.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub experiment_runs: Option<u32>,
}

impl DashboardSettings {
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) -> Result<(), SettingsError> {
        if let Some(url) = overrides.api_base_url {
            self.api_base_url = normalize_base_url(&url)?;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n_runs) = overrides.experiment_runs {
            self.experiment_runs = n_runs;
        }
        Ok(())
    }
}

fn apply_file(settings: &mut DashboardSettings, file: FileSettings) {
    if let Some(v) = file.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(v);
    }
    if let Some(v) = file.default_dataset {
        settings.default_dataset = v;
    }
    if let Some(v) = file.default_algorithm {
        settings.default_algorithm = v;
    }
    if let Some(v) = file.experiment_runs {
        settings.experiment_runs = v;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks the base url is absolute http(s) and strips trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|err| SettingsError::InvalidUrl {
        value: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SettingsError::InvalidUrl {
            value: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

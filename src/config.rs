//! Runtime configuration
//!
//! Everything comes from the environment; unset variables fall back to
//! defaults that work for a local checkout.

use std::path::PathBuf;

use thiserror::Error;

use crate::analytics::{DatePreset, PresetError};
use crate::client::DEFAULT_API_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TELEMED_DEFAULT_PRESET: {0}")]
    Preset(#[from] PresetError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub api_url: String,
    pub api_token: Option<String>,
    pub patient_id: Option<String>,
    pub default_preset: DatePreset,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let default_preset = match get("TELEMED_DEFAULT_PRESET") {
            Some(raw) => raw.parse()?,
            None => DatePreset::default(),
        };

        Ok(Self {
            database_path: get("TELEMED_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            api_url: get("TELEMED_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_token: get("TELEMED_API_TOKEN"),
            patient_id: get("TELEMED_PATIENT_ID"),
            default_preset,
        })
    }
}

/// `<project root>/data/telemed_vitals.db`, where the project root is found by
/// walking up out of `target/{debug,release}` from the running executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|target| target.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("telemed_vitals.db");
    path
}

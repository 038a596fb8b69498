//! Layered configuration for the command-line host.
//!
//! Precedence, lowest first: built-in defaults, `TINCT_*` environment
//! variables, a JSON config file, command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tinct_core::{DEFAULT_LEVEL, TransferConfig, TransferError, TransferMethod};

/// Default title written into exported LUTs.
const DEFAULT_LUT_TITLE: &str = "Cinematic";

/// Runtime configuration for the `tinct` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Settings handed to the engine.
    pub transfer: TransferConfig,
    /// Identity cube level used when baking LUTs.
    pub cube_level: u32,
    /// Title written into exported LUTs.
    pub lut_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transfer: TransferConfig::default(),
            cube_level: DEFAULT_LEVEL,
            lut_title: DEFAULT_LUT_TITLE.to_owned(),
        }
    }
}

/// Optional overrides read from a JSON file. Absent keys leave the
/// lower layers alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    method: Option<String>,
    preserve_luminance: Option<bool>,
    intensity: Option<f32>,
    cube_level: Option<u32>,
    lut_title: Option<String>,
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with variables from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(method) = env_value::<String>(&lookup, "TINCT_METHOD")? {
            config.transfer.method = method.parse()?;
        }
        if let Some(v) = env_value::<bool>(&lookup, "TINCT_PRESERVE_LUMINANCE")? {
            config.transfer.preserve_luminance = v;
        }
        if let Some(v) = env_value::<f32>(&lookup, "TINCT_INTENSITY")? {
            config.transfer.intensity = v;
        }
        if let Some(v) = env_value::<u32>(&lookup, "TINCT_CUBE_LEVEL")? {
            config.cube_level = v;
        }
        if let Some(v) = env_value::<String>(&lookup, "TINCT_LUT_TITLE")? {
            config.lut_title = v;
        }
        Ok(config)
    }

    /// Overlay a JSON config file.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.to_owned(),
            source,
        })?;
        self.merge_json(&text)
    }

    /// Overlay JSON text.
    pub fn merge_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        if let Some(method) = file.method {
            self.transfer.method = method.parse()?;
        }
        if let Some(v) = file.preserve_luminance {
            self.transfer.preserve_luminance = v;
        }
        if let Some(v) = file.intensity {
            self.transfer.intensity = v;
        }
        if let Some(v) = file.cube_level {
            self.cube_level = v;
        }
        if let Some(v) = file.lut_title {
            self.lut_title = v;
        }
        Ok(())
    }

    /// Overlay explicit command-line values.
    pub fn apply_overrides(
        &mut self,
        method: Option<TransferMethod>,
        preserve_luminance: Option<bool>,
        intensity: Option<f32>,
    ) {
        if let Some(m) = method {
            self.transfer.method = m;
        }
        if let Some(p) = preserve_luminance {
            self.transfer.preserve_luminance = p;
        }
        if let Some(i) = intensity {
            self.transfer.intensity = i;
        }
    }

    /// Reject out-of-range values before any image is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transfer.validate()?;
        tinct_core::CubeGeometry::from_level(self.cube_level)?;
        Ok(())
    }
}

fn env_value<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|e: T::Err| ConfigError::Env {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {key}={value:?} is invalid: {reason}")]
    Env {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to read config file {}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

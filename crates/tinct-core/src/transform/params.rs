//! Transfer configuration handed to the engine on every call.
//!
//! `TransferConfig` is owned by the caller and passed by value; the engine
//! never keeps it between calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransferError};

/// Method names some front ends offer that have no implementation here.
const UNIMPLEMENTED_METHODS: [&str; 4] = ["covariance", "mkl", "clustering", "kmeans"];

/// Color transfer algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransferMethod {
    /// CDF-quantile histogram matching per channel.
    Histogram,
    /// Mean / standard deviation alignment in L*a*b* (Reinhard et al. 2001).
    Reinhard,
}

impl TransferMethod {
    /// Stable lowercase tag used in configs and on the command line.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Reinhard => "reinhard",
        }
    }

    /// Human-readable label for status text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Histogram => "Histogram matching",
            Self::Reinhard => "Reinhard statistics",
        }
    }

    /// Every implemented method.
    pub fn all() -> &'static [Self] {
        const ALL: [TransferMethod; 2] = [TransferMethod::Histogram, TransferMethod::Reinhard];
        &ALL
    }
}

impl fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TransferMethod {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();
        if let Some(method) = Self::all().iter().find(|m| m.tag() == tag) {
            return Ok(*method);
        }
        if UNIMPLEMENTED_METHODS.contains(&tag.as_str()) {
            return Err(TransferError::UnsupportedMethod(format!(
                "'{tag}' is recognised but not implemented"
            )));
        }
        Err(TransferError::UnsupportedMethod(format!("unknown method '{s}'")))
    }
}

impl TryFrom<String> for TransferMethod {
    type Error = TransferError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TransferMethod> for String {
    fn from(method: TransferMethod) -> Self {
        method.tag().to_owned()
    }
}

/// Everything the engine needs to know about one transfer besides the images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Algorithm used for the full-strength transfer.
    pub method: TransferMethod,
    /// Keep the target's L* and transfer only a*/b*.
    pub preserve_luminance: bool,
    /// Blend factor between the untouched target (0) and the full transfer (1).
    pub intensity: f32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            method: TransferMethod::Histogram,
            preserve_luminance: true,
            intensity: 1.0,
        }
    }
}

impl TransferConfig {
    /// Decode a config from JSON. Missing fields take their defaults.
    ///
    /// An unknown `method` tag fails with `UnsupportedMethod`, not a generic
    /// decode error.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(tag) = value.get("method").and_then(|m| m.as_str()) {
            tag.parse::<TransferMethod>()?;
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges. Called by the engine before any work starts.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(TransferError::InvalidInput(format!(
                "intensity must be within [0, 1], got {}",
                self.intensity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_front_end_defaults() {
        let config = TransferConfig::default();
        assert_eq!(config.method, TransferMethod::Histogram);
        assert!(config.preserve_luminance);
        assert_eq!(config.intensity, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_method_labels_are_distinct_from_tags() {
        assert_eq!(TransferMethod::Histogram.label(), "Histogram matching");
        assert_eq!(TransferMethod::Reinhard.label(), "Reinhard statistics");
        for &m in TransferMethod::all() {
            assert_ne!(m.label(), m.tag());
        }
    }

    #[test]
    fn test_method_parses_case_insensitively() {
        assert_eq!("Reinhard".parse::<TransferMethod>(), Ok(TransferMethod::Reinhard));
        assert_eq!(" histogram ".parse::<TransferMethod>(), Ok(TransferMethod::Histogram));
    }

    #[test]
    fn test_unimplemented_methods_are_unsupported() {
        for tag in ["covariance", "clustering", "MKL"] {
            let err = tag.parse::<TransferMethod>().unwrap_err();
            assert!(matches!(err, TransferError::UnsupportedMethod(_)), "{tag}: {err:?}");
        }
        let err = "sepia".parse::<TransferMethod>().unwrap_err();
        assert!(matches!(err, TransferError::UnsupportedMethod(_)));
    }

    #[test]
    fn test_intensity_out_of_range_is_invalid() {
        for intensity in [-0.1, 1.01, f32::NAN] {
            let config = TransferConfig {
                intensity,
                ..TransferConfig::default()
            };
            assert!(matches!(config.validate(), Err(TransferError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = TransferConfig::from_json(r#"{"method": "reinhard", "intensity": 0.5}"#).unwrap();
        assert_eq!(config.method, TransferMethod::Reinhard);
        assert!(config.preserve_luminance);
        assert_eq!(config.intensity, 0.5);
    }

    #[test]
    fn test_from_json_rejects_unknown_method() {
        let err = TransferConfig::from_json(r#"{"method": "clustering"}"#).unwrap_err();
        assert!(matches!(err, TransferError::UnsupportedMethod(ref msg) if msg.contains("not implemented")));
    }

    #[test]
    fn test_from_json_rejects_bad_intensity() {
        let err = TransferConfig::from_json(r#"{"intensity": 2.0}"#).unwrap_err();
        assert!(matches!(err, TransferError::InvalidInput(_)));
    }

    #[test]
    fn test_config_serializes_method_as_tag() {
        let json = serde_json::to_string(&TransferConfig::default()).unwrap();
        assert!(json.contains(r#""method":"histogram""#), "{json}");
    }
}

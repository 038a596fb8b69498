//! Error and warning types shared by the transfer engine and the LUT codec.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransferError>;

/// Failures raised by the engine or the LUT codec.
///
/// Every variant is deterministic: the same inputs always produce the same
/// error, and nothing is partially computed when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransferError {
    /// Empty image, mismatched dimensions, or an out-of-range parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The requested transfer method is not implemented.
    #[error("unsupported transfer method: {0}")]
    UnsupportedMethod(String),
    /// Pixel or entry count does not match `resolution³`.
    #[error("LUT size mismatch: a {resolution}^3 cube needs {expected} entries, got {actual}")]
    InvalidLutSize {
        resolution: u32,
        expected: u64,
        actual: u64,
    },
    /// `.cube` text that could not be parsed.
    #[error("malformed .cube data at line {line}: {reason}")]
    MalformedCube { line: usize, reason: String },
    /// JSON configuration that could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for TransferError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Which input of a transfer an observation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Target,
    Reference,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => write!(f, "target"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// Non-fatal conditions detected while grading.
///
/// These never abort a transfer; the result is still produced but may look
/// flat or posterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferWarning {
    /// A channel has zero spread (a single value). Reinhard scaling falls
    /// back to the epsilon floor and histogram matching collapses to a
    /// constant map.
    DegenerateStatistics {
        role: ImageRole,
        channel: &'static str,
    },
}

impl fmt::Display for TransferWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateStatistics { role, channel } => {
                write!(f, "{role} channel {channel} is flat; result may be degenerate")
            }
        }
    }
}

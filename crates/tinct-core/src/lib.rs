//! Tinct Core — color transfer between images and `.cube` LUT baking.
//!
//! This crate contains the transfer engine (histogram matching, Reinhard
//! statistics, luminance preservation, intensity blending) and the identity
//! cube codec that turns a transfer into a 3D LUT. It performs no file or
//! network I/O; callers hand in decoded images and get images or text back.

pub mod analysis;
pub mod color_management;
pub mod error;
pub mod grading;
pub mod image;
pub mod transform;

// Re-exports for convenience.
pub use crate::error::{ImageRole, Result, TransferError, TransferWarning};
pub use crate::grading::{ColorGradingEngine, GradeOutcome};
pub use crate::image::{LabImage, RgbImage};
pub use crate::transform::cube::{CubeGeometry, DEFAULT_LEVEL, encode, extract_lut, generate_identity};
pub use crate::transform::lut::CubeLut;
pub use crate::transform::params::{TransferConfig, TransferMethod};

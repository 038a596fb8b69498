//! Transfer configuration, identity cube codec, and 3D LUT operations.

pub mod cube;
pub mod lut;
pub mod params;

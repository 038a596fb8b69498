//! Distribution analysis: the statistics phase that must complete before any
//! per-pixel mapping runs.

pub mod cdf;
pub mod stats;

pub use cdf::EmpiricalCdf;
pub use stats::ChannelStats;

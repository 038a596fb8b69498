//! Color transfer methods and the engine that orchestrates them.

pub mod blend;
pub mod engine;
pub mod histogram;
pub mod reinhard;

pub use engine::{ColorGradingEngine, GradeOutcome};

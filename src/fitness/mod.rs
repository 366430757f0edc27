//! Athlete fitness modeling.
//!
//! This module provides the physiological state the planner works against:
//! - Three-parameter fitness signature (threshold power, HIE, peak power)
//! - Three-system impulse-response load model (training load, recovery
//!   load, form) with per-system decay constants
//! - Training readiness classification

pub mod load;
pub mod signature;
pub mod status;

// Re-exports for convenience
pub use load::{
    FitnessModel, FitnessState, LoadAccumulator, TimeConstants, TrainingLoad3d, XssBreakdown,
};
pub use signature::{FitnessSignature, SignatureSource};
pub use status::{StatusClassifier, TrainingStatus};

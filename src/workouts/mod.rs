//! Workout taxonomy for plan generation.

pub mod intervals;
pub mod types;

pub use intervals::{IntervalSet, IntervalStructure, RampSegment};
pub use types::{Intensity, WorkoutType};

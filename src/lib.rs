//! RustPlan - Training Plan Generation Engine
//!
//! An open-source engine that turns an athlete's multi-system fitness model
//! and scheduling constraints into a dated, periodized training plan.
//! Provides three-system training load modeling, phase-based periodization,
//! constrained daily workout scheduling, and a fitness forecast for the
//! goal date.
//!
//! The engine is a pure, synchronous computation over immutable inputs:
//! identical inputs always produce an identical plan, and persistence of
//! the result is the caller's responsibility.

pub mod fitness;
pub mod planner;
pub mod workouts;

// Re-export commonly used types
pub use fitness::{FitnessModel, FitnessSignature, LoadAccumulator, TrainingStatus};
pub use planner::{
    ForecastConfig, GeneratedPlanResult, PlanError, PlanGenerationService, PlannedWorkout,
};
pub use workouts::WorkoutType;

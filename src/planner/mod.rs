//! Training plan generation.
//!
//! Provides the planning pipeline from request to finished plan:
//! - Request configuration and validation
//! - Periodized phase timeline construction
//! - Constrained day-by-day workout scheduling
//! - Plan simulation and predicted end-state fitness
//! - The orchestrating generation service

pub mod config;
pub mod forecast;
pub mod phases;
pub mod scheduler;
pub mod service;

// Re-exports for convenience
pub use config::{
    DayAvailability, ForecastConfig, PlanError, PlanResult, PolarizationRatio, ProgramType,
    WeekAvailability,
};
pub use forecast::{PlanForecaster, PlanWarning, PredictedFitness};
pub use phases::{PeriodizationPlanner, Phase, PhaseName};
pub use scheduler::{DailyScheduler, PlannedWorkout, MIN_SESSION_MINUTES};
pub use service::{
    GeneratedPlanResult, PlanGenerationService, PlanSummary, MIN_PLANNING_HORIZON_DAYS,
};

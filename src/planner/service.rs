//! Plan generation orchestration.
//!
//! Validates the request, then runs periodization, daily scheduling, and
//! forecasting in order and assembles the single result artifact. The
//! engine is a pure synchronous computation: no shared state, no I/O, and
//! identical inputs always produce an identical result.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::{ForecastConfig, PlanError, PlanResult, PolarizationRatio};
use super::forecast::{PlanForecaster, PlanWarning, PredictedFitness};
use super::phases::{PeriodizationPlanner, Phase};
use super::scheduler::{DailyScheduler, PlannedWorkout, MIN_SESSION_MINUTES};
use crate::fitness::load::FitnessModel;
use crate::workouts::types::WorkoutType;

/// Shortest horizon a plan can be periodized over, in days.
pub const MIN_PLANNING_HORIZON_DAYS: i64 = 14;

/// Summary statistics for a generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Whole weeks covered by the plan
    pub total_weeks: u32,
    /// Total planned strain across all workouts
    pub total_xss: f64,
    /// Average scheduled hours per week
    pub avg_weekly_hours: f64,
    /// Phase timeline, in order
    pub phases: Vec<Phase>,
}

/// The sole artifact the engine returns. Immutable once produced;
/// regeneration creates a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlanResult {
    /// Athlete the plan was generated for
    pub athlete_id: Uuid,
    /// First plannable day (the day after "today")
    pub start_date: NaiveDate,
    /// Goal date the plan ends on
    pub target_date: NaiveDate,
    /// Scheduled sessions, chronological; rest days are omitted
    pub workouts: Vec<PlannedWorkout>,
    /// Aggregate statistics
    pub summary: PlanSummary,
    /// Simulated fitness on the goal date
    pub predicted_fitness: PredictedFitness,
    /// Non-fatal conditions worth surfacing to the athlete
    pub warnings: Vec<PlanWarning>,
}

/// Orchestrates plan generation end to end.
pub struct PlanGenerationService {
    periodization: PeriodizationPlanner,
    forecaster: PlanForecaster,
}

impl PlanGenerationService {
    pub fn new() -> Self {
        Self {
            periodization: PeriodizationPlanner::new(),
            forecaster: PlanForecaster::new(),
        }
    }

    /// Generate a plan starting from today's date.
    pub fn generate_plan(
        &self,
        athlete_id: Uuid,
        model: &FitnessModel,
        config: &ForecastConfig,
    ) -> PlanResult<GeneratedPlanResult> {
        self.generate_plan_from(Utc::now().date_naive(), athlete_id, model, config)
    }

    /// Generate a plan with an explicit "today", the pure core of the
    /// engine. Validation failures abort before any scheduling work.
    pub fn generate_plan_from(
        &self,
        today: NaiveDate,
        athlete_id: Uuid,
        model: &FitnessModel,
        config: &ForecastConfig,
    ) -> PlanResult<GeneratedPlanResult> {
        let horizon_days = config.target_date.signed_duration_since(today).num_days();
        if horizon_days < MIN_PLANNING_HORIZON_DAYS {
            return Err(PlanError::InvalidConfiguration(format!(
                "target date must be at least {MIN_PLANNING_HORIZON_DAYS} days out, got {horizon_days}"
            )));
        }
        if config.available_days.all_unavailable() {
            return Err(PlanError::InvalidConfiguration(
                "all seven days are marked unavailable".to_string(),
            ));
        }
        if config.available_days.viable_count(MIN_SESSION_MINUTES) == 0 {
            return Err(PlanError::InsufficientAvailability(format!(
                "every available day is under the {MIN_SESSION_MINUTES} minute session minimum; \
                 increase available minutes on at least one more day"
            )));
        }

        let mut config = config.clone();
        let available_hours = f64::from(config.available_days.total_available_minutes()) / 60.0;
        if config.max_weekly_hours > available_hours {
            tracing::debug!(
                "clamping weekly hours {} to the {} hours of availability",
                config.max_weekly_hours,
                available_hours
            );
            config.max_weekly_hours = available_hours;
        }

        let total_weeks = (horizon_days / 7) as u32;
        let phases = self.periodization.plan(
            total_weeks,
            config.program_type,
            config.periodization_level,
            config.event_readiness,
        );

        let start_date = today + Duration::days(1);
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(start_date, &phases, model.signature());

        let predicted_fitness =
            self.forecaster
                .forecast(model, today, config.target_date, &workouts);
        let warnings: Vec<PlanWarning> = self
            .forecaster
            .horizon_warning(total_weeks)
            .into_iter()
            .collect();

        let total_xss: f64 = workouts.iter().map(|w| w.target_xss.total).sum();
        let total_minutes: u32 = workouts.iter().map(|w| w.duration_minutes).sum();
        let avg_weekly_hours = if total_weeks > 0 {
            round_tenth(f64::from(total_minutes) / 60.0 / f64::from(total_weeks))
        } else {
            0.0
        };

        tracing::info!(
            "generated plan for {}: {} workouts over {} weeks, {:.0} total XSS",
            athlete_id,
            workouts.len(),
            total_weeks,
            total_xss
        );

        Ok(GeneratedPlanResult {
            athlete_id,
            start_date,
            target_date: config.target_date,
            workouts,
            summary: PlanSummary {
                total_weeks,
                total_xss: round_tenth(total_xss),
                avg_weekly_hours,
                phases,
            },
            predicted_fitness,
            warnings,
        })
    }

    /// Rough weekly stress estimate for a time budget, used for plan
    /// previews before generation.
    pub fn estimate_weekly_tss(&self, weekly_hours: f64, polarization: PolarizationRatio) -> f64 {
        let hard = polarization.hard_fraction();
        let blended_rate = (1.0 - hard) * WorkoutType::Endurance.tss_per_hour()
            + hard * WorkoutType::Threshold.tss_per_hour();
        round_tenth(weekly_hours.max(0.0) * blended_rate)
    }
}

impl Default for PlanGenerationService {
    fn default() -> Self {
        Self::new()
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::signature::FitnessSignature;
    use crate::planner::config::WeekAvailability;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn model() -> FitnessModel {
        FitnessModel::new(FitnessSignature::estimated_from_ftp(250.0))
    }

    #[test]
    fn test_short_horizon_rejected() {
        let service = PlanGenerationService::new();
        let config = ForecastConfig::new(monday() + Duration::days(1));

        let err = service
            .generate_plan_from(monday(), Uuid::new_v4(), &model(), &config)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_all_unavailable_rejected() {
        let service = PlanGenerationService::new();
        let config = ForecastConfig::new(monday() + Duration::days(56))
            .with_availability(WeekAvailability::none());

        let err = service
            .generate_plan_from(monday(), Uuid::new_v4(), &model(), &config)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_too_short_sessions_rejected() {
        let service = PlanGenerationService::new();
        let config = ForecastConfig::new(monday() + Duration::days(56))
            .with_availability(WeekAvailability::uniform(10));

        let err = service
            .generate_plan_from(monday(), Uuid::new_v4(), &model(), &config)
            .unwrap_err();
        assert!(matches!(err, PlanError::InsufficientAvailability(_)));
    }

    #[test]
    fn test_weekly_hours_clamped_to_availability() {
        let service = PlanGenerationService::new();
        // 3 hours of availability against a 20-hour budget
        let config = ForecastConfig::new(monday() + Duration::days(56))
            .with_weekly_hours(20.0)
            .with_availability(WeekAvailability::uniform(26));

        let result = service
            .generate_plan_from(monday(), Uuid::new_v4(), &model(), &config)
            .unwrap();
        // A scheduled week can never exceed what the days allow
        assert!(result.summary.avg_weekly_hours <= 7.0 * 26.0 / 60.0 + 0.1);
    }

    #[test]
    fn test_estimate_weekly_tss() {
        let service = PlanGenerationService::new();
        let polarized = service.estimate_weekly_tss(10.0, PolarizationRatio::new(80, 20));
        // 0.8 x 50 + 0.2 x 85 = 57 TSS/hour
        assert!((polarized - 570.0).abs() < 0.1);

        let harder = service.estimate_weekly_tss(10.0, PolarizationRatio::new(50, 50));
        assert!(harder > polarized);
    }
}

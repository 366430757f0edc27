//! Plan simulation and predicted end-state fitness.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::scheduler::PlannedWorkout;
use crate::fitness::load::{FitnessModel, LoadAccumulator, TrainingLoad3d};
use crate::fitness::status::TrainingStatus;

/// Horizons shorter than this carry a low-confidence warning (weeks).
const MIN_CONFIDENT_WEEKS: u32 = 4;
/// Horizons longer than this carry a low-confidence warning (weeks).
const MAX_CONFIDENT_WEEKS: u32 = 52;

/// Predicted fitness on the goal date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedFitness {
    /// Predicted threshold power in watts
    pub threshold_power: f64,
    /// Predicted high-intensity energy in kJ
    pub high_intensity_energy: f64,
    /// Predicted peak power in watts
    pub peak_power: f64,
    /// Training load on the goal date
    pub training_load: TrainingLoad3d,
    /// Recovery load on the goal date
    pub recovery_load: TrainingLoad3d,
    /// Form on the goal date
    pub form: TrainingLoad3d,
    /// Readiness classification on the goal date
    pub status: TrainingStatus,
}

/// Non-fatal conditions attached to a generated plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlanWarning {
    /// The horizon is unusually short or long; treat the prediction as
    /// low confidence.
    LowConfidenceForecast { total_weeks: u32 },
}

impl PlanWarning {
    pub fn message(&self) -> String {
        match self {
            PlanWarning::LowConfidenceForecast { total_weeks } => format!(
                "Forecast over {total_weeks} weeks is low confidence; treat predicted fitness as a rough guide"
            ),
        }
    }
}

impl std::fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Simulates a plan against the fitness model to predict the end state.
pub struct PlanForecaster {
    accumulator: LoadAccumulator,
    /// Per training-load point of low-system gain, fractional TP change
    tp_gain: f64,
    /// Per training-load point of high-system gain, fractional HIE change
    hie_gain: f64,
    /// Per training-load point of peak-system gain, fractional PP change
    pp_gain: f64,
}

impl PlanForecaster {
    pub fn new() -> Self {
        Self {
            accumulator: LoadAccumulator::new(),
            tp_gain: 0.004,
            hie_gain: 0.005,
            pp_gain: 0.003,
        }
    }

    /// Replay every calendar day from the day after `today` through
    /// `target_date`: workout days apply their target strain, the rest are
    /// decay-only steps. Skipping rest-day decay would silently overstate
    /// fitness, so the model advances once per day, not once per workout.
    pub fn forecast(
        &self,
        model: &FitnessModel,
        today: NaiveDate,
        target_date: NaiveDate,
        workouts: &[PlannedWorkout],
    ) -> PredictedFitness {
        let by_date: BTreeMap<NaiveDate, &PlannedWorkout> =
            workouts.iter().map(|w| (w.date, w)).collect();

        let start_tl = model.training_load();
        let start_rl = model.recovery_load();

        let mut current = model.clone();
        let mut date = today + Duration::days(1);
        while date <= target_date {
            current = match by_date.get(&date) {
                Some(workout) => current.with_workout(&self.accumulator, &workout.target_xss, 1.0),
                None => current.with_rest_day(&self.accumulator),
            };
            date += Duration::days(1);
        }

        let end_tl = current.training_load();
        let end_rl = current.recovery_load();
        let signature = model.signature();

        // Per-system gain: chronic load built, net of half the added acute
        // fatigue
        let gain_low = (end_tl.low - start_tl.low) - 0.5 * (end_rl.low - start_rl.low);
        let gain_high = (end_tl.high - start_tl.high) - 0.5 * (end_rl.high - start_rl.high);
        let gain_peak = (end_tl.peak - start_tl.peak) - 0.5 * (end_rl.peak - start_rl.peak);

        let threshold_power = bounded_gain(signature.threshold_power, self.tp_gain * gain_low, 0.15);
        let high_intensity_energy =
            bounded_gain(signature.high_intensity_energy, self.hie_gain * gain_high, 0.20);
        let peak_power = bounded_gain(signature.peak_power, self.pp_gain * gain_peak, 0.10);

        PredictedFitness {
            threshold_power,
            high_intensity_energy,
            peak_power: peak_power.max(threshold_power),
            training_load: end_tl,
            recovery_load: end_rl,
            form: current.form(),
            status: current.status(),
        }
    }

    /// Warning for horizons outside the band the model is calibrated for.
    pub fn horizon_warning(&self, total_weeks: u32) -> Option<PlanWarning> {
        (!(MIN_CONFIDENT_WEEKS..=MAX_CONFIDENT_WEEKS).contains(&total_weeks))
            .then_some(PlanWarning::LowConfidenceForecast { total_weeks })
    }
}

impl Default for PlanForecaster {
    fn default() -> Self {
        Self::new()
    }
}

fn bounded_gain(base: f64, fractional_change: f64, bound: f64) -> f64 {
    let factor = (1.0 + fractional_change).clamp(1.0 - bound, 1.0 + bound);
    round_tenth(base * factor)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::load::XssBreakdown;
    use crate::fitness::signature::FitnessSignature;
    use crate::planner::phases::PhaseName;
    use crate::workouts::types::WorkoutType;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn endurance_workout(date: NaiveDate, total: f64) -> PlannedWorkout {
        PlannedWorkout {
            date,
            name: "test".to_string(),
            workout_type: WorkoutType::Endurance,
            duration_minutes: 60,
            target_tss: total as u32,
            target_xss: XssBreakdown {
                total,
                low: total * 0.8,
                high: total * 0.15,
                peak: total * 0.05,
            },
            phase: PhaseName::Base,
            description: String::new(),
            intervals: None,
        }
    }

    #[test]
    fn test_consistent_training_raises_threshold_prediction() {
        let forecaster = PlanForecaster::new();
        let model = FitnessModel::new(FitnessSignature::estimated_from_ftp(250.0));

        let today = monday();
        let target = today + Duration::days(56);
        let workouts: Vec<PlannedWorkout> = (1..=56)
            .filter(|d| d % 7 != 0) // one rest day a week
            .map(|d| endurance_workout(today + Duration::days(d), 60.0))
            .collect();

        let predicted = forecaster.forecast(&model, today, target, &workouts);

        assert!(predicted.threshold_power > 250.0);
        assert!(predicted.training_load.low > 0.0);
        // Gains stay within the calibration bound
        assert!(predicted.threshold_power <= 250.0 * 1.15 + 0.1);
    }

    #[test]
    fn test_empty_plan_decays_toward_detraining() {
        let forecaster = PlanForecaster::new();
        let model = FitnessModel::with_loads(
            FitnessSignature::estimated_from_ftp(250.0),
            TrainingLoad3d::new(40.0, 20.0, 10.0),
            TrainingLoad3d::new(20.0, 10.0, 5.0),
        );

        let today = monday();
        let target = today + Duration::days(90);
        let predicted = forecaster.forecast(&model, today, target, &[]);

        assert!(predicted.training_load.low < 40.0);
        // No training means the prediction never rises
        assert!(predicted.threshold_power <= 250.0);
        assert_eq!(predicted.status, TrainingStatus::Detraining);
    }

    #[test]
    fn test_peak_power_never_predicted_below_threshold() {
        let forecaster = PlanForecaster::new();
        // Peak barely above threshold so a downward peak gain would cross it
        let model = FitnessModel::new(FitnessSignature::new(250.0, 20.0, 255.0));

        let today = monday();
        let target = today + Duration::days(56);
        let predicted = forecaster.forecast(&model, today, target, &[]);

        assert!(predicted.peak_power >= predicted.threshold_power);
    }

    #[test]
    fn test_horizon_warnings() {
        let forecaster = PlanForecaster::new();
        assert!(forecaster.horizon_warning(2).is_some());
        assert!(forecaster.horizon_warning(4).is_none());
        assert!(forecaster.horizon_warning(52).is_none());
        assert!(forecaster.horizon_warning(60).is_some());
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let forecaster = PlanForecaster::new();
        let model = FitnessModel::new(FitnessSignature::estimated_from_ftp(220.0));
        let today = monday();
        let target = today + Duration::days(28);
        let workouts: Vec<PlannedWorkout> = (1..=28)
            .map(|d| endurance_workout(today + Duration::days(d), 50.0))
            .collect();

        let a = forecaster.forecast(&model, today, target, &workouts);
        let b = forecaster.forecast(&model, today, target, &workouts);
        assert_eq!(a, b);
    }
}

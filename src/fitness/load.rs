//! Three-system training load model (impulse-response with per-system decay).
//!
//! Implements the multi-system load model the planner is built on:
//! - Training Load (TL): chronic fitness accumulation, slow decay
//! - Recovery Load (RL): acute fatigue accumulation, fast decay
//! - Form: TL - RL (readiness indicator, signed)
//!
//! Each quantity is tracked per energy system (low/aerobic, high/anaerobic,
//! peak/neuromuscular) with its own time constant, because sprint fitness
//! fades on a different clock than aerobic base.

use serde::{Deserialize, Serialize};

use super::signature::FitnessSignature;
use super::status::{StatusClassifier, TrainingStatus};
use crate::workouts::types::WorkoutType;

/// Per-system scalar triple used for training load, recovery load, and form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoad3d {
    /// Low (aerobic) system
    pub low: f64,
    /// High (anaerobic) system
    pub high: f64,
    /// Peak (neuromuscular) system
    pub peak: f64,
}

impl TrainingLoad3d {
    /// Zero-valued triple.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn new(low: f64, high: f64, peak: f64) -> Self {
        Self { low, high, peak }
    }

    /// Sum across all three systems.
    pub fn total(&self) -> f64 {
        self.low + self.high + self.peak
    }
}

/// Training impulse of a single workout, split across the three systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct XssBreakdown {
    /// Total strain score
    pub total: f64,
    /// Low (aerobic) share
    pub low: f64,
    /// High (anaerobic) share
    pub high: f64,
    /// Peak (neuromuscular) share
    pub peak: f64,
}

impl XssBreakdown {
    /// The zero impulse (a rest day).
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0.0 && self.low == 0.0 && self.high == 0.0 && self.peak == 0.0
    }

    /// Combine two impulses (multiple sessions on one day).
    pub fn combined(&self, other: &XssBreakdown) -> XssBreakdown {
        XssBreakdown {
            total: self.total + other.total,
            low: self.low + other.low,
            high: self.high + other.high,
            peak: self.peak + other.peak,
        }
    }
}

/// Exponential time constants in days, one per system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeConstants {
    pub low: f64,
    pub high: f64,
    pub peak: f64,
}

impl TimeConstants {
    /// Training load constants: aerobic fitness adapts slowly, the high and
    /// peak systems on a moderate clock.
    pub const TRAINING: TimeConstants = TimeConstants {
        low: 60.0,
        high: 22.0,
        peak: 22.0,
    };

    /// Recovery load constants: fatigue clears much faster than fitness
    /// fades.
    pub const RECOVERY: TimeConstants = TimeConstants {
        low: 7.0,
        high: 5.0,
        peak: 5.0,
    };

    fn decay(&self, days: f64) -> (f64, f64, f64) {
        (
            (-days / self.low).exp(),
            (-days / self.high).exp(),
            (-days / self.peak).exp(),
        )
    }

    /// Per-day EWMA smoothing factor, 1 - e^(-1/tau) per system.
    ///
    /// Scaling impulses by this keeps a load curve's equilibrium equal to
    /// the average daily impulse (the classical CTL/ATL normalization)
    /// instead of growing with the time constant.
    fn smoothing(&self) -> (f64, f64, f64) {
        (
            1.0 - (-1.0 / self.low).exp(),
            1.0 - (-1.0 / self.high).exp(),
            1.0 - (-1.0 / self.peak).exp(),
        )
    }
}

/// Converts workouts into per-system impulses and folds them into the
/// decaying load curves.
#[derive(Debug, Clone)]
pub struct LoadAccumulator {
    training: TimeConstants,
    recovery: TimeConstants,
}

impl LoadAccumulator {
    /// Create with the standard constants.
    pub fn new() -> Self {
        Self {
            training: TimeConstants::TRAINING,
            recovery: TimeConstants::RECOVERY,
        }
    }

    /// Create with custom constants.
    pub fn with_constants(training: TimeConstants, recovery: TimeConstants) -> Self {
        Self { training, recovery }
    }

    /// Estimate the impulse of a planned workout.
    ///
    /// The total follows the classical stress-score form (hours x IF^2 x 100,
    /// IF relative to threshold power) and is split across systems by the
    /// workout type's fixed allocation, then adjusted:
    /// - long efforts (over 2 h) shift strain toward the aerobic system
    /// - types whose top-end power exceeds 120% of threshold add peak-system
    ///   strain, damped when the athlete's peak power dwarfs that ceiling
    /// - the high-system share scales against the athlete's anaerobic
    ///   reservoir
    ///
    /// Zero duration, a non-positive intensity, or a signature without a
    /// threshold power all yield a zero impulse, never an error.
    pub fn impulse_for(
        &self,
        workout_type: WorkoutType,
        duration_minutes: u32,
        intensity_factor: f64,
        signature: &FitnessSignature,
    ) -> XssBreakdown {
        if duration_minutes == 0 || intensity_factor <= 0.0 || signature.threshold_power <= 0.0 {
            return XssBreakdown::zero();
        }

        let hours = f64::from(duration_minutes) / 60.0;
        let total = hours * intensity_factor * intensity_factor * 100.0;

        let (mut low, mut high, mut peak) = workout_type.system_split();

        if hours > 2.0 {
            let shift = ((hours - 2.0) * 0.05).min(0.15);
            low += shift;
            high -= shift * 0.7;
            peak -= shift * 0.3;
        }

        let top_end = workout_type.power_range().1 * signature.threshold_power;
        if top_end > signature.threshold_power * 1.2 && signature.peak_power > 0.0 {
            let spike = (top_end / signature.threshold_power - 1.2) * 0.1;
            let damping = (2.0 * signature.threshold_power / signature.peak_power).clamp(0.5, 1.5);
            let bonus = (spike * damping).min(0.15);
            peak += bonus;
            high -= bonus * 0.7;
            low -= bonus * 0.3;
        }

        if signature.high_intensity_energy > 0.0 {
            let hie_ref = signature.threshold_power * 0.1;
            high *= (hie_ref / signature.high_intensity_energy).clamp(0.7, 1.3);
        }

        let low = low.max(0.0);
        let high = high.max(0.0);
        let peak = peak.max(0.0);
        let sum = low + high + peak;
        if sum <= 0.0 {
            return XssBreakdown::zero();
        }

        XssBreakdown {
            total: round_tenth(total),
            low: round_tenth(total * low / sum),
            high: round_tenth(total * high / sum),
            peak: round_tenth(total * peak / sum),
        }
    }

    /// Advance both load curves by `days_elapsed` of decay, then fold the
    /// impulse in as an EWMA step.
    pub fn advance(
        &self,
        training_load: TrainingLoad3d,
        recovery_load: TrainingLoad3d,
        impulse: &XssBreakdown,
        days_elapsed: f64,
    ) -> (TrainingLoad3d, TrainingLoad3d) {
        let days = days_elapsed.max(0.0);
        let (tl_low, tl_high, tl_peak) = self.training.decay(days);
        let (rl_low, rl_high, rl_peak) = self.recovery.decay(days);
        let (tk_low, tk_high, tk_peak) = self.training.smoothing();
        let (rk_low, rk_high, rk_peak) = self.recovery.smoothing();

        let training = TrainingLoad3d {
            low: training_load.low * tl_low + impulse.low * tk_low,
            high: training_load.high * tl_high + impulse.high * tk_high,
            peak: training_load.peak * tl_peak + impulse.peak * tk_peak,
        };
        let recovery = TrainingLoad3d {
            low: recovery_load.low * rl_low + impulse.low * rk_low,
            high: recovery_load.high * rl_high + impulse.high * rk_high,
            peak: recovery_load.peak * rl_peak + impulse.peak * rk_peak,
        };

        (training, recovery)
    }
}

impl Default for LoadAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Read-only snapshot of the full modeled state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessState {
    pub signature: FitnessSignature,
    pub training_load: TrainingLoad3d,
    pub recovery_load: TrainingLoad3d,
    pub form: TrainingLoad3d,
    pub status: TrainingStatus,
}

/// An athlete's modeled fitness: signature plus the two decaying load
/// curves.
///
/// Updates are functional: `with_workout` and `with_rest_day` return a new
/// model, so a scheduler can explore hypothetical sequences without
/// snapshotting or rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessModel {
    signature: FitnessSignature,
    training_load: TrainingLoad3d,
    recovery_load: TrainingLoad3d,
}

impl FitnessModel {
    /// A model with no training history.
    pub fn new(signature: FitnessSignature) -> Self {
        Self {
            signature,
            training_load: TrainingLoad3d::zero(),
            recovery_load: TrainingLoad3d::zero(),
        }
    }

    /// A model seeded from an existing load snapshot. Negative load values
    /// are clamped to zero.
    pub fn with_loads(
        signature: FitnessSignature,
        training_load: TrainingLoad3d,
        recovery_load: TrainingLoad3d,
    ) -> Self {
        Self {
            signature,
            training_load: clamp_non_negative(training_load),
            recovery_load: clamp_non_negative(recovery_load),
        }
    }

    pub fn signature(&self) -> &FitnessSignature {
        &self.signature
    }

    pub fn training_load(&self) -> TrainingLoad3d {
        self.training_load
    }

    pub fn recovery_load(&self) -> TrainingLoad3d {
        self.recovery_load
    }

    /// Form = training load - recovery load, per system.
    pub fn form(&self) -> TrainingLoad3d {
        TrainingLoad3d {
            low: self.training_load.low - self.recovery_load.low,
            high: self.training_load.high - self.recovery_load.high,
            peak: self.training_load.peak - self.recovery_load.peak,
        }
    }

    /// Current readiness classification.
    pub fn status(&self) -> TrainingStatus {
        StatusClassifier::new().classify(&self.training_load, &self.form())
    }

    /// Full read-only snapshot.
    pub fn current_state(&self) -> FitnessState {
        FitnessState {
            signature: self.signature.clone(),
            training_load: self.training_load,
            recovery_load: self.recovery_load,
            form: self.form(),
            status: self.status(),
        }
    }

    /// Return a new model advanced by `days_elapsed` of decay with the
    /// impulse applied. The receiver is untouched.
    pub fn with_workout(
        &self,
        accumulator: &LoadAccumulator,
        impulse: &XssBreakdown,
        days_elapsed: f64,
    ) -> FitnessModel {
        let (training_load, recovery_load) =
            accumulator.advance(self.training_load, self.recovery_load, impulse, days_elapsed);
        FitnessModel {
            signature: self.signature.clone(),
            training_load,
            recovery_load,
        }
    }

    /// Return a new model advanced one day with no training (decay only).
    pub fn with_rest_day(&self, accumulator: &LoadAccumulator) -> FitnessModel {
        self.with_workout(accumulator, &XssBreakdown::zero(), 1.0)
    }
}

fn clamp_non_negative(load: TrainingLoad3d) -> TrainingLoad3d {
    TrainingLoad3d {
        low: load.low.max(0.0),
        high: load.high.max(0.0),
        peak: load.peak.max(0.0),
    }
}

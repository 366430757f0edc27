//! Training readiness classification from form values.

use serde::{Deserialize, Serialize};

use super::load::TrainingLoad3d;

/// Training readiness status derived from the form triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    /// Extended recovery, high readiness across all systems
    VeryFresh,
    /// Recovered, ready for training
    Fresh,
    /// High/peak systems need recovery, aerobic base still solid
    Tired,
    /// All systems need recovery
    VeryTired,
    /// Prolonged inactivity, fitness fading
    Detraining,
}

impl TrainingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TrainingStatus::VeryFresh => "Very Fresh",
            TrainingStatus::Fresh => "Fresh",
            TrainingStatus::Tired => "Tired",
            TrainingStatus::VeryTired => "Very Tired",
            TrainingStatus::Detraining => "Detraining",
        }
    }

    /// Coaching guidance for this status.
    pub fn description(&self) -> &'static str {
        match self {
            TrainingStatus::VeryFresh => "Fully recovered - a good day for a breakthrough effort",
            TrainingStatus::Fresh => "Recovered and ready for quality training",
            TrainingStatus::Tired => "Carrying fatigue - keep intensity easy today",
            TrainingStatus::VeryTired => "All systems fatigued - rest or very easy spinning only",
            TrainingStatus::Detraining => "Training load is very low - fitness is fading",
        }
    }
}

impl std::fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classifies a form triple into a training status via fixed thresholds.
///
/// Total over all real-valued inputs; there is no failure mode.
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier {
    /// Total training load below which the athlete counts as detraining
    detraining_load: f64,
    /// Weighted form above which the athlete counts as very fresh
    fresh_form: f64,
}

impl StatusClassifier {
    pub fn new() -> Self {
        Self {
            detraining_load: 10.0,
            fresh_form: 10.0,
        }
    }

    /// Overall form as a weighted average. The low system carries most of
    /// the weight since it represents base fitness.
    pub fn weighted_form(&self, form: &TrainingLoad3d) -> f64 {
        form.low * 0.5 + form.high * 0.3 + form.peak * 0.2
    }

    /// Classify the current state.
    pub fn classify(&self, training_load: &TrainingLoad3d, form: &TrainingLoad3d) -> TrainingStatus {
        if training_load.total() < self.detraining_load {
            return TrainingStatus::Detraining;
        }

        let all_negative = form.low < 0.0 && form.high < 0.0 && form.peak < 0.0;
        let all_positive = form.low >= 0.0 && form.high >= 0.0 && form.peak >= 0.0;

        if all_negative {
            TrainingStatus::VeryTired
        } else if all_positive && self.weighted_form(form) > self.fresh_form {
            TrainingStatus::VeryFresh
        } else if all_positive || form.low >= 0.0 {
            TrainingStatus::Fresh
        } else {
            TrainingStatus::Tired
        }
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

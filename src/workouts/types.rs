//! Workout type taxonomy and per-type template data.

use serde::{Deserialize, Serialize};

/// Polarization bucket a workout falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Low-stress aerobic work
    Easy,
    /// Quality session that needs recovery around it
    Hard,
}

impl Intensity {
    pub fn label(&self) -> &'static str {
        match self {
            Intensity::Easy => "Easy",
            Intensity::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Workout type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    /// Steady zone 2 riding
    Endurance,
    /// Sustained sub-threshold effort
    Tempo,
    /// Sweet spot / threshold intervals
    Threshold,
    /// Short high-intensity intervals
    Vo2max,
    /// Easy spinning
    Recovery,
    /// Maximal short sprints
    Sprint,
    /// Race simulation
    Race,
}

impl WorkoutType {
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::Endurance => "Endurance",
            WorkoutType::Tempo => "Tempo",
            WorkoutType::Threshold => "Threshold",
            WorkoutType::Vo2max => "VO2max",
            WorkoutType::Recovery => "Recovery",
            WorkoutType::Sprint => "Sprint",
            WorkoutType::Race => "Race",
        }
    }

    /// One-line description used on generated workouts.
    pub fn description(&self) -> &'static str {
        match self {
            WorkoutType::Endurance => "Steady Zone 2 ride",
            WorkoutType::Tempo => "Sustained tempo effort",
            WorkoutType::Threshold => "Sweet spot intervals",
            WorkoutType::Vo2max => "High intensity intervals",
            WorkoutType::Recovery => "Easy spin recovery",
            WorkoutType::Sprint => "Sprint intervals",
            WorkoutType::Race => "Race simulation",
        }
    }

    /// Target power range as a fraction of threshold power.
    pub fn power_range(&self) -> (f64, f64) {
        match self {
            WorkoutType::Endurance => (0.55, 0.75),
            WorkoutType::Tempo => (0.76, 0.87),
            WorkoutType::Threshold => (0.88, 0.94),
            WorkoutType::Vo2max => (1.06, 1.20),
            WorkoutType::Recovery => (0.40, 0.55),
            WorkoutType::Sprint => (1.50, 2.00),
            WorkoutType::Race => (0.95, 1.10),
        }
    }

    /// Typical stress score accumulated per hour of this workout.
    pub fn tss_per_hour(&self) -> f64 {
        match self {
            WorkoutType::Endurance => 50.0,
            WorkoutType::Tempo => 70.0,
            WorkoutType::Threshold => 85.0,
            WorkoutType::Vo2max => 100.0,
            WorkoutType::Recovery => 30.0,
            WorkoutType::Sprint => 110.0,
            WorkoutType::Race => 95.0,
        }
    }

    /// Representative intensity factor for the session as a whole.
    pub fn reference_if(&self) -> f64 {
        match self {
            WorkoutType::Endurance => 0.65,
            WorkoutType::Tempo => 0.82,
            WorkoutType::Threshold => 0.91,
            WorkoutType::Vo2max => 1.10,
            WorkoutType::Recovery => 0.55,
            WorkoutType::Sprint => 1.30,
            WorkoutType::Race => 0.95,
        }
    }

    /// Fixed strain allocation across the low/high/peak systems.
    pub fn system_split(&self) -> (f64, f64, f64) {
        match self {
            WorkoutType::Endurance => (0.80, 0.15, 0.05),
            WorkoutType::Tempo => (0.60, 0.30, 0.10),
            WorkoutType::Threshold => (0.40, 0.45, 0.15),
            WorkoutType::Vo2max => (0.30, 0.40, 0.30),
            WorkoutType::Recovery => (0.85, 0.10, 0.05),
            WorkoutType::Sprint => (0.20, 0.35, 0.45),
            WorkoutType::Race => (0.35, 0.40, 0.25),
        }
    }

    /// Which polarization bucket this workout counts against.
    pub fn intensity(&self) -> Intensity {
        match self {
            WorkoutType::Endurance | WorkoutType::Recovery => Intensity::Easy,
            WorkoutType::Tempo
            | WorkoutType::Threshold
            | WorkoutType::Vo2max
            | WorkoutType::Sprint
            | WorkoutType::Race => Intensity::Hard,
        }
    }

    /// Whether this workout counts as a hard session.
    pub fn is_hard(&self) -> bool {
        self.intensity() == Intensity::Hard
    }
}

impl std::fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

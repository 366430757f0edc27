//! Interval structure generation for quality sessions.
//!
//! Tempo, threshold, and VO2max workouts carry a structured warmup /
//! main-set / cooldown breakdown so downstream exporters can turn them into
//! device files. Power values are fractions of threshold power.

use serde::{Deserialize, Serialize};

use super::types::WorkoutType;

const WARMUP_SECONDS: u32 = 600;
const COOLDOWN_SECONDS: u32 = 300;

/// A warmup or cooldown ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampSegment {
    /// Duration in seconds
    pub duration_seconds: u32,
    /// Starting power as a fraction of threshold
    pub power_low: f64,
    /// Ending power as a fraction of threshold
    pub power_high: f64,
}

/// A repeated work/rest block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalSet {
    /// Work duration in seconds
    pub duration_seconds: u32,
    /// Work power as a fraction of threshold
    pub power: f64,
    /// Rest duration in seconds
    pub rest_duration_seconds: u32,
    /// Rest power as a fraction of threshold
    pub rest_power: f64,
    /// Number of repeats
    pub repeats: u32,
}

impl IntervalSet {
    /// Total seconds spent in this set, rests included.
    pub fn total_seconds(&self) -> u32 {
        (self.duration_seconds + self.rest_duration_seconds) * self.repeats
    }
}

/// Complete interval breakdown of a structured workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStructure {
    pub warmup: RampSegment,
    pub intervals: Vec<IntervalSet>,
    pub cooldown: RampSegment,
}

impl IntervalStructure {
    /// Build the interval structure for a workout, if the type has one.
    ///
    /// Endurance, recovery, and unstructured types return `None`. The repeat
    /// count is fitted to the time left after warmup and cooldown, clamped
    /// to the sensible range for each type.
    pub fn for_workout(workout_type: WorkoutType, duration_minutes: u32) -> Option<Self> {
        let total_seconds = duration_minutes * 60;
        let main_set = total_seconds.saturating_sub(WARMUP_SECONDS + COOLDOWN_SECONDS);

        let set = match workout_type {
            WorkoutType::Vo2max => IntervalSet {
                duration_seconds: 180,
                power: 1.10,
                rest_duration_seconds: 180,
                rest_power: 0.50,
                repeats: fit_repeats(main_set, 360, 3, 8),
            },
            WorkoutType::Threshold => IntervalSet {
                duration_seconds: 600,
                power: 0.91,
                rest_duration_seconds: 300,
                rest_power: 0.55,
                repeats: fit_repeats(main_set, 900, 2, 4),
            },
            WorkoutType::Tempo => IntervalSet {
                duration_seconds: 900,
                power: 0.82,
                rest_duration_seconds: 300,
                rest_power: 0.55,
                repeats: fit_repeats(main_set, 1200, 2, 3),
            },
            _ => return None,
        };

        Some(Self {
            warmup: RampSegment {
                duration_seconds: WARMUP_SECONDS,
                power_low: 0.5,
                power_high: 0.7,
            },
            intervals: vec![set],
            cooldown: RampSegment {
                duration_seconds: COOLDOWN_SECONDS,
                power_low: 0.5,
                power_high: 0.6,
            },
        })
    }

    /// Total structured seconds, warmup and cooldown included.
    pub fn total_seconds(&self) -> u32 {
        self.warmup.duration_seconds
            + self.cooldown.duration_seconds
            + self.intervals.iter().map(IntervalSet::total_seconds).sum::<u32>()
    }
}

fn fit_repeats(main_set_seconds: u32, block_seconds: u32, min: u32, max: u32) -> u32 {
    (main_set_seconds / block_seconds).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vo2max_structure() {
        let structure = IntervalStructure::for_workout(WorkoutType::Vo2max, 60).unwrap();

        assert_eq!(structure.warmup.duration_seconds, 600);
        assert_eq!(structure.cooldown.duration_seconds, 300);
        let set = structure.intervals[0];
        assert_eq!(set.duration_seconds, 180);
        assert!((set.power - 1.10).abs() < 0.001);
        // 45 minutes of main set fits 7 full 6-minute blocks
        assert_eq!(set.repeats, 7);
    }

    #[test]
    fn test_threshold_repeats_clamped() {
        // 3 hours would fit far more than 4 blocks
        let long = IntervalStructure::for_workout(WorkoutType::Threshold, 180).unwrap();
        assert_eq!(long.intervals[0].repeats, 4);

        // A short session still gets the minimum
        let short = IntervalStructure::for_workout(WorkoutType::Threshold, 20).unwrap();
        assert_eq!(short.intervals[0].repeats, 2);
    }

    #[test]
    fn test_short_duration_does_not_underflow() {
        // Shorter than warmup + cooldown alone
        let structure = IntervalStructure::for_workout(WorkoutType::Tempo, 10).unwrap();
        assert_eq!(structure.intervals[0].repeats, 2);
    }

    #[test]
    fn test_easy_types_have_no_structure() {
        assert!(IntervalStructure::for_workout(WorkoutType::Endurance, 90).is_none());
        assert!(IntervalStructure::for_workout(WorkoutType::Recovery, 30).is_none());
        assert!(IntervalStructure::for_workout(WorkoutType::Sprint, 45).is_none());
    }

    #[test]
    fn test_total_seconds() {
        let structure = IntervalStructure::for_workout(WorkoutType::Threshold, 60).unwrap();
        // warmup 600 + cooldown 300 + 3 x (600 + 300)
        assert_eq!(structure.total_seconds(), 600 + 300 + 3 * 900);
    }
}

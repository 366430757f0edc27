//! Periodized phase timeline construction.
//!
//! Splits the horizon between now and the goal date into the canonical
//! Base / Build / Peak / Taper archetypes, weighted by the periodization
//! level and program type.

use serde::{Deserialize, Serialize};

use super::config::ProgramType;
use crate::workouts::types::WorkoutType;

/// Named phase archetype in the periodized timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    /// Aerobic foundation
    Base,
    /// Threshold development
    Build,
    /// Race-specific sharpening
    Peak,
    /// Volume reduction into the goal
    Taper,
}

impl PhaseName {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseName::Base => "Base",
            PhaseName::Build => "Build",
            PhaseName::Peak => "Peak",
            PhaseName::Taper => "Taper",
        }
    }

    /// Weekly volume multiplier as the phase progresses (0.0 - 1.0).
    ///
    /// Base ramps volume in, Build nudges past the budget, Peak holds it,
    /// Taper sheds it toward the goal.
    pub fn volume_multiplier(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            PhaseName::Base => 0.8 + 0.2 * progress,
            PhaseName::Build => 1.0 + 0.1 * progress,
            PhaseName::Peak => 1.0,
            PhaseName::Taper => 0.8 - 0.3 * progress,
        }
    }

    /// Quality-session candidates for this phase with their target shares.
    pub fn hard_candidates(&self) -> &'static [(WorkoutType, f64)] {
        match self {
            PhaseName::Base => &[(WorkoutType::Tempo, 1.0)],
            PhaseName::Build => &[(WorkoutType::Threshold, 0.7), (WorkoutType::Vo2max, 0.3)],
            PhaseName::Peak => &[(WorkoutType::Vo2max, 0.7), (WorkoutType::Sprint, 0.3)],
            PhaseName::Taper => &[(WorkoutType::Threshold, 1.0)],
        }
    }

    /// Easy-session candidates for this phase with their target shares.
    pub fn easy_candidates(&self) -> &'static [(WorkoutType, f64)] {
        match self {
            PhaseName::Base | PhaseName::Build => {
                &[(WorkoutType::Endurance, 0.8), (WorkoutType::Recovery, 0.2)]
            }
            PhaseName::Peak => &[(WorkoutType::Endurance, 0.7), (WorkoutType::Recovery, 0.3)],
            PhaseName::Taper => &[(WorkoutType::Recovery, 0.7), (WorkoutType::Endurance, 0.3)],
        }
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A contiguous span of whole weeks with one training emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    pub weeks: u32,
}

/// Find the phase a zero-based week index falls in, along with progress
/// through that phase (0.0 at its first week).
pub fn phase_for_week(phases: &[Phase], week_index: u32) -> Option<(PhaseName, f64)> {
    let mut start = 0;
    for phase in phases {
        if week_index < start + phase.weeks {
            let progress = if phase.weeks > 1 {
                f64::from(week_index - start) / f64::from(phase.weeks - 1)
            } else {
                0.0
            };
            return Some((phase.name, progress));
        }
        start += phase.weeks;
    }
    None
}

/// Divides the planning horizon into phases.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodizationPlanner;

impl PeriodizationPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Produce the phase timeline for a horizon of whole weeks.
    ///
    /// Phase lengths are proportional to weight curves in the periodization
    /// level (low levels lengthen Base, high levels grow Peak and Taper),
    /// remainders go to Base first, then Build, then Peak. Race programs
    /// always keep at least one Taper week; event programs do once the
    /// horizon reaches six weeks, and an event readiness of 4+ stretches
    /// the taper to two weeks when the horizon can afford it. Phases that
    /// come out at zero weeks are dropped, so every emitted phase spans at
    /// least one week and the weeks always sum to the horizon.
    pub fn plan(
        &self,
        total_weeks: u32,
        program_type: ProgramType,
        periodization_level: u8,
        event_readiness: u8,
    ) -> Vec<Phase> {
        if total_weeks == 0 {
            return Vec::new();
        }

        let p = f64::from(periodization_level.min(100)) / 100.0;
        let weights = [
            0.55 - 0.30 * p,
            0.25 + 0.10 * p,
            0.12 + 0.12 * p,
            0.08 + 0.08 * p,
        ];

        let mut weeks = [0u32; 4];
        for (allocated, weight) in weeks.iter_mut().zip(weights) {
            *allocated = (f64::from(total_weeks) * weight).floor() as u32;
        }

        let mut remainder = total_weeks - weeks.iter().sum::<u32>();
        let mut slot = 0;
        while remainder > 0 {
            weeks[slot % 4] += 1;
            slot += 1;
            remainder -= 1;
        }

        let mut taper_min = match program_type {
            ProgramType::Race => 1,
            ProgramType::Event if total_weeks >= 6 => 1,
            _ => 0,
        };
        if taper_min > 0 && event_readiness >= 4 && total_weeks >= 8 {
            taper_min = 2;
        }
        while weeks[3] < taper_min {
            // Take the week from the longest earlier phase, preferring the
            // one closest to the taper on ties
            let donor = (0..3)
                .filter(|&i| weeks[i] > 0)
                .max_by_key(|&i| (weeks[i], i));
            match donor {
                Some(i) => {
                    weeks[i] -= 1;
                    weeks[3] += 1;
                }
                None => break,
            }
        }

        const NAMES: [PhaseName; 4] = [
            PhaseName::Base,
            PhaseName::Build,
            PhaseName::Peak,
            PhaseName::Taper,
        ];
        NAMES
            .into_iter()
            .zip(weeks)
            .filter(|(_, w)| *w > 0)
            .map(|(name, weeks)| Phase { name, weeks })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(phases: &[Phase]) -> u32 {
        phases.iter().map(|p| p.weeks).sum()
    }

    #[test]
    fn test_eight_week_goal_plan() {
        let planner = PeriodizationPlanner::new();
        let phases = planner.plan(8, ProgramType::Goal, 50, 3);

        assert_eq!(total(&phases), 8);
        assert_eq!(
            phases,
            vec![
                Phase {
                    name: PhaseName::Base,
                    weeks: 4
                },
                Phase {
                    name: PhaseName::Build,
                    weeks: 3
                },
                Phase {
                    name: PhaseName::Peak,
                    weeks: 1
                },
            ]
        );
    }

    #[test]
    fn test_twelve_week_plan_shape() {
        let planner = PeriodizationPlanner::new();
        let phases = planner.plan(12, ProgramType::Goal, 50, 3);

        assert_eq!(total(&phases), 12);
        let weeks: Vec<u32> = phases.iter().map(|p| p.weeks).collect();
        assert_eq!(weeks, vec![5, 4, 2, 1]);
    }

    #[test]
    fn test_race_always_tapers() {
        let planner = PeriodizationPlanner::new();
        for horizon in [1, 2, 4, 8, 16] {
            let phases = planner.plan(horizon, ProgramType::Race, 50, 3);
            assert_eq!(total(&phases), horizon);
            assert!(
                phases.iter().any(|p| p.name == PhaseName::Taper && p.weeks >= 1),
                "race plan over {horizon} weeks has no taper"
            );
        }
    }

    #[test]
    fn test_high_readiness_extends_taper() {
        let planner = PeriodizationPlanner::new();
        let standard = planner.plan(12, ProgramType::Race, 50, 3);
        let peaked = planner.plan(12, ProgramType::Race, 50, 5);

        let taper_weeks = |phases: &[Phase]| {
            phases
                .iter()
                .find(|p| p.name == PhaseName::Taper)
                .map_or(0, |p| p.weeks)
        };
        assert_eq!(taper_weeks(&standard), 1);
        assert_eq!(taper_weeks(&peaked), 2);
        assert_eq!(total(&peaked), 12);
    }

    #[test]
    fn test_short_goal_plan_skips_taper() {
        let planner = PeriodizationPlanner::new();
        let phases = planner.plan(4, ProgramType::Goal, 50, 3);

        assert_eq!(total(&phases), 4);
        assert!(phases.iter().all(|p| p.name != PhaseName::Taper));
    }

    #[test]
    fn test_one_week_horizon_collapses_to_single_phase() {
        let planner = PeriodizationPlanner::new();
        let phases = planner.plan(1, ProgramType::Goal, 50, 3);
        assert_eq!(
            phases,
            vec![Phase {
                name: PhaseName::Base,
                weeks: 1
            }]
        );
    }

    #[test]
    fn test_periodization_level_shifts_emphasis() {
        let planner = PeriodizationPlanner::new();
        let early = planner.plan(16, ProgramType::Goal, 0, 3);
        let late = planner.plan(16, ProgramType::Goal, 100, 3);

        let base_weeks = |phases: &[Phase]| {
            phases
                .iter()
                .find(|p| p.name == PhaseName::Base)
                .map_or(0, |p| p.weeks)
        };
        assert!(base_weeks(&early) > base_weeks(&late));
        assert_eq!(total(&early), 16);
        assert_eq!(total(&late), 16);
    }

    #[test]
    fn test_phase_for_week_walks_the_timeline() {
        let phases = vec![
            Phase {
                name: PhaseName::Base,
                weeks: 4,
            },
            Phase {
                name: PhaseName::Build,
                weeks: 3,
            },
        ];

        assert_eq!(phase_for_week(&phases, 0).unwrap().0, PhaseName::Base);
        assert_eq!(phase_for_week(&phases, 3).unwrap().0, PhaseName::Base);
        assert_eq!(phase_for_week(&phases, 4).unwrap().0, PhaseName::Build);
        assert!(phase_for_week(&phases, 7).is_none());

        // Progress runs 0..1 across a phase
        let (_, start) = phase_for_week(&phases, 0).unwrap();
        let (_, end) = phase_for_week(&phases, 3).unwrap();
        assert_eq!(start, 0.0);
        assert_eq!(end, 1.0);
    }

    #[test]
    fn test_volume_multipliers() {
        assert!((PhaseName::Base.volume_multiplier(0.0) - 0.8).abs() < 0.001);
        assert!((PhaseName::Base.volume_multiplier(1.0) - 1.0).abs() < 0.001);
        assert!((PhaseName::Taper.volume_multiplier(1.0) - 0.5).abs() < 0.001);
        assert_eq!(PhaseName::Peak.volume_multiplier(0.5), 1.0);
    }
}

//! Day-by-day constrained workout scheduling.
//!
//! Walks the phase timeline one calendar day at a time, consulting
//! availability, the weekly time budget, the polarization split, and
//! recovery spacing to emit one workout per viable slot. Rest days are
//! omitted from the output. The walk is fully deterministic.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::config::ForecastConfig;
use super::phases::{phase_for_week, Phase, PhaseName};
use crate::fitness::load::{LoadAccumulator, XssBreakdown};
use crate::fitness::signature::FitnessSignature;
use crate::workouts::intervals::IntervalStructure;
use crate::workouts::types::WorkoutType;

/// Shortest session worth scheduling; available days under this are treated
/// as rest days.
pub const MIN_SESSION_MINUTES: u32 = 20;

/// A single scheduled training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkout {
    /// Calendar day of the session
    pub date: NaiveDate,
    /// Display name, e.g. "[Base] Week 2 Tuesday: Tempo"
    pub name: String,
    /// Type of workout
    pub workout_type: WorkoutType,
    /// Planned duration in minutes
    pub duration_minutes: u32,
    /// Target stress score
    pub target_tss: u32,
    /// Target strain split across the three systems
    pub target_xss: XssBreakdown,
    /// Phase this session belongs to
    pub phase: PhaseName,
    /// One-line session description
    pub description: String,
    /// Structured intervals for quality sessions
    pub intervals: Option<IntervalStructure>,
}

impl PlannedWorkout {
    /// Whether this session counts against the hard polarization bucket.
    pub fn is_hard(&self) -> bool {
        self.workout_type.is_hard()
    }
}

/// Greedy daily scheduler over a phase timeline.
pub struct DailyScheduler<'a> {
    config: &'a ForecastConfig,
    accumulator: LoadAccumulator,
}

impl<'a> DailyScheduler<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self {
            config,
            accumulator: LoadAccumulator::new(),
        }
    }

    /// Emit one workout per viable day across the whole phase timeline,
    /// starting at `start`.
    ///
    /// Hard sessions are bounded per week by the polarization split
    /// (clamped to one or two on training weeks, none on recovery weeks), a
    /// rolling 7-day window check keeps the hard fraction honest across
    /// week boundaries, and two consecutive hard calendar days are the
    /// absolute ceiling regardless of configuration. Conservative recovery
    /// demands force an easy day after every hard one. Among equally valid
    /// types, the one furthest under its target share within the current
    /// phase wins.
    pub fn schedule(
        &self,
        start: NaiveDate,
        phases: &[Phase],
        signature: &FitnessSignature,
    ) -> Vec<PlannedWorkout> {
        let total_weeks: u32 = phases.iter().map(|p| p.weeks).sum();
        let hard_fraction = self.config.polarization_ratio.hard_fraction();
        let weekly_available = f64::from(self.config.available_days.total_available_minutes());
        let weekly_budget_base = (self.config.max_weekly_hours * 60.0).min(weekly_available);

        let mut workouts: Vec<PlannedWorkout> = Vec::new();
        let mut type_counts: HashMap<(PhaseName, WorkoutType), u32> = HashMap::new();
        let mut last_hard_date: Option<NaiveDate> = None;
        let mut hard_run = 0u32;

        for week_index in 0..total_weeks {
            let Some((phase, progress)) = phase_for_week(phases, week_index) else {
                break;
            };
            let recovery_week = (week_index + 1) % 4 == 0 && phase != PhaseName::Taper;
            let week_start = start + Duration::days(i64::from(week_index) * 7);

            let days: Vec<(NaiveDate, u32)> = (0..7)
                .map(|offset| week_start + Duration::days(offset))
                .filter_map(|date| {
                    let day = self.config.available_days.get(date.weekday());
                    (day.available && day.duration_minutes >= MIN_SESSION_MINUTES)
                        .then_some((date, day.duration_minutes))
                })
                .collect();
            if days.is_empty() {
                continue;
            }

            let multiplier =
                phase.volume_multiplier(progress) * if recovery_week { 0.6 } else { 1.0 };
            let per_session = weekly_budget_base * multiplier / days.len() as f64;

            let mut hard_remaining = if recovery_week || hard_fraction <= 0.0 {
                0
            } else {
                ((days.len() as f64 * hard_fraction).round() as u32).clamp(1, 2)
            };

            for (date, available_minutes) in days {
                let prev_day_hard = last_hard_date
                    .is_some_and(|d| date.signed_duration_since(d).num_days() == 1);

                let may_go_hard = hard_remaining > 0
                    && !(self.config.conservative_recovery() && prev_day_hard)
                    && (!prev_day_hard || hard_run < 2)
                    && window_allows_hard(&workouts, date, hard_fraction);

                let (workout_type, duration_scale) = if may_go_hard {
                    (self.pick(phase, phase.hard_candidates(), &mut type_counts), 0.9)
                } else if recovery_week {
                    (WorkoutType::Recovery, 1.0)
                } else {
                    (self.pick(phase, phase.easy_candidates(), &mut type_counts), 1.1)
                };

                let duration = ((per_session * duration_scale) as u32)
                    .clamp(MIN_SESSION_MINUTES, available_minutes);

                if workout_type.is_hard() {
                    hard_remaining = hard_remaining.saturating_sub(1);
                    hard_run = if prev_day_hard { hard_run + 1 } else { 1 };
                    last_hard_date = Some(date);
                }

                workouts.push(self.build_workout(
                    date,
                    week_index,
                    phase,
                    workout_type,
                    duration,
                    signature,
                ));
            }
        }

        tracing::debug!(
            "scheduled {} workouts across {} weeks",
            workouts.len(),
            total_weeks
        );
        workouts
    }

    /// Tie-break among candidates: take the one furthest under its target
    /// share so far in this phase; first listed wins on ties.
    fn pick(
        &self,
        phase: PhaseName,
        candidates: &'static [(WorkoutType, f64)],
        counts: &mut HashMap<(PhaseName, WorkoutType), u32>,
    ) -> WorkoutType {
        let selected: u32 = candidates
            .iter()
            .map(|(wt, _)| counts.get(&(phase, *wt)).copied().unwrap_or(0))
            .sum();

        let mut best = candidates[0].0;
        let mut best_deficit = f64::NEG_INFINITY;
        for (wt, target) in candidates {
            let observed = if selected == 0 {
                0.0
            } else {
                f64::from(counts.get(&(phase, *wt)).copied().unwrap_or(0)) / f64::from(selected)
            };
            let deficit = target - observed;
            if deficit > best_deficit + 1e-9 {
                best = *wt;
                best_deficit = deficit;
            }
        }

        *counts.entry((phase, best)).or_insert(0) += 1;
        best
    }

    fn build_workout(
        &self,
        date: NaiveDate,
        week_index: u32,
        phase: PhaseName,
        workout_type: WorkoutType,
        duration_minutes: u32,
        signature: &FitnessSignature,
    ) -> PlannedWorkout {
        let hours = f64::from(duration_minutes) / 60.0;
        let target_tss = (hours * workout_type.tss_per_hour()).round() as u32;
        let target_xss = self.accumulator.impulse_for(
            workout_type,
            duration_minutes,
            workout_type.reference_if(),
            signature,
        );

        PlannedWorkout {
            date,
            name: format!(
                "[{}] Week {} {}: {}",
                phase.label(),
                week_index + 1,
                date.format("%A"),
                workout_type.label()
            ),
            workout_type,
            duration_minutes,
            target_tss,
            target_xss,
            phase,
            description: workout_type.description().to_string(),
            intervals: IntervalStructure::for_workout(workout_type, duration_minutes),
        }
    }
}

/// Check that adding a hard session on `date` keeps the trailing 7-day
/// window within the polarization split plus the one-workout rounding
/// tolerance.
fn window_allows_hard(workouts: &[PlannedWorkout], date: NaiveDate, hard_fraction: f64) -> bool {
    let window_start = date - Duration::days(6);
    let mut sessions = 1u32; // the candidate itself
    let mut hard = 0u32;
    for workout in workouts.iter().rev() {
        if workout.date < window_start {
            break;
        }
        sessions += 1;
        if workout.is_hard() {
            hard += 1;
        }
    }
    hard <= (f64::from(sessions) * hard_fraction).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::config::{DayAvailability, ForecastConfig, PolarizationRatio, WeekAvailability};
    use crate::planner::phases::{PeriodizationPlanner, Phase};
    use crate::planner::config::ProgramType;
    use chrono::Weekday;

    fn monday() -> NaiveDate {
        // 2025-03-03 is a Monday
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn test_config(target_weeks: u32) -> ForecastConfig {
        let target = monday() + Duration::days(i64::from(target_weeks) * 7);
        ForecastConfig::new(target).with_weekly_hours(8.0)
    }

    fn test_phases(weeks: u32) -> Vec<Phase> {
        PeriodizationPlanner::new().plan(weeks, ProgramType::Goal, 50, 3)
    }

    fn signature() -> FitnessSignature {
        FitnessSignature::estimated_from_ftp(250.0)
    }

    #[test]
    fn test_respects_unavailable_days() {
        let mut availability = WeekAvailability::uniform(60);
        availability.set(Weekday::Wed, DayAvailability::unavailable());
        availability.set(Weekday::Fri, DayAvailability::unavailable());
        let config = test_config(8).with_availability(availability);

        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(8), &signature());

        assert!(!workouts.is_empty());
        for workout in &workouts {
            let weekday = workout.date.weekday();
            assert_ne!(weekday, Weekday::Wed, "scheduled on unavailable day");
            assert_ne!(weekday, Weekday::Fri, "scheduled on unavailable day");
        }
    }

    #[test]
    fn test_durations_fit_availability() {
        let config = test_config(8).with_availability(WeekAvailability::uniform(45));
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(8), &signature());

        for workout in &workouts {
            assert!(workout.duration_minutes <= 45);
            assert!(workout.duration_minutes >= MIN_SESSION_MINUTES);
        }
    }

    #[test]
    fn test_hard_sessions_capped_per_week() {
        let config = test_config(8);
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(8), &signature());

        let mut per_week: HashMap<i64, u32> = HashMap::new();
        for workout in workouts.iter().filter(|w| w.is_hard()) {
            let week = workout.date.signed_duration_since(monday()).num_days() / 7;
            *per_week.entry(week).or_insert(0) += 1;
        }
        for (&week, &count) in &per_week {
            assert!(count <= 2, "week {week} has {count} hard sessions");
        }
    }

    #[test]
    fn test_never_three_consecutive_hard_days() {
        // Aggressive recovery and a hard-leaning split
        let config = test_config(12)
            .with_polarization(PolarizationRatio::new(50, 50))
            .with_recovery_demands(0);
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(12), &signature());

        let mut run = 0u32;
        let mut prev: Option<NaiveDate> = None;
        for workout in &workouts {
            if workout.is_hard() {
                let consecutive = prev
                    .is_some_and(|d| workout.date.signed_duration_since(d).num_days() == 1);
                run = if consecutive { run + 1 } else { 1 };
                assert!(run <= 2, "three consecutive hard days at {}", workout.date);
                prev = Some(workout.date);
            }
        }
    }

    #[test]
    fn test_conservative_recovery_spaces_hard_days() {
        let config = test_config(8).with_recovery_demands(100);
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(8), &signature());

        let hard_dates: Vec<NaiveDate> = workouts
            .iter()
            .filter(|w| w.is_hard())
            .map(|w| w.date)
            .collect();
        for pair in hard_dates.windows(2) {
            assert!(
                pair[1].signed_duration_since(pair[0]).num_days() >= 2,
                "back-to-back hard days under conservative recovery"
            );
        }
    }

    #[test]
    fn test_recovery_week_is_all_easy() {
        let config = test_config(8);
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(8), &signature());

        // Week 4 (index 3) is a recovery week
        let week4: Vec<_> = workouts
            .iter()
            .filter(|w| {
                let days = w.date.signed_duration_since(monday()).num_days();
                (21..28).contains(&days)
            })
            .collect();
        assert!(!week4.is_empty());
        assert!(week4.iter().all(|w| w.workout_type == WorkoutType::Recovery));
    }

    #[test]
    fn test_tie_break_converges_on_target_mix() {
        // A long Build-only timeline should settle near the 70/30
        // threshold/vo2max split
        let config = test_config(20);
        let scheduler = DailyScheduler::new(&config);
        let phases = vec![Phase {
            name: PhaseName::Build,
            weeks: 20,
        }];
        let workouts = scheduler.schedule(monday(), &phases, &signature());

        let threshold = workouts
            .iter()
            .filter(|w| w.workout_type == WorkoutType::Threshold)
            .count() as f64;
        let vo2 = workouts
            .iter()
            .filter(|w| w.workout_type == WorkoutType::Vo2max)
            .count() as f64;
        assert!(threshold > 0.0 && vo2 > 0.0);
        let share = threshold / (threshold + vo2);
        assert!((share - 0.7).abs() < 0.1, "threshold share {share} drifted");
    }

    #[test]
    fn test_quality_sessions_carry_intervals() {
        let config = test_config(8);
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(8), &signature());

        for workout in &workouts {
            match workout.workout_type {
                WorkoutType::Tempo | WorkoutType::Threshold | WorkoutType::Vo2max => {
                    assert!(workout.intervals.is_some(), "{} has no intervals", workout.name);
                }
                _ => assert!(workout.intervals.is_none()),
            }
        }
    }

    #[test]
    fn test_workout_names_carry_phase_and_week() {
        let config = test_config(8);
        let scheduler = DailyScheduler::new(&config);
        let workouts = scheduler.schedule(monday(), &test_phases(8), &signature());

        let first = &workouts[0];
        assert!(first.name.starts_with("[Base] Week 1"));
    }
}

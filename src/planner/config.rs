//! Plan request configuration and validation errors.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can abort plan generation.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Malformed or physically impossible request. Never retried.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Well-formed request that no schedule can satisfy.
    #[error("Insufficient availability: {0}")]
    InsufficientAvailability(String),
}

/// Result type for planner operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// What the plan is building toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    /// Open-ended fitness goal
    #[default]
    Goal,
    /// A target event worth arriving fresh for
    Event,
    /// A race that demands a full taper
    Race,
}

impl ProgramType {
    pub fn label(&self) -> &'static str {
        match self {
            ProgramType::Goal => "Goal",
            ProgramType::Event => "Event",
            ProgramType::Race => "Race",
        }
    }
}

impl std::fmt::Display for ProgramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Easy/hard session split, e.g. "80/20".
///
/// Malformed input falls back to the classic 80/20 split rather than
/// failing; this is a preference knob, not a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PolarizationRatio {
    easy_pct: u8,
    hard_pct: u8,
}

impl PolarizationRatio {
    pub fn new(easy_pct: u8, hard_pct: u8) -> Self {
        if easy_pct == 0 && hard_pct == 0 {
            return Self::default();
        }
        Self { easy_pct, hard_pct }
    }

    pub fn easy_pct(&self) -> u8 {
        self.easy_pct
    }

    pub fn hard_pct(&self) -> u8 {
        self.hard_pct
    }

    /// Fraction of sessions that may be hard (0.0 - 1.0).
    pub fn hard_fraction(&self) -> f64 {
        let total = f64::from(self.easy_pct) + f64::from(self.hard_pct);
        f64::from(self.hard_pct) / total
    }
}

impl Default for PolarizationRatio {
    fn default() -> Self {
        Self {
            easy_pct: 80,
            hard_pct: 20,
        }
    }
}

impl FromStr for PolarizationRatio {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (easy, hard) = s.split_once('/').unwrap_or((s, "0"));
        Ok(Self::new(easy.trim().parse()?, hard.trim().parse()?))
    }
}

impl From<String> for PolarizationRatio {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<PolarizationRatio> for String {
    fn from(ratio: PolarizationRatio) -> Self {
        ratio.to_string()
    }
}

impl std::fmt::Display for PolarizationRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.easy_pct, self.hard_pct)
    }
}

/// Training availability for a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Whether training fits this day at all
    #[serde(default)]
    pub available: bool,
    /// Preferred start time, informational only
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Minutes available for training
    #[serde(default)]
    pub duration_minutes: u32,
}

impl DayAvailability {
    pub fn available(duration_minutes: u32) -> Self {
        Self {
            available: true,
            start_time: None,
            duration_minutes,
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl Default for DayAvailability {
    fn default() -> Self {
        Self {
            available: false,
            start_time: None,
            duration_minutes: 0,
        }
    }
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Per-weekday availability, always exactly seven entries Monday-Sunday.
///
/// Converting from a weekday-name-keyed map clamps missing days to
/// unavailable and ignores unknown keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, DayAvailability>",
    into = "BTreeMap<String, DayAvailability>"
)]
pub struct WeekAvailability {
    days: [DayAvailability; 7],
}

impl WeekAvailability {
    /// All seven days unavailable.
    pub fn none() -> Self {
        Self {
            days: [DayAvailability::unavailable(); 7],
        }
    }

    /// Every day available with the same duration.
    pub fn uniform(duration_minutes: u32) -> Self {
        Self {
            days: [DayAvailability::available(duration_minutes); 7],
        }
    }

    /// Weekdays at one duration, weekend days at another.
    pub fn weekly(weekday_minutes: u32, weekend_minutes: u32) -> Self {
        let mut week = Self::uniform(weekday_minutes);
        week.set(Weekday::Sat, DayAvailability::available(weekend_minutes));
        week.set(Weekday::Sun, DayAvailability::available(weekend_minutes));
        week
    }

    pub fn get(&self, weekday: Weekday) -> &DayAvailability {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, weekday: Weekday, availability: DayAvailability) {
        self.days[weekday.num_days_from_monday() as usize] = availability;
    }

    /// Number of days marked available.
    pub fn available_count(&self) -> usize {
        self.days.iter().filter(|d| d.available).count()
    }

    /// Number of available days offering at least `min_minutes`.
    pub fn viable_count(&self, min_minutes: u32) -> usize {
        self.days
            .iter()
            .filter(|d| d.available && d.duration_minutes >= min_minutes)
            .count()
    }

    /// Sum of available minutes across the week.
    pub fn total_available_minutes(&self) -> u32 {
        self.days
            .iter()
            .filter(|d| d.available)
            .map(|d| d.duration_minutes)
            .sum()
    }

    pub fn all_unavailable(&self) -> bool {
        self.available_count() == 0
    }
}

impl Default for WeekAvailability {
    fn default() -> Self {
        Self::weekly(60, 90)
    }
}

impl From<BTreeMap<String, DayAvailability>> for WeekAvailability {
    fn from(map: BTreeMap<String, DayAvailability>) -> Self {
        let mut week = Self::none();
        for (name, availability) in map {
            let index = WEEKDAY_NAMES
                .iter()
                .position(|n| n.eq_ignore_ascii_case(name.trim()));
            if let Some(index) = index {
                week.days[index] = availability;
            }
        }
        week
    }
}

impl From<WeekAvailability> for BTreeMap<String, DayAvailability> {
    fn from(week: WeekAvailability) -> Self {
        WEEKDAY_NAMES
            .iter()
            .zip(week.days)
            .map(|(name, day)| ((*name).to_string(), day))
            .collect()
    }
}

/// A plan generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// What the plan builds toward
    #[serde(default)]
    pub program_type: ProgramType,
    /// Goal date the plan ends on
    pub target_date: NaiveDate,
    /// Weekly training time budget in hours
    #[serde(default = "default_weekly_hours")]
    pub max_weekly_hours: f64,
    /// Desired readiness at the goal (1 = low, 5 = peak)
    #[serde(default = "default_event_readiness")]
    pub event_readiness: u8,
    /// 0 = earliest base emphasis, 100 = race-peak emphasis
    #[serde(default = "default_periodization_level")]
    pub periodization_level: u8,
    /// Easy/hard session split
    #[serde(default)]
    pub polarization_ratio: PolarizationRatio,
    /// 0 = aggressive recovery, 100 = conservative
    #[serde(default = "default_recovery_demands")]
    pub recovery_demands: u8,
    /// Day-by-day training availability
    #[serde(default)]
    pub available_days: WeekAvailability,
}

fn default_weekly_hours() -> f64 {
    10.0
}

fn default_event_readiness() -> u8 {
    3
}

fn default_periodization_level() -> u8 {
    50
}

fn default_recovery_demands() -> u8 {
    50
}

impl ForecastConfig {
    /// A config with the standard defaults for the given goal date.
    pub fn new(target_date: NaiveDate) -> Self {
        Self {
            program_type: ProgramType::default(),
            target_date,
            max_weekly_hours: default_weekly_hours(),
            event_readiness: default_event_readiness(),
            periodization_level: default_periodization_level(),
            polarization_ratio: PolarizationRatio::default(),
            recovery_demands: default_recovery_demands(),
            available_days: WeekAvailability::default(),
        }
    }

    pub fn with_program_type(mut self, program_type: ProgramType) -> Self {
        self.program_type = program_type;
        self
    }

    pub fn with_weekly_hours(mut self, hours: f64) -> Self {
        self.max_weekly_hours = hours.max(0.0);
        self
    }

    pub fn with_event_readiness(mut self, readiness: u8) -> Self {
        self.event_readiness = readiness.clamp(1, 5);
        self
    }

    pub fn with_periodization_level(mut self, level: u8) -> Self {
        self.periodization_level = level.min(100);
        self
    }

    pub fn with_polarization(mut self, ratio: PolarizationRatio) -> Self {
        self.polarization_ratio = ratio;
        self
    }

    pub fn with_recovery_demands(mut self, demands: u8) -> Self {
        self.recovery_demands = demands.min(100);
        self
    }

    pub fn with_availability(mut self, availability: WeekAvailability) -> Self {
        self.available_days = availability;
        self
    }

    /// Periodization level as a 0.0 - 1.0 fraction.
    pub fn periodization_fraction(&self) -> f64 {
        f64::from(self.periodization_level.min(100)) / 100.0
    }

    /// Whether recovery demands call for an easy day after every hard day.
    pub fn conservative_recovery(&self) -> bool {
        self.recovery_demands >= 67
    }
}

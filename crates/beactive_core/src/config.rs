//! Dashboard configuration.
//!
//! # Responsibility
//! - Hold goals, number locale and window settings for the dashboard.
//! - Load them from JSON, falling back to defaults for missing fields.
//!
//! # Invariants
//! - Goals are strictly positive.
//! - Unknown fields are rejected so typos do not silently fall back.

use crate::format::{format_decimal, NumberLocale};
use crate::model::summary::MetricKey;
use crate::window::{TimeWindow, WeekStart};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_STEP_GOAL: u64 = 10_000;
pub const DEFAULT_CALORIE_GOAL: u64 = 900;
const WEEK_SCOPE_LABEL: &str = "This week";
const TODAY_SCOPE_LABEL: &str = "Today";

/// Window used by the workout query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowScope {
    /// Start of the local day through now.
    Today,
    /// Start of the local week through now.
    #[default]
    Week,
}

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    InvalidGoal(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::InvalidGoal(field) => write!(f, "`{field}` must be greater than zero"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidGoal(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub step_goal: u64,
    pub calorie_goal: u64,
    pub locale: NumberLocale,
    pub workout_window: WindowScope,
    pub week_start: WeekStart,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            step_goal: DEFAULT_STEP_GOAL,
            calorie_goal: DEFAULT_CALORIE_GOAL,
            locale: NumberLocale::default(),
            workout_window: WindowScope::default(),
            week_start: WeekStart::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_goal == 0 {
            return Err(ConfigError::InvalidGoal("step_goal"));
        }
        if self.calorie_goal == 0 {
            return Err(ConfigError::InvalidGoal("calorie_goal"));
        }
        Ok(())
    }

    /// Card subtitle: a goal for daily totals, the window label for workouts.
    pub fn subtitle_for(&self, key: MetricKey) -> String {
        match key {
            MetricKey::TodaySteps => self.goal_label(self.step_goal),
            MetricKey::TodayCalories => self.goal_label(self.calorie_goal),
            _ => self.workout_scope_label().to_string(),
        }
    }

    /// Label of the window the workout query covers.
    pub fn workout_scope_label(&self) -> &'static str {
        match self.workout_window {
            WindowScope::Today => TODAY_SCOPE_LABEL,
            WindowScope::Week => WEEK_SCOPE_LABEL,
        }
    }

    pub fn workout_window_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TimeWindow {
        match self.workout_window {
            WindowScope::Today => TimeWindow::today(now),
            WindowScope::Week => TimeWindow::this_week(now, self.week_start),
        }
    }

    fn goal_label(&self, goal: u64) -> String {
        format!("Goal {}", format_decimal(goal as f64, self.locale))
    }
}

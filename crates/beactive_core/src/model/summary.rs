//! Display-ready summary cards.
//!
//! # Responsibility
//! - Define the closed set of store keys and their fixed presentation.
//! - Build `SummaryRecord` values from a formatted amount.
//!
//! # Invariants
//! - Every `MetricKey` has a stable string id without surrounding whitespace.
//! - `identifier` is used only for display order and is unique per key.

use crate::model::activity::WorkoutCategory;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Card icon tag. Maps to a platform symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityIcon {
    Walk,
    Flame,
    Run,
    StrengthTraining,
    Soccer,
    Basketball,
}

impl ActivityIcon {
    pub fn symbol_name(self) -> &'static str {
        match self {
            Self::Walk => "figure.walk",
            Self::Flame => "flame",
            Self::Run => "figure.run",
            Self::StrengthTraining => "figure.strengthtraining.traditional",
            Self::Soccer => "figure.soccer",
            Self::Basketball => "figure.basketball",
        }
    }
}

/// Card accent color tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentColor {
    Green,
    Red,
    Orange,
    Black,
    Pink,
    Indigo,
}

impl AccentColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Black => "black",
            Self::Pink => "pink",
            Self::Indigo => "indigo",
        }
    }
}

/// Stable key of one summary card in the store.
///
/// Declaration order matches display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricKey {
    #[serde(rename = "todaySteps")]
    TodaySteps,
    #[serde(rename = "todayCalories")]
    TodayCalories,
    #[serde(rename = "weekRunning")]
    WeekRunning,
    #[serde(rename = "weekStrength")]
    WeekStrength,
    #[serde(rename = "weekSoccer")]
    WeekSoccer,
    #[serde(rename = "weekBasketball")]
    WeekBasketball,
}

impl MetricKey {
    pub const ALL: [MetricKey; 6] = [
        Self::TodaySteps,
        Self::TodayCalories,
        Self::WeekRunning,
        Self::WeekStrength,
        Self::WeekSoccer,
        Self::WeekBasketball,
    ];

    /// Keys written together by one workout query.
    pub const WORKOUTS: [MetricKey; 4] = [
        Self::WeekRunning,
        Self::WeekStrength,
        Self::WeekSoccer,
        Self::WeekBasketball,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TodaySteps => "todaySteps",
            Self::TodayCalories => "todayCalories",
            Self::WeekRunning => "weekRunning",
            Self::WeekStrength => "weekStrength",
            Self::WeekSoccer => "weekSoccer",
            Self::WeekBasketball => "weekBasketball",
        }
    }

    /// Parses a stable key id. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL.into_iter().find(|key| key.as_str() == normalized)
    }

    pub fn identifier(self) -> u32 {
        match self {
            Self::TodaySteps => 0,
            Self::TodayCalories => 1,
            Self::WeekRunning => 2,
            Self::WeekStrength => 3,
            Self::WeekSoccer => 4,
            Self::WeekBasketball => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::TodaySteps => "Today steps",
            Self::TodayCalories => "Today Calories",
            Self::WeekRunning => "Running",
            Self::WeekStrength => "Weight Lifting",
            Self::WeekSoccer => "Soccer",
            Self::WeekBasketball => "Basketball",
        }
    }

    pub fn icon(self) -> ActivityIcon {
        match self {
            Self::TodaySteps => ActivityIcon::Walk,
            Self::TodayCalories => ActivityIcon::Flame,
            Self::WeekRunning => ActivityIcon::Run,
            Self::WeekStrength => ActivityIcon::StrengthTraining,
            Self::WeekSoccer => ActivityIcon::Soccer,
            Self::WeekBasketball => ActivityIcon::Basketball,
        }
    }

    pub fn accent(self) -> AccentColor {
        match self {
            Self::TodaySteps => AccentColor::Green,
            Self::TodayCalories => AccentColor::Red,
            Self::WeekRunning => AccentColor::Orange,
            Self::WeekStrength => AccentColor::Black,
            Self::WeekSoccer => AccentColor::Pink,
            Self::WeekBasketball => AccentColor::Indigo,
        }
    }

    /// Store key fed by one tracked workout category.
    pub fn for_workout(category: &WorkoutCategory) -> Option<Self> {
        match category {
            WorkoutCategory::Running => Some(Self::WeekRunning),
            WorkoutCategory::TraditionalStrengthTraining => Some(Self::WeekStrength),
            WorkoutCategory::Soccer => Some(Self::WeekSoccer),
            WorkoutCategory::Basketball => Some(Self::WeekBasketball),
            WorkoutCategory::Other(_) => None,
        }
    }
}

impl Display for MetricKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One display-ready card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Sort order only.
    pub identifier: u32,
    pub title: String,
    /// Goal or time-scope label.
    pub subtitle: String,
    pub icon: ActivityIcon,
    pub accent: AccentColor,
    /// Already unit-labeled, e.g. `1,234` or `45 minutes`.
    pub amount: String,
}

impl SummaryRecord {
    /// Builds the card for `key` using its fixed presentation.
    pub fn for_metric(
        key: MetricKey,
        subtitle: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            identifier: key.identifier(),
            title: key.title().to_string(),
            subtitle: subtitle.into(),
            icon: key.icon(),
            accent: key.accent(),
            amount: amount.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MetricKey, SummaryRecord};
    use crate::model::activity::WorkoutCategory;
    use std::collections::HashSet;

    #[test]
    fn metric_keys_have_unique_identifiers_and_trimmed_ids() {
        let ids: HashSet<u32> = MetricKey::ALL.iter().map(|key| key.identifier()).collect();
        assert_eq!(ids.len(), MetricKey::ALL.len());
        for key in MetricKey::ALL {
            assert_eq!(key.as_str(), key.as_str().trim());
            assert_eq!(MetricKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn parse_normalizes_stray_whitespace() {
        assert_eq!(
            MetricKey::parse("weekBasketball "),
            Some(MetricKey::WeekBasketball)
        );
        assert_eq!(MetricKey::parse("weekYoga"), None);
    }

    #[test]
    fn every_tracked_category_maps_to_a_workout_key() {
        let keys: Vec<MetricKey> = WorkoutCategory::TRACKED
            .iter()
            .filter_map(MetricKey::for_workout)
            .collect();
        assert_eq!(keys, MetricKey::WORKOUTS.to_vec());
        assert_eq!(
            MetricKey::for_workout(&WorkoutCategory::Other("yoga".to_string())),
            None
        );
    }

    #[test]
    fn metric_key_serializes_as_stable_id() {
        let json = serde_json::to_string(&MetricKey::WeekSoccer).expect("key should serialize");
        assert_eq!(json, "\"weekSoccer\"");
    }

    #[test]
    fn record_uses_fixed_presentation() {
        let record = SummaryRecord::for_metric(MetricKey::WeekRunning, "This week", "40 minutes");
        assert_eq!(record.identifier, 2);
        assert_eq!(record.title, "Running");
        assert_eq!(record.icon.symbol_name(), "figure.run");
        assert_eq!(record.accent.as_str(), "orange");
        assert_eq!(record.amount, "40 minutes");
    }
}

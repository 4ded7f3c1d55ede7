//! Per-source advanced settings: scheduling and free-text notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScheduleFrequency {
    #[default]
    Manual,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Cron,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub enabled: bool,
    pub frequency: ScheduleFrequency,
    pub timezone: String,
    pub start_time: Option<DateTime<Utc>>,
    /// Only meaningful when `frequency` is [`ScheduleFrequency::Cron`]
    pub cron_expression: Option<String>,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: ScheduleFrequency::Manual,
            timezone: DEFAULT_TIMEZONE.to_string(),
            start_time: None,
            cron_expression: None,
        }
    }
}

/// Settings the user attaches to a selected source before promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    pub scheduling: ScheduleSettings,
    pub notes: String,
}

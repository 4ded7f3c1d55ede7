//! Promotion config payload derived from a source's advanced settings.

use super::model::{AdvancedSettings, DEFAULT_TIMEZONE, ScheduleFrequency};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Config object handed to the promote-to-space endpoint.
///
/// Serializes to `{}` when built without settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<SchedulingPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PromotionMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPayload {
    pub enabled: bool,
    pub frequency: ScheduleFrequency,
    pub timezone: String,
    /// ISO 8601 in UTC with millisecond precision
    pub start_time: Option<String>,
    pub cron_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionMetadata {
    pub notes: String,
}

impl PromotionConfig {
    pub fn is_empty(&self) -> bool {
        self.scheduling.is_none() && self.metadata.is_none()
    }
}

/// Builds the promotion payload for one source.
pub fn build_promotion_config(settings: Option<&AdvancedSettings>) -> PromotionConfig {
    let Some(settings) = settings else {
        return PromotionConfig::default();
    };
    let schedule = &settings.scheduling;

    let timezone = match schedule.timezone.trim() {
        "" => DEFAULT_TIMEZONE.to_string(),
        tz => tz.to_string(),
    };
    let cron_expression = match schedule.frequency {
        ScheduleFrequency::Cron => schedule
            .cron_expression
            .as_deref()
            .map(str::trim)
            .filter(|expr| !expr.is_empty())
            .map(str::to_string),
        _ => None,
    };

    let notes = settings.notes.trim();

    PromotionConfig {
        scheduling: Some(SchedulingPayload {
            enabled: schedule.enabled,
            frequency: schedule.frequency,
            timezone,
            start_time: schedule
                .start_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            cron_expression,
        }),
        metadata: (!notes.is_empty()).then(|| PromotionMetadata {
            notes: notes.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ScheduleSettings;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_no_settings_yields_empty_object() {
        let config = build_promotion_config(None);
        assert!(config.is_empty());
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({}));
    }

    #[test]
    fn test_defaults_produce_manual_utc_schedule_without_metadata() {
        let config = build_promotion_config(Some(&AdvancedSettings::default()));
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "scheduling": {
                    "enabled": false,
                    "frequency": "manual",
                    "timezone": "UTC",
                    "start_time": null,
                    "cron_expression": null
                }
            })
        );
    }

    #[test]
    fn test_cron_expression_only_for_cron_frequency() {
        let mut settings = AdvancedSettings {
            scheduling: ScheduleSettings {
                enabled: true,
                frequency: ScheduleFrequency::Weekly,
                timezone: "Europe/Berlin".into(),
                start_time: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()),
                cron_expression: Some("0 9 * * 1".into()),
            },
            notes: String::new(),
        };

        let weekly = build_promotion_config(Some(&settings)).scheduling.unwrap();
        assert_eq!(weekly.cron_expression, None);
        assert_eq!(weekly.timezone, "Europe/Berlin");
        assert_eq!(
            weekly.start_time.as_deref(),
            Some("2025-03-01T09:30:00.000Z")
        );

        settings.scheduling.frequency = ScheduleFrequency::Cron;
        let cron = build_promotion_config(Some(&settings)).scheduling.unwrap();
        assert_eq!(cron.cron_expression.as_deref(), Some("0 9 * * 1"));
    }

    #[test]
    fn test_blank_timezone_and_notes() {
        let mut settings = AdvancedSettings::default();
        settings.scheduling.timezone = "  ".into();
        settings.notes = "   \n".into();
        let config = build_promotion_config(Some(&settings));
        assert_eq!(config.scheduling.unwrap().timezone, "UTC");
        assert!(config.metadata.is_none());

        settings.notes = "  weekly MED13 sweep ".into();
        let config = build_promotion_config(Some(&settings));
        assert_eq!(config.metadata.unwrap().notes, "weekly MED13 sweep");
    }
}

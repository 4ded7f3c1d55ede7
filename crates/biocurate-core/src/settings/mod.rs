//! Per-source advanced settings and the promotion payload built from them.

mod model;
mod promotion;

pub use model::{AdvancedSettings, DEFAULT_TIMEZONE, ScheduleFrequency, ScheduleSettings};
pub use promotion::{
    PromotionConfig, PromotionMetadata, SchedulingPayload, build_promotion_config,
};

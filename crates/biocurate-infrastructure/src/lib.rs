//! Infrastructure for the discovery engine: the HTTP backend client,
//! configuration loading, tracing setup and notification sinks.

pub mod config;
pub mod config_service;
pub mod http_client;
pub mod notification;
pub mod telemetry;

pub use config::{ApiConfig, EngineConfig, ScopeConfig};
pub use config_service::ConfigService;
pub use http_client::HttpDiscoveryApi;
pub use notification::{ChannelNotificationSink, TracingNotificationSink};
pub use telemetry::init_tracing;

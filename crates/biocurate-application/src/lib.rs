//! Application layer of the discovery engine.
//!
//! This crate owns the mutable discovery state of one workspace and the
//! services that keep it in step with the remote session: bootstrapping,
//! optimistic selection and parameter synchronization, per-source test runs
//! and promotion into a space.

pub mod engine;
pub mod optimistic;
pub mod promotion;
pub mod session;
pub mod state;
pub mod test_runner;

pub use engine::DiscoveryEngine;
pub use promotion::{PromotionReport, PromotionStatus};
pub use session::{BootstrapOutcome, ParameterOutcome, SelectionOutcome};
pub use state::{DiscoveryState, DiscoveryView};
pub use test_runner::TestOutcome;

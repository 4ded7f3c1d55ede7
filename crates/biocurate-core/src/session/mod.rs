//! Discovery session domain module.
//!
//! # Module Structure
//!
//! - `model`: server-owned session record and scope
//! - `api`: [`DiscoveryApi`], the remote service the engine talks to

mod api;
mod model;

pub use api::{DiscoveryApi, PromotionRequest, PromotionResult, TestRunRequest, TestRunResult};
pub use model::{CreateSessionRequest, Session, SessionScope};

//! Domain layer of the discovery session engine.
//!
//! Holds the catalog and capability model, the pure algorithms (capability
//! aggregation, parameter sanitizing and validation, promotion payloads) and
//! the [`session::DiscoveryApi`] seam to the remote service.

pub mod capability;
pub mod catalog;
pub mod error;
pub mod notification;
pub mod parameters;
pub mod scoped;
pub mod session;
pub mod settings;

// Re-export common error type
pub use error::{CurateError, Result};

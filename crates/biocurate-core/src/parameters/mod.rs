//! Query parameters: model, capability-driven sanitizing and per-source validation.

mod model;
pub mod sanitizer;
pub mod validator;

pub use model::{DEFAULT_MAX_RESULTS, QueryParameters, SortOption};
pub use sanitizer::{sanitize, sanitized};
pub use validator::{ValidationResult, validate};

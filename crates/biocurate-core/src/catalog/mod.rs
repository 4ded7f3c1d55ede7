//! Source catalog: entries as declared by the catalog service and an id index.

mod index;
mod model;

pub use index::CatalogIndex;
pub use model::{CatalogEntry, ParamType, SourceType};

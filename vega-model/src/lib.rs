//! Core data model definitions shared across Vega crates.

pub mod dates;
pub mod filter_types;
pub mod ids;
pub mod language;
pub mod movie;
pub mod prelude;

// Intentionally curated re-exports for downstream consumers.
pub use dates::ReleaseDate;
pub use filter_types::CatalogFilter;
pub use ids::MovieId;
pub use language::language_rank;
pub use movie::{DisplayRecord, RawMovie};

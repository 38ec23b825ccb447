//! Convenience re-exports for downstream crates.

pub use crate::dates::ReleaseDate;
pub use crate::filter_types::CatalogFilter;
pub use crate::ids::MovieId;
pub use crate::language::language_rank;
pub use crate::movie::{DisplayRecord, RawMovie};

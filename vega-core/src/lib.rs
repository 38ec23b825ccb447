//! Vega catalog engine: TMDB ingestion, ranking, and catalog state.
//!
//! The pipeline runs fetch → normalize → release-filter → rank → pin
//! selection, and the [`catalog::CatalogStore`] owns the resulting
//! view state (filters, pins, pagination). Presentation is out of
//! scope: consumers take ordered [`vega_model::DisplayRecord`] slices
//! and render them however they like.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod decor;
pub mod error;
pub mod ingest;
pub mod providers;
pub mod snapshot;

pub use cache::CacheGateway;
pub use catalog::{CatalogStore, FIRST_PAGE_SIZE, PAGE_SIZE};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use ingest::{CatalogSource, Ingestor};

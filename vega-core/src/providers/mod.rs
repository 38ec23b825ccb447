pub mod tmdb;

pub use tmdb::{DiscoverPage, GenreMap, TmdbProvider};

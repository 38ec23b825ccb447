use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing TMDB API credential (set TMDB_API_KEY)")]
    MissingCredential,
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Strongly typed ID for movies, backed by the upstream TMDB identifier.
///
/// The id is the dedup key for the whole catalog: any list handed to the
/// ranker must end up with each id at most once.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl MovieId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        MovieId(id)
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

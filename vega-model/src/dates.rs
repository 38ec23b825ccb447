//! Release-date normalization.
//!
//! Upstream dates arrive as strings: a full `YYYY-MM-DD`, a bare `YYYY`
//! fallback, or garbage. Anything unparseable collapses to
//! [`ReleaseDate::Unknown`], which sorts last and never counts as released.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A normalized release date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseDate {
    /// A full calendar date.
    Full(NaiveDate),
    /// Year-only precision, ordered as January 1st of that year.
    Year(i32),
    /// Absent or unparseable.
    #[default]
    Unknown,
}

fn is_year_shape(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_full_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

impl ReleaseDate {
    /// Parse a raw date string. Never fails; malformed input is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ReleaseDate::Unknown;
        }
        if is_year_shape(trimmed) {
            return trimmed
                .parse::<i32>()
                .map(ReleaseDate::Year)
                .unwrap_or(ReleaseDate::Unknown);
        }
        if is_full_shape(trimmed) {
            return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(ReleaseDate::Full)
                .unwrap_or(ReleaseDate::Unknown);
        }
        ReleaseDate::Unknown
    }

    /// The date used for ordering. `Year` maps to January 1st, `Unknown`
    /// to the `0000-01-01` sentinel so invalid dates sort last under a
    /// most-recent-first comparison.
    pub fn sort_key(&self) -> NaiveDate {
        match self {
            ReleaseDate::Full(d) => *d,
            ReleaseDate::Year(y) => {
                NaiveDate::from_ymd_opt(*y, 1, 1).unwrap_or(NaiveDate::MIN)
            }
            ReleaseDate::Unknown => {
                NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Whether this date is on or before `today`. `Unknown` is never
    /// released. The reference date is injected so callers stay
    /// deterministic and clock-free.
    pub fn is_released(&self, today: NaiveDate) -> bool {
        match self {
            ReleaseDate::Unknown => false,
            _ => self.sort_key() <= today,
        }
    }

    /// Year component, when known.
    pub fn year(&self) -> Option<i32> {
        match self {
            ReleaseDate::Full(d) => Some(chrono::Datelike::year(d)),
            ReleaseDate::Year(y) => Some(*y),
            ReleaseDate::Unknown => None,
        }
    }

    /// The display string: `YYYY-MM-DD`, `YYYY`, or empty.
    pub fn display(&self) -> String {
        match self {
            ReleaseDate::Full(d) => d.format("%Y-%m-%d").to_string(),
            ReleaseDate::Year(y) => format!("{y:04}"),
            ReleaseDate::Unknown => String::new(),
        }
    }
}

impl std::fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for ReleaseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for ReleaseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(ReleaseDate::parse).unwrap_or_default())
    }
}

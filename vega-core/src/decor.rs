//! Cosmetic platform-label decoration.
//!
//! The platform tag is display flavor with no informational value: it
//! is unrelated to actual licensing, and ranking and pinning never read
//! it. It exists so platform-style tag filters have something to match.

use rand::Rng;

use vega_model::DisplayRecord;

use crate::ingest::normalize::build_details;

pub const PLATFORMS: [&str; 4] = ["Netflix", "Amazon Prime", "Disney+", "MX Player"];

/// Slug form used for tag matching: lowercase, hyphenated, `+` dropped.
pub fn platform_slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .replace('+', "")
}

/// Attach a platform label and rebuild the details line around it.
pub fn assign_platform<R: Rng + ?Sized>(record: &mut DisplayRecord, rng: &mut R) {
    let name = PLATFORMS[rng.random_range(0..PLATFORMS.len())];
    record.platform = Some(platform_slug(name));
    record.details = build_details(&record.genres, Some(name), &record.overview);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vega_model::{MovieId, ReleaseDate};

    #[test]
    fn slugs_drop_plus_and_hyphenate() {
        assert_eq!(platform_slug("Netflix"), "netflix");
        assert_eq!(platform_slug("Amazon Prime"), "amazon-prime");
        assert_eq!(platform_slug("Disney+"), "disney");
        assert_eq!(platform_slug("MX Player"), "mx-player");
    }

    #[test]
    fn assignment_sets_platform_and_details() {
        let mut record = DisplayRecord {
            id: MovieId(1),
            title: "X".into(),
            poster: String::new(),
            details: String::new(),
            date: ReleaseDate::Unknown,
            popularity: 0.0,
            language: "en".into(),
            overview: "An overview.".into(),
            category: "action".into(),
            genres: vec!["Action".into()],
            platform: None,
            link: String::new(),
        };

        assign_platform(&mut record, &mut rand::rng());

        let slug = record.platform.clone().unwrap();
        assert!(PLATFORMS.iter().any(|p| platform_slug(p) == slug));
        // Details carry the display name between genres and overview.
        assert!(record.details.starts_with("Action | "));
        assert!(record.details.ends_with(" | An overview."));
    }
}

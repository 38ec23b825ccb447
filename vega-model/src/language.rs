//! Language ranking used as a sort tie-breaker.

/// Rank a lowercase ISO-639-1-like code for ordering: Hindi first,
/// English second, everything else third.
pub fn language_rank(lang: &str) -> u8 {
    match lang.trim().to_ascii_lowercase().as_str() {
        "hi" => 0,
        "en" => 1,
        _ => 2,
    }
}

//! Catalog state: canonical list, active view, pins, page cursor.
//!
//! All mutation funnels through [`CatalogStore::replace_canonical`] and
//! [`CatalogStore::apply_filter`]; the view is always rebuilt in full
//! from the canonical list, never patched in place.

use chrono::NaiveDate;
use tracing::info;

use vega_model::{CatalogFilter, DisplayRecord, MovieId};

use crate::ingest::pins::{self, PinPolicy};
use crate::ingest::rank::rank;

/// Records on page 1.
pub const FIRST_PAGE_SIZE: usize = 40;
/// Records on every subsequent page.
pub const PAGE_SIZE: usize = 15;

/// The release year the `bollywood-new` derived category keys on.
const NEW_CATEGORY_YEAR: i32 = 2025;

const PLATFORM_TAGS: [&str; 4] = ["netflix", "amazon", "disney+", "apple tv+"];

#[derive(Debug, Default)]
pub struct CatalogStore {
    canonical: Vec<DisplayRecord>,
    active: Vec<DisplayRecord>,
    filter: CatalogFilter,
    pinned: Vec<MovieId>,
    page: usize,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    /// Replace the canonical list: release-filter, rank, reset to the
    /// default view on page 1.
    ///
    /// `pin_policy: Some` recomputes the pinned subset from the new
    /// list; `None` keeps the existing pins (a background refresh
    /// leaves the curated first page alone; stale ids are skipped at
    /// overlay time).
    pub fn replace_canonical(
        &mut self,
        list: Vec<DisplayRecord>,
        today: NaiveDate,
        pin_policy: Option<&PinPolicy>,
    ) {
        let released: Vec<DisplayRecord> = list
            .into_iter()
            .filter(|record| record.is_released(today))
            .collect();
        self.canonical = rank(released);

        if let Some(policy) = pin_policy {
            self.pinned = pins::select_pinned(&self.canonical, policy, FIRST_PAGE_SIZE);
        }

        self.filter = CatalogFilter::Default;
        self.page = 1;
        self.rebuild_active();
        info!(
            total = self.canonical.len(),
            pinned = self.pinned.len(),
            "canonical list replaced"
        );
    }

    /// Recompute the active view from the canonical list by predicate.
    /// Always resets the page cursor; never derives from the previous
    /// active view.
    pub fn apply_filter(&mut self, filter: CatalogFilter) {
        self.filter = filter;
        self.page = 1;
        self.rebuild_active();
    }

    fn rebuild_active(&mut self) {
        let filtered: Vec<DisplayRecord> = self
            .canonical
            .iter()
            .filter(|record| matches_filter(record, &self.filter))
            .cloned()
            .collect();

        // Pins overlay the default view only; any active search or
        // filter falls back to plain rank order.
        self.active = if self.filter.is_default() {
            pins::apply_pinned(filtered, &self.pinned)
        } else {
            filtered
        };
    }

    pub fn canonical(&self) -> &[DisplayRecord] {
        &self.canonical
    }

    /// The active (possibly filtered, possibly pin-overlaid) view.
    pub fn active(&self) -> &[DisplayRecord] {
        &self.active
    }

    pub fn is_default_view(&self) -> bool {
        self.filter.is_default()
    }

    pub fn pinned(&self) -> &[MovieId] {
        &self.pinned
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Move the 1-based page cursor, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn total_pages(&self) -> usize {
        let remaining = self.active.len().saturating_sub(FIRST_PAGE_SIZE);
        1 + remaining.div_ceil(PAGE_SIZE)
    }

    /// The records on the current page: page 1 holds the first
    /// `FIRST_PAGE_SIZE`, later pages `PAGE_SIZE` each.
    pub fn page_slice(&self) -> &[DisplayRecord] {
        let (start, end) = page_bounds(self.page);
        let start = start.min(self.active.len());
        let end = end.min(self.active.len());
        &self.active[start..end]
    }
}

fn page_bounds(page: usize) -> (usize, usize) {
    if page <= 1 {
        (0, FIRST_PAGE_SIZE)
    } else {
        let start = FIRST_PAGE_SIZE + (page - 2) * PAGE_SIZE;
        (start, start + PAGE_SIZE)
    }
}

fn matches_filter(record: &DisplayRecord, filter: &CatalogFilter) -> bool {
    match filter {
        CatalogFilter::Default => true,
        CatalogFilter::Search(term) => matches_search(record, term),
        CatalogFilter::Category(key) => matches_category(record, key),
        CatalogFilter::Tags(tags) => tags.iter().all(|tag| matches_tag(record, tag)),
    }
}

// Trims the term so it agrees with `CatalogFilter::is_default`: a
// whitespace-only search is the default view and matches everything.
fn matches_search(record: &DisplayRecord, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    record.title.to_lowercase().contains(&term) || record.details.to_lowercase().contains(&term)
}

fn matches_category(record: &DisplayRecord, key: &str) -> bool {
    let details = record.details.to_lowercase();
    match key {
        "dual" => details.contains("dual audio"),
        "bollywood-new" => {
            details.contains("hindi") && record.date.year() == Some(NEW_CATEGORY_YEAR)
        }
        _ => record.category == key,
    }
}

fn is_resolution_tag(tag: &str) -> bool {
    tag.strip_suffix('p')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn matches_tag(record: &DisplayRecord, tag: &str) -> bool {
    let tag = tag.to_lowercase();
    let details = record.details.to_lowercase();
    let category = record.category.to_lowercase();

    if is_resolution_tag(&tag) {
        return details.contains(&tag);
    }

    if PLATFORM_TAGS.contains(&tag.as_str()) {
        let name = tag.replace('+', "");
        let platform = record.platform.as_deref().unwrap_or_default().to_lowercase();
        return platform == name || details.contains(&name) || category.contains(&name);
    }

    details.contains(&tag) || category.contains(&tag)
}

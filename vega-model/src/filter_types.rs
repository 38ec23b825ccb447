use std::fmt;

/// A view-selection predicate over the canonical list.
///
/// Each variant replaces the active view wholesale; filters never
/// compose as chains. `Tags` is the one conjunctive mode: every active
/// tag must match simultaneously.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogFilter {
    /// The unfiltered canonical list. The only view pins apply to.
    #[default]
    Default,
    /// Case-insensitive substring search over title and details.
    Search(String),
    /// Category selection by key, e.g. `bollywood` or `hollywood`.
    Category(String),
    /// Conjunctive tag matching (resolution, platform, free text).
    Tags(Vec<String>),
}

impl CatalogFilter {
    /// An empty search or empty tag set is the default view.
    pub fn is_default(&self) -> bool {
        match self {
            CatalogFilter::Default => true,
            CatalogFilter::Search(term) => term.trim().is_empty(),
            CatalogFilter::Category(_) => false,
            CatalogFilter::Tags(tags) => tags.is_empty(),
        }
    }
}

impl fmt::Display for CatalogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogFilter::Default => write!(f, "default"),
            CatalogFilter::Search(term) => write!(f, "search:{term}"),
            CatalogFilter::Category(key) => write!(f, "category:{key}"),
            CatalogFilter::Tags(tags) => write!(f, "tags:{}", tags.join("+")),
        }
    }
}

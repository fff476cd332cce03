//! Scoped substring search over item names and tags
//!
//! Matching runs in Rust over the rows of a single map. SQLite `LIKE` only
//! folds ASCII, so lowercasing here keeps "Schraubendreher" and
//! "SCHRAUBENDREHER" equivalent for non-ASCII letters too.

use shared::error::AppError;
use shared::models::Item;
use std::str::FromStr;

/// Which item fields the free-text query is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    Name,
    Tags,
    #[default]
    All,
}

impl FromStr for SearchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "tags" => Ok(Self::Tags),
            "all" | "" => Ok(Self::All),
            other => Err(AppError::validation(format!(
                "Unknown search type '{other}'. Expected one of: name, tags, all"
            ))
            .with_detail("field", "type")),
        }
    }
}

/// Normalized search request
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Lowercased free-text query, `None` when blank
    ///
    /// Surrounding whitespace is kept: `" saw"` only matches where a word
    /// starts with "saw".
    query: Option<String>,
    /// Lowercased tag fragments; an item needs any one of them
    tags: Vec<String>,
    mode: SearchMode,
}

impl SearchQuery {
    pub fn new(query: &str, tags: Option<&str>, mode: SearchMode) -> Self {
        Self {
            query: (!query.trim().is_empty()).then(|| query.to_lowercase()),
            tags: parse_tags(tags),
            mode,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// True when every item of the map matches
    pub fn is_unfiltered(&self) -> bool {
        self.query.is_none() && self.tags.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.matches_query(item) && self.matches_tags(item)
    }

    /// Keep matching items, preserving their order
    pub fn filter(&self, items: Vec<Item>) -> Vec<Item> {
        if self.is_unfiltered() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }

    fn matches_query(&self, item: &Item) -> bool {
        let Some(query) = self.query.as_deref() else {
            return true;
        };
        let in_name = || item.name.to_lowercase().contains(query);
        let in_tags = || item.tags.to_lowercase().contains(query);
        match self.mode {
            SearchMode::Name => in_name(),
            SearchMode::Tags => in_tags(),
            SearchMode::All => in_name() || in_tags(),
        }
    }

    fn matches_tags(&self, item: &Item) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        let tags = item.tags.to_lowercase();
        self.tags.iter().any(|fragment| tags.contains(fragment.as_str()))
    }
}

/// Split a comma separated tag filter, dropping blank fragments
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

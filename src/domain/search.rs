use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::asset::IpAssetSummary;
use crate::domain::types::{PageSize, SearchMode, SearchType, SortDirection};

/// Normalized search parameters ready to be sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub search_type: SearchType,
    /// Text matched against the field selected by `search_type`.
    pub text: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub jurisdiction: Option<String>,
    pub sort_by: String,
    pub sort_direction: SortDirection,
    pub page: usize,
    pub page_size: PageSize,
}

/// One page of search results plus its pagination cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub assets: Vec<IpAssetSummary>,
    pub total_elements: u64,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl ResultPage {
    /// Builds a page whose navigation flags are derived from the cursor.
    #[must_use]
    pub fn new(
        assets: Vec<IpAssetSummary>,
        total_elements: u64,
        current_page: usize,
        total_pages: usize,
    ) -> Self {
        Self {
            assets,
            total_elements,
            current_page,
            total_pages,
            has_next: current_page.saturating_add(1) < total_pages,
            has_previous: current_page > 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Whether `page` addresses an existing page of this result set.
    pub fn contains_page(&self, page: usize) -> bool {
        page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_cursor() {
        let first = ResultPage::new(Vec::new(), 30, 0, 3);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last = ResultPage::new(Vec::new(), 30, 2, 3);
        assert!(!last.has_next);
        assert!(last.has_previous);

        let empty = ResultPage::new(Vec::new(), 0, 0, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_previous);
        assert!(!empty.contains_page(0));
    }

    #[test]
    fn largest_cursor_has_no_next_page() {
        let page = ResultPage::new(Vec::new(), 1, usize::MAX, usize::MAX);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }
}

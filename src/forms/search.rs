//! Search filter form and its conversion into a [`SearchQuery`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::search::SearchQuery;
use crate::domain::types::{PageSize, SearchMode, SearchType, SortDirection, normalize_date};
use crate::forms::FormError;

pub const DEFAULT_SORT_BY: &str = "publicationDate";

/// Filter values as the user typed them.
///
/// This is what gets persisted under the `filters` slot, so restoring it
/// brings back the exact text the user saw, including unnormalized dates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    #[validate(length(max = 500))]
    pub search_value: String,
    pub from_date: String,
    pub to_date: String,
    #[validate(length(max = 16))]
    pub jurisdiction: String,
    #[validate(length(min = 1, max = 64))]
    pub sort_by: String,
    pub sort_direction: SortDirection,
    pub search_type: SearchType,
    pub mode: SearchMode,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            search_value: String::new(),
            from_date: String::new(),
            to_date: String::new(),
            jurisdiction: String::new(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_direction: SortDirection::Desc,
            search_type: SearchType::Keyword,
            mode: SearchMode::Patent,
        }
    }
}

impl SearchFilters {
    /// Validates the form and builds the query for `page`.
    pub fn to_query(&self, page: usize, page_size: PageSize) -> Result<SearchQuery, FormError> {
        self.validate()?;

        if self.mode == SearchMode::Trademark && self.search_type == SearchType::Inventor {
            return Err(FormError::UnsupportedSearchType {
                mode: self.mode,
                search_type: self.search_type,
            });
        }

        let from_date = normalize_date(&self.from_date)?;
        let to_date = normalize_date(&self.to_date)?;
        if matches!((from_date, to_date), (Some(from), Some(to)) if from > to) {
            return Err(FormError::InvalidDateRange);
        }

        let jurisdiction = Some(self.jurisdiction.trim().to_uppercase()).filter(|j| !j.is_empty());

        Ok(SearchQuery {
            mode: self.mode,
            search_type: self.search_type,
            text: self.search_value.trim().to_string(),
            from_date,
            to_date,
            jurisdiction,
            sort_by: self.sort_by.trim().to_string(),
            sort_direction: self.sort_direction,
            page,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::TypeConstraintError;

    #[test]
    fn builds_query_with_normalized_fields() {
        let filters = SearchFilters {
            search_value: "  blockchain ".into(),
            from_date: "01/06/2023".into(),
            jurisdiction: " us ".into(),
            ..Default::default()
        };

        let query = filters.to_query(2, PageSize::default()).unwrap();

        assert_eq!(query.text, "blockchain");
        assert_eq!(query.from_date, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(query.to_date, None);
        assert_eq!(query.jurisdiction.as_deref(), Some("US"));
        assert_eq!(query.sort_by, DEFAULT_SORT_BY);
        assert_eq!(query.page, 2);
    }

    #[test]
    fn rejects_inventor_search_for_trademarks() {
        let filters = SearchFilters {
            mode: SearchMode::Trademark,
            search_type: SearchType::Inventor,
            ..Default::default()
        };

        let result = filters.to_query(0, PageSize::default());

        assert!(matches!(
            result,
            Err(FormError::UnsupportedSearchType { .. })
        ));
    }

    #[test]
    fn rejects_bad_dates_and_ranges() {
        let filters = SearchFilters {
            from_date: "next week".into(),
            ..Default::default()
        };
        assert!(matches!(
            filters.to_query(0, PageSize::default()),
            Err(FormError::TypeConstraint(TypeConstraintError::InvalidDate(_)))
        ));

        let filters = SearchFilters {
            from_date: "2024-01-01".into(),
            to_date: "2023-01-01".into(),
            ..Default::default()
        };
        assert!(matches!(
            filters.to_query(0, PageSize::default()),
            Err(FormError::InvalidDateRange)
        ));
    }

    #[test]
    fn rejects_empty_sort_field() {
        let filters = SearchFilters {
            sort_by: String::new(),
            ..Default::default()
        };

        assert!(matches!(
            filters.to_query(0, PageSize::default()),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let filters: SearchFilters = serde_json::from_str(r#"{"searchValue":"ai"}"#).unwrap();

        assert_eq!(filters.search_value, "ai");
        assert_eq!(filters.sort_by, DEFAULT_SORT_BY);
        assert_eq!(filters.sort_direction, SortDirection::Desc);
    }
}

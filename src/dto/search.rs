//! Wire shapes of the `/api/search` endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::asset::IpAssetSummary;
use crate::domain::search::{ResultPage, SearchQuery};
use crate::domain::types::{SearchType, SortDirection};

/// Body of `POST /api/search/all`.
///
/// Exactly one of `query`, `inventor` and `assignee` is populated, picked by
/// `search_type`; the other two are sent as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub asset_type: &'static str,
    pub data_source: Option<&'static str>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub jurisdiction: Option<String>,
    pub page: usize,
    pub size: usize,
    pub sort_by: String,
    pub sort_direction: SortDirection,
    pub search_type: SearchType,
    pub query: Option<String>,
    pub inventor: Option<String>,
    pub assignee: Option<String>,
}

impl From<&SearchQuery> for SearchRequest {
    fn from(query: &SearchQuery) -> Self {
        let text = |wanted: SearchType| {
            (query.search_type == wanted).then(|| query.text.clone())
        };

        Self {
            asset_type: query.mode.asset_type(),
            data_source: query.mode.data_source(),
            from_date: query.from_date,
            to_date: query.to_date,
            jurisdiction: query.jurisdiction.clone(),
            page: query.page,
            size: query.page_size.get(),
            sort_by: query.sort_by.clone(),
            sort_direction: query.sort_direction,
            search_type: query.search_type,
            query: text(SearchType::Keyword),
            inventor: text(SearchType::Inventor),
            assignee: text(SearchType::Assignee),
        }
    }
}

/// Response of `POST /api/search/all`. Absent or `null` fields count as
/// empty, zero or false.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub assets: Option<Vec<IpAssetSummary>>,
    pub total_elements: Option<u64>,
    pub current_page: Option<usize>,
    pub total_pages: Option<usize>,
    pub has_next: Option<bool>,
    pub has_previous: Option<bool>,
    pub data_source: Option<String>,
}

impl From<SearchResponse> for ResultPage {
    fn from(response: SearchResponse) -> Self {
        let page = ResultPage::new(
            response.assets.unwrap_or_default(),
            response.total_elements.unwrap_or_default(),
            response.current_page.unwrap_or_default(),
            response.total_pages.unwrap_or_default(),
        );

        let reported = (
            response.has_next.unwrap_or_default(),
            response.has_previous.unwrap_or_default(),
        );
        if reported != (page.has_next, page.has_previous) {
            log::warn!(
                "Backend navigation flags {reported:?} disagree with page {} of {}; using derived flags",
                page.current_page,
                page.total_pages
            );
        }

        page
    }
}

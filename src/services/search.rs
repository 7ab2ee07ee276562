//! Search page state machine: filters, pagination, persistence and refresh.
//!
//! All state lives in [`SearchState`] and only changes through
//! [`SearchState::apply`]. [`SearchController`] decides which actions to
//! apply, talks to the API and the store, and publishes refresh events.

use crate::api::SearchApi;
use crate::api::errors::ApiResult;
use crate::domain::asset::{IpAssetDetail, IpAssetSummary};
use crate::domain::notice::Notice;
use crate::domain::search::ResultPage;
use crate::domain::types::PageSize;
use crate::dto::search::{SearchRequest, SearchResponse};
use crate::events::{RefreshBus, RefreshCause, RefreshEvent};
use crate::forms::search::SearchFilters;
use crate::storage::PersistenceAdapter;
use crate::storage::session::{self, SessionSnapshot};

const SEARCH_FAILED: &str = "Search failed, please try again";

/// Asset shown in the detail view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub detail: IpAssetDetail,
    /// Endpoint that produced `detail`; `None` when the lookup failed and the
    /// summary from the result list is shown instead.
    pub api_source: Option<String>,
}

impl DetailView {
    fn fallback(asset: &IpAssetSummary) -> Self {
        Self {
            detail: IpAssetDetail::from(asset.clone()),
            api_source: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub filters: SearchFilters,
    pub page: ResultPage,
    pub page_size: PageSize,
    /// A search is in flight.
    pub loading: bool,
    pub notice: Option<Notice>,
    pub detail: Option<DetailView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchAction {
    FiltersChanged(SearchFilters),
    PageSizeChanged(PageSize),
    Started,
    Succeeded(ResultPage),
    Failed(String),
    Cleared,
    Restored(SessionSnapshot),
    DetailLoaded(DetailView),
    DetailClosed,
    NoticeDismissed,
}

impl SearchState {
    pub fn apply(&mut self, action: SearchAction) {
        match action {
            SearchAction::FiltersChanged(filters) => self.filters = filters,
            SearchAction::PageSizeChanged(page_size) => {
                self.page_size = page_size;
                self.page.current_page = 0;
                self.page.has_previous = false;
                self.page.has_next = self.page.total_pages > 1;
            }
            SearchAction::Started => {
                self.loading = true;
                self.notice = None;
            }
            SearchAction::Succeeded(page) => {
                self.page = page;
                self.loading = false;
            }
            SearchAction::Failed(message) => {
                self.page = ResultPage::default();
                self.loading = false;
                self.notice = Some(Notice::error(message));
            }
            SearchAction::Cleared => {
                self.filters = SearchFilters::default();
                self.page = ResultPage::default();
                self.loading = false;
                self.notice = None;
                self.detail = None;
            }
            SearchAction::Restored(snapshot) => {
                self.page = snapshot.result_page();
                self.page_size = snapshot.page_size;
                self.filters = snapshot.filters;
            }
            SearchAction::DetailLoaded(view) => self.detail = Some(view),
            SearchAction::DetailClosed => self.detail = None,
            SearchAction::NoticeDismissed => self.notice = None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(&self.page, self.page_size, &self.filters)
    }
}

/// A search that has been issued but whose response has not been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSearch {
    sequence: u64,
    request: SearchRequest,
    filters: SearchFilters,
    page_size: PageSize,
}

impl PendingSearch {
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }
}

pub struct SearchController<S> {
    store: S,
    bus: RefreshBus,
    state: SearchState,
    /// Sequence number of the most recently issued search. Only its
    /// completion is applied.
    latest: u64,
}

impl<S> SearchController<S>
where
    S: PersistenceAdapter,
{
    pub fn new(store: S, bus: RefreshBus) -> Self {
        Self {
            store,
            bus,
            state: SearchState::default(),
            latest: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.state.filters
    }

    pub fn set_filters(&mut self, filters: SearchFilters) {
        self.state.apply(SearchAction::FiltersChanged(filters));
    }

    /// Takes effect on the next search; the cursor moves back to page 0.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.state.apply(SearchAction::PageSizeChanged(page_size));
    }

    /// Asset at `index` on the current page.
    pub fn result(&self, index: usize) -> Option<&IpAssetSummary> {
        self.state.page.assets.get(index)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        let notice = self.state.notice.clone();
        self.state.apply(SearchAction::NoticeDismissed);
        notice
    }

    /// Loads every persisted slot, each falling back to its default on its
    /// own.
    pub fn restore_from_persistence(&mut self) {
        let snapshot = session::load(&self.store);
        log::debug!(
            "Restored search session: page {} of {}, {} cached result(s)",
            snapshot.current_page,
            snapshot.total_pages,
            snapshot.results.len()
        );
        self.state.apply(SearchAction::Restored(snapshot));
    }

    /// Validates the filters and marks a search for `page` as in flight.
    ///
    /// Invalid filters count as a failed search: results are reset, a notice
    /// is set and `None` is returned. Either way every earlier pending search
    /// is superseded.
    pub fn begin_search(&mut self, page: usize) -> Option<PendingSearch> {
        self.latest += 1;

        let query = match self.state.filters.to_query(page, self.state.page_size) {
            Ok(query) => query,
            Err(err) => {
                log::warn!("Rejected search filters: {err}");
                self.state.apply(SearchAction::Failed(err.to_string()));
                return None;
            }
        };

        self.state.apply(SearchAction::Started);
        Some(PendingSearch {
            sequence: self.latest,
            request: SearchRequest::from(&query),
            filters: self.state.filters.clone(),
            page_size: query.page_size,
        })
    }

    /// Applies the outcome of `pending`. Returns `false` when a newer search
    /// has been issued since, in which case the outcome is dropped.
    pub fn complete_search(
        &mut self,
        pending: PendingSearch,
        outcome: ApiResult<SearchResponse>,
    ) -> bool {
        if pending.sequence != self.latest {
            log::debug!(
                "Discarding superseded search #{} (latest is #{})",
                pending.sequence,
                self.latest
            );
            return false;
        }

        match outcome {
            Ok(response) => {
                let page = ResultPage::from(response);
                log::info!(
                    "Search returned {} of {} asset(s), page {} of {}",
                    page.assets.len(),
                    page.total_elements,
                    page.current_page.saturating_add(1),
                    page.total_pages
                );

                let snapshot = SessionSnapshot::new(&page, pending.page_size, &pending.filters);
                self.state.apply(SearchAction::Succeeded(page));
                if let Err(err) = session::save(&self.store, &snapshot) {
                    log::error!("Failed to persist search state: {err}");
                }
                self.bus.publish(RefreshEvent::new(RefreshCause::Search));
            }
            Err(err) => {
                log::error!("Search request failed: {err}");
                self.state.apply(SearchAction::Failed(SEARCH_FAILED.to_string()));
            }
        }

        true
    }

    /// Runs a search for `page` with the current filters. Failures never
    /// escape: they leave an empty result set and an error notice.
    pub fn submit_search<A>(&mut self, api: &A, page: usize) -> &SearchState
    where
        A: SearchApi + ?Sized,
    {
        if let Some(pending) = self.begin_search(page) {
            let outcome = api.search_all(pending.request());
            self.complete_search(pending, outcome);
        }
        &self.state
    }

    /// Re-runs the search on `page`. Pages outside `0..total_pages` are
    /// ignored and `false` is returned.
    pub fn change_page<A>(&mut self, api: &A, page: i64) -> bool
    where
        A: SearchApi + ?Sized,
    {
        match usize::try_from(page) {
            Ok(page) => self.go_to_page(api, page),
            Err(_) => {
                log::debug!("Ignoring page change to {page}");
                false
            }
        }
    }

    pub fn next_page<A>(&mut self, api: &A) -> bool
    where
        A: SearchApi + ?Sized,
    {
        match self.state.page.current_page.checked_add(1) {
            Some(next) => self.go_to_page(api, next),
            None => false,
        }
    }

    pub fn previous_page<A>(&mut self, api: &A) -> bool
    where
        A: SearchApi + ?Sized,
    {
        match self.state.page.current_page.checked_sub(1) {
            Some(previous) => self.go_to_page(api, previous),
            None => false,
        }
    }

    fn go_to_page<A>(&mut self, api: &A, page: usize) -> bool
    where
        A: SearchApi + ?Sized,
    {
        if !self.state.page.contains_page(page) {
            log::debug!(
                "Ignoring page change to {page}, result set has {} page(s)",
                self.state.page.total_pages
            );
            return false;
        }
        self.submit_search(api, page);
        true
    }

    /// Switches the page size and searches again from the first page.
    pub fn change_page_size<A>(&mut self, api: &A, page_size: PageSize) -> &SearchState
    where
        A: SearchApi + ?Sized,
    {
        self.set_page_size(page_size);
        self.submit_search(api, 0)
    }

    /// Resets filters and results and purges the persisted session. Any
    /// search still in flight is superseded.
    pub fn clear_filters(&mut self) {
        self.latest += 1;
        self.state.apply(SearchAction::Cleared);
        if let Err(err) = session::purge(&self.store) {
            log::error!("Failed to purge search state: {err}");
        }
    }

    /// Fetches the full record for `asset`, falling back to the summary when
    /// the lookup fails.
    pub fn view_details<A>(&mut self, api: &A, asset: &IpAssetSummary) -> DetailView
    where
        A: SearchApi + ?Sized,
    {
        let view = match asset.detail_lookup() {
            Some((id, source)) => match api.patent_details(id, source) {
                Ok(detail) => DetailView {
                    detail,
                    api_source: Some(format!("/api/search/patent/{id} (source: {source})")),
                },
                Err(err) => {
                    log::warn!("Detail lookup for {id} from {source} failed: {err}");
                    DetailView::fallback(asset)
                }
            },
            None => DetailView::fallback(asset),
        };

        self.state.apply(SearchAction::DetailLoaded(view.clone()));
        view
    }

    pub fn close_details(&mut self) {
        self.state.apply(SearchAction::DetailClosed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notice::NoticeLevel;

    fn page_of(current: usize, total: usize) -> ResultPage {
        let assets = vec![IpAssetSummary {
            external_id: Some(format!("EP-{current}")),
            ..Default::default()
        }];
        ResultPage::new(assets, (total * 10) as u64, current, total)
    }

    #[test]
    fn failure_resets_results_and_sets_notice() {
        let mut state = SearchState {
            page: page_of(1, 3),
            loading: true,
            ..Default::default()
        };

        state.apply(SearchAction::Failed("boom".into()));

        assert_eq!(state.page, ResultPage::default());
        assert!(!state.loading);
        assert_eq!(
            state.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Error)
        );
    }

    #[test]
    fn page_size_change_rewinds_cursor() {
        let mut state = SearchState {
            page: page_of(2, 3),
            ..Default::default()
        };

        state.apply(SearchAction::PageSizeChanged(PageSize::new(50).unwrap()));

        assert_eq!(state.page.current_page, 0);
        assert!(!state.page.has_previous);
        assert!(state.page.has_next);
        assert_eq!(state.page_size.get(), 50);
    }

    #[test]
    fn clear_keeps_page_size() {
        let mut state = SearchState {
            page: page_of(0, 2),
            page_size: PageSize::new(25).unwrap(),
            filters: SearchFilters {
                search_value: "drone".into(),
                ..Default::default()
            },
            ..Default::default()
        };

        state.apply(SearchAction::Cleared);

        assert_eq!(state.filters, SearchFilters::default());
        assert!(state.page.is_empty());
        assert_eq!(state.page.total_elements, 0);
        assert_eq!(state.page_size.get(), 25);
    }

    #[test]
    fn restore_then_snapshot_round_trips() {
        let snapshot = SessionSnapshot::new(
            &page_of(1, 4),
            PageSize::new(25).unwrap(),
            &SearchFilters {
                search_value: "battery".into(),
                ..Default::default()
            },
        );
        let mut state = SearchState::default();

        state.apply(SearchAction::Restored(snapshot.clone()));

        assert_eq!(state.snapshot(), snapshot);
    }
}

//! Versioned envelope holding the persisted slots of the search page.
//!
//! All slots live in one JSON document under [`SESSION_KEY`], but each slot
//! is decoded on its own: a malformed `filters` value does not stop the
//! results from coming back, it only resets `filters` to its default.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::asset::IpAssetSummary;
use crate::domain::search::ResultPage;
use crate::domain::types::PageSize;
use crate::forms::search::SearchFilters;
use crate::storage::PersistenceAdapter;
use crate::storage::errors::StorageResult;

pub const SESSION_KEY: &str = "searchState";
pub const SESSION_VERSION: u32 = 1;

pub const SEARCH_RESULTS: &str = "searchResults";
pub const TOTAL_RESULTS: &str = "totalResults";
pub const CURRENT_PAGE: &str = "currentPage";
pub const PAGE_SIZE: &str = "pageSize";
pub const TOTAL_PAGES: &str = "totalPages";
pub const HAS_NEXT: &str = "hasNext";
pub const HAS_PREVIOUS: &str = "hasPrevious";
pub const FILTERS: &str = "filters";

/// Everything the search page restores after navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub results: Vec<IpAssetSummary>,
    pub total_results: u64,
    pub current_page: usize,
    pub page_size: PageSize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub filters: SearchFilters,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    slots: BTreeMap<String, Value>,
}

impl SessionSnapshot {
    pub fn new(page: &ResultPage, page_size: PageSize, filters: &SearchFilters) -> Self {
        Self {
            results: page.assets.clone(),
            total_results: page.total_elements,
            current_page: page.current_page,
            page_size,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_previous: page.has_previous,
            filters: filters.clone(),
        }
    }

    /// The result page these slots describe, flags derived from the cursor.
    pub fn result_page(&self) -> ResultPage {
        ResultPage::new(
            self.results.clone(),
            self.total_results,
            self.current_page,
            self.total_pages,
        )
    }

    pub fn encode(&self) -> StorageResult<String> {
        let slots = BTreeMap::from([
            (SEARCH_RESULTS.to_string(), serde_json::to_value(&self.results)?),
            (TOTAL_RESULTS.to_string(), Value::from(self.total_results)),
            (CURRENT_PAGE.to_string(), Value::from(self.current_page)),
            (PAGE_SIZE.to_string(), Value::from(self.page_size.get())),
            (TOTAL_PAGES.to_string(), Value::from(self.total_pages)),
            (HAS_NEXT.to_string(), Value::from(self.has_next)),
            (HAS_PREVIOUS.to_string(), Value::from(self.has_previous)),
            (FILTERS.to_string(), serde_json::to_value(&self.filters)?),
        ]);

        Ok(serde_json::to_string(&Envelope {
            version: SESSION_VERSION,
            slots,
        })?)
    }

    /// Decodes a stored envelope. Never fails: anything unreadable falls
    /// back to its default, slot by slot.
    pub fn decode(raw: &str) -> Self {
        Self::decode_envelope(raw).unwrap_or_default()
    }

    /// `None` when the envelope as a whole is unusable.
    fn decode_envelope(raw: &str) -> Option<Self> {
        let envelope: Envelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::warn!("Ignoring unreadable search session: {err}");
                return None;
            }
        };

        if envelope.version != SESSION_VERSION {
            log::warn!(
                "Ignoring search session with version {} (expected {SESSION_VERSION})",
                envelope.version
            );
            return None;
        }

        let mut slots = envelope.slots;
        let mut snapshot = Self {
            results: take_slot(&mut slots, SEARCH_RESULTS),
            total_results: take_slot(&mut slots, TOTAL_RESULTS),
            current_page: take_slot(&mut slots, CURRENT_PAGE),
            page_size: take_slot(&mut slots, PAGE_SIZE),
            total_pages: take_slot(&mut slots, TOTAL_PAGES),
            has_next: take_slot(&mut slots, HAS_NEXT),
            has_previous: take_slot(&mut slots, HAS_PREVIOUS),
            filters: take_slot(&mut slots, FILTERS),
        };
        snapshot.check_cursor();
        Some(snapshot)
    }

    /// Resets a cursor that points past the last page and re-derives the
    /// navigation flags from it.
    fn check_cursor(&mut self) {
        if self.current_page >= self.total_pages.max(1) {
            log::warn!(
                "Ignoring malformed `{CURRENT_PAGE}` slot: page {} of {}",
                self.current_page,
                self.total_pages
            );
            self.current_page = 0;
        }

        let page = self.result_page();
        if (self.has_next, self.has_previous) != (page.has_next, page.has_previous) {
            log::warn!("Stored navigation flags disagree with the cursor; using derived flags");
        }
        self.has_next = page.has_next;
        self.has_previous = page.has_previous;
    }
}

fn take_slot<T>(slots: &mut BTreeMap<String, Value>, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match slots.remove(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed `{key}` slot: {err}");
            T::default()
        }),
    }
}

/// Reads the persisted snapshot, defaulting when absent or unreadable. An
/// unusable envelope is dropped from the store.
pub fn load<P>(store: &P) -> SessionSnapshot
where
    P: PersistenceAdapter + ?Sized,
{
    match store.get(SESSION_KEY) {
        Ok(Some(raw)) => SessionSnapshot::decode_envelope(&raw).unwrap_or_else(|| {
            if let Err(err) = store.remove(SESSION_KEY) {
                log::warn!("Failed to drop unusable search session: {err}");
            }
            SessionSnapshot::default()
        }),
        Ok(None) => SessionSnapshot::default(),
        Err(err) => {
            log::warn!("Failed to read search session: {err}");
            SessionSnapshot::default()
        }
    }
}

pub fn save<P>(store: &P, snapshot: &SessionSnapshot) -> StorageResult<()>
where
    P: PersistenceAdapter + ?Sized,
{
    store.set(SESSION_KEY, &snapshot.encode()?)
}

/// Drops everything the store holds.
pub fn purge<P>(store: &P) -> StorageResult<()>
where
    P: PersistenceAdapter + ?Sized,
{
    store.clear()
}

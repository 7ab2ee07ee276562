#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use ipsearch::api::errors::{ApiError, ApiResult};
use ipsearch::api::{SearchApi, TrackerApi};
use ipsearch::domain::asset::{IpAssetDetail, IpAssetSummary};
use ipsearch::dto::search::{SearchRequest, SearchResponse};
use ipsearch::dto::tracker::{SubscriptionRecord, TrackerMessage, UnsubscribeRequest};

/// In-memory backend that replays queued search outcomes and records every
/// call it receives.
#[derive(Default)]
pub struct ScriptedApi {
    pub searches: RefCell<VecDeque<ApiResult<SearchResponse>>>,
    pub search_requests: RefCell<Vec<SearchRequest>>,
    pub details: RefCell<Option<ApiResult<IpAssetDetail>>>,
    pub detail_requests: RefCell<Vec<(String, String)>>,
    pub subscriptions: RefCell<Vec<SubscriptionRecord>>,
    pub fail_tracker: bool,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_search(&self, outcome: ApiResult<SearchResponse>) -> &Self {
        self.searches.borrow_mut().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.search_requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        self.search_requests.borrow().last().cloned()
    }
}

impl SearchApi for ScriptedApi {
    fn search_all(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        self.search_requests.borrow_mut().push(request.clone());
        self.searches
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".into())))
    }

    fn patent_details(&self, id: &str, source: &str) -> ApiResult<IpAssetDetail> {
        self.detail_requests
            .borrow_mut()
            .push((id.to_string(), source.to_string()));
        self.details
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(ApiError::Application {
                status: 404,
                body: "Patent not found".into(),
            }))
    }
}

impl TrackerApi for ScriptedApi {
    fn subscribe(&self, asset: &IpAssetSummary) -> ApiResult<TrackerMessage> {
        if self.fail_tracker {
            return Err(network_error());
        }
        self.subscriptions.borrow_mut().push(SubscriptionRecord {
            ip_asset: Some(asset.clone()),
            ..Default::default()
        });
        Ok(TrackerMessage {
            status: Some("SUCCESS".into()),
            message: Some("Subscribed".into()),
        })
    }

    fn unsubscribe(&self, request: &UnsubscribeRequest) -> ApiResult<()> {
        if self.fail_tracker {
            return Err(network_error());
        }
        self.subscriptions.borrow_mut().retain(|record| {
            record
                .ip_asset
                .as_ref()
                .and_then(IpAssetSummary::external_id)
                != Some(request.external_id.as_str())
        });
        Ok(())
    }

    fn list_subscriptions(&self) -> ApiResult<Vec<SubscriptionRecord>> {
        if self.fail_tracker {
            return Err(network_error());
        }
        Ok(self.subscriptions.borrow().clone())
    }
}

pub fn network_error() -> ApiError {
    ApiError::Network("connection refused".into())
}

pub fn asset(external_id: &str, title: &str) -> IpAssetSummary {
    IpAssetSummary {
        external_id: Some(external_id.into()),
        publication_number: Some(external_id.into()),
        title: Some(title.into()),
        patent_office: Some("USPTO".into()),
        ..Default::default()
    }
}

/// A well-formed response for `current` out of `total_pages` pages.
pub fn response(current: usize, total_pages: usize, total: u64) -> SearchResponse {
    let assets = (0..2)
        .map(|i| asset(&format!("US-{current}-{i}"), &format!("Widget {current}.{i}")))
        .collect();
    SearchResponse {
        assets: Some(assets),
        total_elements: Some(total),
        current_page: Some(current),
        total_pages: Some(total_pages),
        has_next: Some(current + 1 < total_pages),
        has_previous: Some(current > 0),
        data_source: None,
    }
}

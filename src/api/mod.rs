use crate::{
    api::errors::ApiResult,
    domain::asset::{IpAssetDetail, IpAssetSummary},
    dto::{
        search::{SearchRequest, SearchResponse},
        tracker::{SubscriptionRecord, TrackerMessage, UnsubscribeRequest},
    },
};

pub mod errors;
#[cfg(feature = "client")]
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

#[cfg(feature = "client")]
pub use http::HttpApi;

pub trait SearchApi {
    /// `POST /api/search/all`
    fn search_all(&self, request: &SearchRequest) -> ApiResult<SearchResponse>;
    /// `GET /api/search/patent/{id}?source=`
    fn patent_details(&self, id: &str, source: &str) -> ApiResult<IpAssetDetail>;
}

pub trait TrackerApi {
    /// `POST /api/tracker/subscribe`
    fn subscribe(&self, asset: &IpAssetSummary) -> ApiResult<TrackerMessage>;
    /// `POST /api/tracker/unsubscribe`
    fn unsubscribe(&self, request: &UnsubscribeRequest) -> ApiResult<()>;
    /// `GET /api/tracker/subscriptionsbyid`
    fn list_subscriptions(&self) -> ApiResult<Vec<SubscriptionRecord>>;
}

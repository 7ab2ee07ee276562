//! Mock API implementations for isolating services in tests.

use mockall::mock;

use crate::api::errors::ApiResult;
use crate::api::{SearchApi, TrackerApi};
use crate::domain::asset::{IpAssetDetail, IpAssetSummary};
use crate::dto::search::{SearchRequest, SearchResponse};
use crate::dto::tracker::{SubscriptionRecord, TrackerMessage, UnsubscribeRequest};

mock! {
    pub Api {}

    impl SearchApi for Api {
        fn search_all(&self, request: &SearchRequest) -> ApiResult<SearchResponse>;
        fn patent_details(&self, id: &str, source: &str) -> ApiResult<IpAssetDetail>;
    }

    impl TrackerApi for Api {
        fn subscribe(&self, asset: &IpAssetSummary) -> ApiResult<TrackerMessage>;
        fn unsubscribe(&self, request: &UnsubscribeRequest) -> ApiResult<()>;
        fn list_subscriptions(&self) -> ApiResult<Vec<SubscriptionRecord>>;
    }
}

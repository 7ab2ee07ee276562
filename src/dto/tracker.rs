//! Wire shapes of the `/api/tracker` endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::asset::IpAssetSummary;

/// Body of `POST /api/tracker/unsubscribe`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    pub external_id: String,
}

/// Status payload returned by `POST /api/tracker/subscribe`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerMessage {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl TrackerMessage {
    /// The backend answers `INFO` when the subscription already existed.
    pub fn already_subscribed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("INFO"))
    }
}

/// One entry of `GET /api/tracker/subscriptionsbyid`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionRecord {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub ip_asset: Option<IpAssetSummary>,
    pub created_at: Option<String>,
}

//! Local mirror of the viewer's asset subscriptions.
//!
//! The key set changes only after the backend confirms a subscribe or
//! unsubscribe, so a failed round-trip never leaves an asset looking
//! subscribed.

use std::collections::BTreeSet;

use crate::api::TrackerApi;
use crate::domain::asset::IpAssetSummary;
use crate::domain::notice::Notice;
use crate::dto::tracker::UnsubscribeRequest;
use crate::events::{RefreshBus, RefreshCause, RefreshEvent};
use crate::services::{ServiceError, ServiceResult};

pub struct SubscriptionTracker {
    subscribed: BTreeSet<String>,
    pending: Option<String>,
    notice: Option<Notice>,
    bus: RefreshBus,
}

impl SubscriptionTracker {
    pub fn new(bus: RefreshBus) -> Self {
        Self {
            subscribed: BTreeSet::new(),
            pending: None,
            notice: None,
            bus,
        }
    }

    pub fn is_subscribed(&self, asset: &IpAssetSummary) -> bool {
        asset
            .key()
            .is_some_and(|key| self.subscribed.contains(&key))
    }

    pub fn subscribed_keys(&self) -> impl Iterator<Item = &str> {
        self.subscribed.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.subscribed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }

    /// Key of the asset whose round-trip is in flight.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Replaces the key set with the backend's list of subscriptions.
    pub fn sync_from_backend<A>(&mut self, api: &A) -> ServiceResult<usize>
    where
        A: TrackerApi + ?Sized,
    {
        let records = api.list_subscriptions().map_err(|err| {
            log::error!("Failed to load subscriptions: {err}");
            err
        })?;

        self.subscribed = records
            .into_iter()
            .filter_map(|record| record.ip_asset.and_then(|asset| asset.key()))
            .collect();
        Ok(self.subscribed.len())
    }

    pub fn subscribe<A>(&mut self, api: &A, asset: &IpAssetSummary) -> ServiceResult<()>
    where
        A: TrackerApi + ?Sized,
    {
        let Some(external_id) = asset.external_id() else {
            self.notice = Some(Notice::error("Failed to subscribe asset"));
            return Err(ServiceError::MissingExternalId);
        };
        let key = external_id.to_string();

        self.pending = Some(key.clone());
        let outcome = api.subscribe(asset);
        self.pending = None;

        match outcome {
            Ok(message) => {
                if message.already_subscribed() {
                    log::info!("Asset {key} was already subscribed");
                }
                self.subscribed.insert(key);
                self.notice = Some(Notice::success("Asset subscribed successfully"));
                self.bus.publish(RefreshEvent::new(RefreshCause::Subscribed));
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to subscribe asset {key}: {err}");
                self.notice = Some(Notice::error("Failed to subscribe asset"));
                Err(err.into())
            }
        }
    }

    pub fn unsubscribe<A>(&mut self, api: &A, asset: &IpAssetSummary) -> ServiceResult<()>
    where
        A: TrackerApi + ?Sized,
    {
        let (Some(external_id), Some(key)) = (asset.external_id(), asset.key()) else {
            self.notice = Some(Notice::error("Failed to unsubscribe asset"));
            return Err(ServiceError::MissingExternalId);
        };
        let request = UnsubscribeRequest {
            external_id: external_id.to_string(),
        };

        self.pending = Some(key.clone());
        let outcome = api.unsubscribe(&request);
        self.pending = None;

        match outcome {
            Ok(()) => {
                self.subscribed.remove(&key);
                self.notice = Some(Notice::success("Asset unsubscribed successfully"));
                self.bus.publish(RefreshEvent::new(RefreshCause::Unsubscribed));
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to unsubscribe asset {key}: {err}");
                self.notice = Some(Notice::error("Failed to unsubscribe asset"));
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::api::errors::{ApiError, ApiResult};
    use crate::dto::tracker::{SubscriptionRecord, TrackerMessage};

    #[derive(Default)]
    struct FakeTracker {
        fail: bool,
        unsubscribed: RefCell<Vec<String>>,
        records: Vec<SubscriptionRecord>,
    }

    impl TrackerApi for FakeTracker {
        fn subscribe(&self, _asset: &IpAssetSummary) -> ApiResult<TrackerMessage> {
            if self.fail {
                return Err(ApiError::Network("connection refused".into()));
            }
            Ok(TrackerMessage {
                status: Some("SUCCESS".into()),
                message: None,
            })
        }

        fn unsubscribe(&self, request: &UnsubscribeRequest) -> ApiResult<()> {
            if self.fail {
                return Err(ApiError::Application {
                    status: 500,
                    body: "IP Asset not found".into(),
                });
            }
            self.unsubscribed
                .borrow_mut()
                .push(request.external_id.clone());
            Ok(())
        }

        fn list_subscriptions(&self) -> ApiResult<Vec<SubscriptionRecord>> {
            Ok(self.records.clone())
        }
    }

    fn asset(external_id: &str) -> IpAssetSummary {
        IpAssetSummary {
            external_id: Some(external_id.into()),
            ..Default::default()
        }
    }

    #[test]
    fn subscribe_marks_after_success_and_refreshes() {
        let bus = RefreshBus::new();
        let listener = bus.subscribe();
        let mut tracker = SubscriptionTracker::new(bus);

        tracker
            .subscribe(&FakeTracker::default(), &asset("US-1"))
            .unwrap();

        assert!(tracker.is_subscribed(&asset("US-1")));
        assert!(tracker.pending().is_none());
        assert_eq!(
            listener.drain(),
            vec![RefreshEvent::new(RefreshCause::Subscribed)]
        );
        assert!(!tracker.take_notice().unwrap().is_error());
    }

    #[test]
    fn failed_subscribe_leaves_set_untouched() {
        let bus = RefreshBus::new();
        let listener = bus.subscribe();
        let mut tracker = SubscriptionTracker::new(bus);
        let api = FakeTracker {
            fail: true,
            ..Default::default()
        };

        let result = tracker.subscribe(&api, &asset("US-1"));

        assert!(matches!(result, Err(ServiceError::Api(_))));
        assert!(tracker.is_empty());
        assert!(listener.drain().is_empty());
        assert!(tracker.take_notice().unwrap().is_error());
    }

    #[test]
    fn subscribe_requires_external_id() {
        let mut tracker = SubscriptionTracker::new(RefreshBus::new());
        let asset = IpAssetSummary {
            id: Some(3),
            ..Default::default()
        };

        let result = tracker.subscribe(&FakeTracker::default(), &asset);

        assert!(matches!(result, Err(ServiceError::MissingExternalId)));
    }

    #[test]
    fn failed_unsubscribe_keeps_mark() {
        let mut tracker = SubscriptionTracker::new(RefreshBus::new());
        tracker
            .subscribe(&FakeTracker::default(), &asset("EP-9"))
            .unwrap();
        let api = FakeTracker {
            fail: true,
            ..Default::default()
        };

        assert!(tracker.unsubscribe(&api, &asset("EP-9")).is_err());
        assert!(tracker.is_subscribed(&asset("EP-9")));
    }

    #[test]
    fn unsubscribe_sends_external_id_and_clears_mark() {
        let mut tracker = SubscriptionTracker::new(RefreshBus::new());
        let api = FakeTracker::default();
        tracker.subscribe(&api, &asset("EP-9")).unwrap();

        tracker.unsubscribe(&api, &asset("EP-9")).unwrap();

        assert!(!tracker.is_subscribed(&asset("EP-9")));
        assert_eq!(*api.unsubscribed.borrow(), vec!["EP-9".to_string()]);
    }

    #[test]
    fn sync_replaces_keys_from_backend() {
        let mut tracker = SubscriptionTracker::new(RefreshBus::new());
        tracker
            .subscribe(&FakeTracker::default(), &asset("stale"))
            .unwrap();
        let api = FakeTracker {
            records: vec![
                SubscriptionRecord {
                    ip_asset: Some(asset("US-1")),
                    ..Default::default()
                },
                SubscriptionRecord {
                    ip_asset: None,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        assert_eq!(tracker.sync_from_backend(&api).unwrap(), 1);
        assert_eq!(tracker.subscribed_keys().collect::<Vec<_>>(), vec!["US-1"]);
    }
}

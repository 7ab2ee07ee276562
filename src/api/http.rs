//! Blocking `reqwest` implementation of the API traits.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::errors::{ApiError, ApiResult};
use crate::api::{SearchApi, TrackerApi};
use crate::domain::asset::{IpAssetDetail, IpAssetSummary};
use crate::dto::search::{SearchRequest, SearchResponse};
use crate::dto::tracker::{SubscriptionRecord, TrackerMessage, UnsubscribeRequest};
use crate::models::config::ClientConfig;

/// HTTP client for the platform backend.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config
                .api_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
        })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = self.authorize(builder).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(ApiError::Application {
            status: status.as_u16(),
            body,
        })
    }

    fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.send(builder)?
            .json::<T>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl SearchApi for HttpApi {
    fn search_all(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        let url = self.endpoint(&["api", "search", "all"])?;
        log::debug!("POST {url} page={} size={}", request.page, request.size);
        self.send_json(self.client.post(url).json(request))
    }

    fn patent_details(&self, id: &str, source: &str) -> ApiResult<IpAssetDetail> {
        let url = self.endpoint(&["api", "search", "patent", id])?;
        log::debug!("GET {url} source={source}");
        self.send_json(self.client.get(url).query(&[("source", source)]))
    }
}

impl TrackerApi for HttpApi {
    fn subscribe(&self, asset: &IpAssetSummary) -> ApiResult<TrackerMessage> {
        let url = self.endpoint(&["api", "tracker", "subscribe"])?;
        log::debug!("POST {url} externalId={:?}", asset.external_id);
        self.send_json(self.client.post(url).json(asset))
    }

    fn unsubscribe(&self, request: &UnsubscribeRequest) -> ApiResult<()> {
        let url = self.endpoint(&["api", "tracker", "unsubscribe"])?;
        log::debug!("POST {url} externalId={}", request.external_id);
        // The backend answers with a plain-text confirmation.
        self.send(self.client.post(url).json(request)).map(|_| ())
    }

    fn list_subscriptions(&self) -> ApiResult<Vec<SubscriptionRecord>> {
        let url = self.endpoint(&["api", "tracker", "subscriptionsbyid"])?;
        self.send_json(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig {
            api_base_url: base.to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let api = HttpApi::new(&config("http://localhost:8080/platform/")).unwrap();

        let url = api.endpoint(&["api", "search", "patent", "EP 1/2"]).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/platform/api/search/patent/EP%201%2F2"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpApi::new(&config("not a url")),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpApi::new(&config("mailto:ops@example.com")),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn blank_token_is_ignored() {
        let api = HttpApi::new(&ClientConfig {
            api_token: Some("  ".into()),
            ..ClientConfig::default()
        })
        .unwrap();

        assert!(api.token.is_none());
    }
}

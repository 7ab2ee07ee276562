use serde::{Deserialize, Serialize};

/// Detail lookups fall back to this office when the asset names none.
pub const DEFAULT_DETAIL_SOURCE: &str = "EPO";

/// One IP asset row as returned by the search backend.
///
/// Every field is optional because the upstream offices fill them unevenly.
/// Dates are kept as the strings the backend sent.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IpAssetSummary {
    pub id: Option<i64>,
    pub external_id: Option<String>,
    pub publication_number: Option<String>,
    pub application_number: Option<String>,
    pub title: Option<String>,
    pub assignee: Option<String>,
    pub inventor: Option<String>,
    pub asset_type: Option<String>,
    pub jurisdiction: Option<String>,
    pub patent_office: Option<String>,
    pub status: Option<String>,
    pub url: Option<String>,
    pub priority_date: Option<String>,
    pub application_date: Option<String>,
    pub publication_date: Option<String>,
    pub grant_date: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl IpAssetSummary {
    /// Key used to mark the asset as subscribed: the external id, else the
    /// numeric id.
    pub fn key(&self) -> Option<String> {
        non_blank(&self.external_id)
            .map(str::to_string)
            .or_else(|| self.id.map(|id| id.to_string()))
    }

    pub fn external_id(&self) -> Option<&str> {
        non_blank(&self.external_id)
    }

    /// Number shown to the user: publication number, else application number.
    pub fn display_number(&self) -> Option<&str> {
        non_blank(&self.publication_number).or_else(|| non_blank(&self.application_number))
    }

    /// Identifier and office used for the deep-detail lookup.
    pub fn detail_lookup(&self) -> Option<(&str, &str)> {
        let id = non_blank(&self.publication_number).or_else(|| non_blank(&self.external_id))?;
        let source = non_blank(&self.patent_office).unwrap_or(DEFAULT_DETAIL_SOURCE);
        Some((id, source))
    }
}

/// Full record of an asset as returned by the detail endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IpAssetDetail {
    #[serde(flatten)]
    pub summary: IpAssetSummary,
    pub description: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub claims: Option<String>,
    pub link: Option<String>,
    pub ipc_classification: Option<String>,
    pub cpc_classification: Option<String>,
    pub legal_status: Option<String>,
}

impl IpAssetDetail {
    /// Link to the full record, preferring the asset URL.
    pub fn record_url(&self) -> Option<&str> {
        non_blank(&self.summary.url).or_else(|| non_blank(&self.link))
    }
}

impl From<IpAssetSummary> for IpAssetDetail {
    fn from(summary: IpAssetSummary) -> Self {
        Self {
            summary,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefers_external_id() {
        let asset = IpAssetSummary {
            id: Some(7),
            external_id: Some("US-123".into()),
            ..Default::default()
        };
        assert_eq!(asset.key().as_deref(), Some("US-123"));

        let asset = IpAssetSummary {
            id: Some(7),
            external_id: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(asset.key().as_deref(), Some("7"));
    }

    #[test]
    fn detail_lookup_defaults_to_epo() {
        let asset = IpAssetSummary {
            external_id: Some("EP1".into()),
            ..Default::default()
        };
        assert_eq!(asset.detail_lookup(), Some(("EP1", "EPO")));

        let asset = IpAssetSummary {
            publication_number: Some("US2020001".into()),
            external_id: Some("x".into()),
            patent_office: Some("USPTO".into()),
            ..Default::default()
        };
        assert_eq!(asset.detail_lookup(), Some(("US2020001", "USPTO")));
    }

    #[test]
    fn detail_decodes_abstract_field() {
        let detail: IpAssetDetail = serde_json::from_str(
            r#"{"externalId":"EP1","title":"Widget","abstract":"A widget.","assetType":"PATENT"}"#,
        )
        .unwrap();
        assert_eq!(detail.summary.title.as_deref(), Some("Widget"));
        assert_eq!(detail.abstract_text.as_deref(), Some("A widget."));
    }
}

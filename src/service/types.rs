//! Wire types exchanged with the Museum Service.
//!
//! Deserialization here is the schema: required keys must be present, nullable keys must
//! be present even when `null`, and wrong types are errors. Nothing is coerced.

use serde::{Deserialize, Deserializer, Serialize};

/// Present-but-nullable field: `null` maps to `None`, a missing key is an error.
fn nullable<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(format!("visibility must be public or private, got {other:?}")),
        }
    }
}

/// A saved museum record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Museum {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<String>,
    pub visibility: Visibility,
    #[serde(deserialize_with = "nullable")]
    pub image_url: Option<String>,
    pub created_at: String,
}

/// Body of `POST /api/v1/museums`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMuseumRequest {
    pub user_id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CreateMuseumRequest {
    /// Request with only the required fields set.
    pub fn new(user_id: u64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            description: None,
            visibility: None,
            image_url: None,
        }
    }
}

/// Body of `PATCH /api/v1/museums/{id}/title`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTitleRequest {
    pub title: String,
}

/// Acknowledgement returned by the title update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTitleResponse {
    pub message: String,
}

/// Filters for the artwork search passthrough. Unset fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkSearchQuery {
    #[serde(default)]
    pub is_highlight: Option<bool>,
    #[serde(default)]
    pub object_date: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ArtworkSearchQuery {
    /// Query-string pairs in a stable order. Empty strings and a zero limit count as unset.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(h) = self.is_highlight {
            out.push(("isHighlight", h.to_string()));
        }
        let texts = [
            ("objectDate", &self.object_date),
            ("city", &self.city),
            ("medium", &self.medium),
        ];
        for (key, value) in texts {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                out.push((key, v.to_string()));
            }
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            out.push(("limit", limit.to_string()));
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkSearchResponse {
    pub total: u64,
    #[serde(rename = "objectIDs")]
    pub object_ids: Vec<u64>,
}

/// Third-party artwork detail. Only `objectID` is required; fields not modelled here are
/// kept verbatim in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetObject {
    #[serde(rename = "objectID")]
    pub object_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_highlight: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public_domain: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_image_small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(rename = "objectURL", default, skip_serializing_if = "Option::is_none")]
    pub object_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MetObject {
    /// Image to show for this object: the small rendition when present, else the full one.
    pub fn display_image(&self) -> Option<String> {
        [&self.primary_image_small, &self.primary_image]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Error body the service sends with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

#[cfg(test)]
#[path = "../../tests/unit/service/types.rs"]
mod tests;

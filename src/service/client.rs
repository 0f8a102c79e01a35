//! REST client for the Museum Service.
//!
//! Every response body goes through [`parse_json`] before it is returned; a body that does
//! not match its schema is an error, never a partial value.

use std::time::Duration;

use futures::future::join_all;

use crate::{
    catalog::artwork::ArtworkCatalog,
    foundation::error::{MuseumError, MuseumResult},
    service::{
        schema::{error_message, parse_json},
        types::{
            ArtworkSearchQuery, ArtworkSearchResponse, CreateMuseumRequest, HealthStatus,
            MetObject, Museum, UpdateTitleRequest, UpdateTitleResponse,
        },
    },
};

/// Default page size for the public museum listing.
pub const DEFAULT_MUSEUM_LIMIT: u32 = 10;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Operations the composition screen and lobby need from the Museum Service.
#[async_trait::async_trait]
pub trait MuseumService: Send + Sync {
    /// Public museums of every user except `exclude_user_id`.
    async fn fetch_public_museums(
        &self,
        exclude_user_id: u64,
        limit: Option<u32>,
    ) -> MuseumResult<Vec<Museum>>;

    async fn fetch_museum(&self, id: u64) -> MuseumResult<Museum>;

    async fn create_museum(&self, req: &CreateMuseumRequest) -> MuseumResult<Museum>;

    async fn update_museum_title(&self, id: u64, title: &str)
    -> MuseumResult<UpdateTitleResponse>;

    async fn search_artworks(&self, query: &ArtworkSearchQuery)
    -> MuseumResult<ArtworkSearchResponse>;

    async fn fetch_met_object(&self, object_id: u64) -> MuseumResult<MetObject>;

    async fn health(&self) -> MuseumResult<HealthStatus>;
}

/// [`MuseumService`] over HTTP.
#[derive(Clone, Debug)]
pub struct MuseumClient {
    http: reqwest::Client,
    base_url: String,
}

impl MuseumClient {
    /// Client with the default timeouts.
    pub fn new(base_url: &str) -> MuseumResult<Self> {
        Self::with_timeouts(
            base_url,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> MuseumResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(MuseumError::configuration("museum service base url is empty"));
        }
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| MuseumError::configuration(format!("build http client: {e}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send `req` and return the body of a 2xx response.
    async fn send(&self, req: reqwest::RequestBuilder, operation: &str) -> MuseumResult<Vec<u8>> {
        let response = req
            .send()
            .await
            .map_err(|e| MuseumError::transport(format!("{operation}: {e}")))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| MuseumError::transport(format!("{operation}: read body: {e}")))?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("{operation} failed: {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), %message, "museum service error");
            return Err(MuseumError::http(status.as_u16(), message));
        }
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl MuseumService for MuseumClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_public_museums(
        &self,
        exclude_user_id: u64,
        limit: Option<u32>,
    ) -> MuseumResult<Vec<Museum>> {
        let limit = limit.unwrap_or(DEFAULT_MUSEUM_LIMIT);
        let req = self.http.get(self.url("/api/v1/museums")).query(&[
            ("excludeUserId", exclude_user_id.to_string()),
            ("limit", limit.to_string()),
        ]);
        let body = self.send(req, "fetch museums").await?;
        parse_json(&body, "museums")
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_museum(&self, id: u64) -> MuseumResult<Museum> {
        let req = self.http.get(self.url(&format!("/api/v1/museums/{id}")));
        let body = self.send(req, "fetch museum").await?;
        parse_json(&body, "museum")
    }

    #[tracing::instrument(skip(self, req), fields(user_id = req.user_id))]
    async fn create_museum(&self, req: &CreateMuseumRequest) -> MuseumResult<Museum> {
        let http = self.http.post(self.url("/api/v1/museums")).json(req);
        let body = self.send(http, "create museum").await?;
        let museum: Museum = parse_json(&body, "create museum")?;
        tracing::info!(museum_id = museum.id, "museum created");
        Ok(museum)
    }

    #[tracing::instrument(skip(self))]
    async fn update_museum_title(
        &self,
        id: u64,
        title: &str,
    ) -> MuseumResult<UpdateTitleResponse> {
        let req = self
            .http
            .patch(self.url(&format!("/api/v1/museums/{id}/title")))
            .json(&UpdateTitleRequest {
                title: title.to_string(),
            });
        let body = self.send(req, "update museum title").await?;
        parse_json(&body, "update title")
    }

    #[tracing::instrument(skip(self))]
    async fn search_artworks(
        &self,
        query: &ArtworkSearchQuery,
    ) -> MuseumResult<ArtworkSearchResponse> {
        let req = self
            .http
            .get(self.url("/api/v1/search/artworks"))
            .query(&query.to_pairs());
        let body = self.send(req, "search artworks").await?;
        parse_json(&body, "artwork search")
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_met_object(&self, object_id: u64) -> MuseumResult<MetObject> {
        let req = self
            .http
            .get(self.url(&format!("/api/v1/met/objects/{object_id}")));
        let body = self.send(req, "fetch met object").await?;
        parse_json(&body, "met object")
    }

    #[tracing::instrument(skip(self))]
    async fn health(&self) -> MuseumResult<HealthStatus> {
        let req = self.http.get(self.url("/health"));
        let body = self.send(req, "health check").await?;
        parse_json(&body, "health")
    }
}

/// Search the artwork catalog and fetch every hit's details concurrently.
///
/// A failed search fails the call. Individual object failures are logged and skipped, so
/// one broken record does not empty the sidebar.
#[tracing::instrument(skip(service))]
pub async fn discover_artworks(
    service: &dyn MuseumService,
    query: &ArtworkSearchQuery,
) -> MuseumResult<ArtworkCatalog> {
    let hits = service.search_artworks(query).await?;
    let fetches = hits
        .object_ids
        .iter()
        .map(|id| service.fetch_met_object(*id));
    let results = join_all(fetches).await;

    let mut objects = Vec::with_capacity(results.len());
    for (id, res) in hits.object_ids.iter().zip(results) {
        match res {
            Ok(obj) => objects.push(obj),
            Err(err) => tracing::warn!(object_id = id, %err, "artwork detail skipped"),
        }
    }
    let catalog = ArtworkCatalog::from_met_objects(&objects);
    tracing::debug!(hits = hits.object_ids.len(), placeable = catalog.len(), "artworks discovered");
    Ok(catalog)
}

#[cfg(test)]
#[path = "../../tests/unit/service/client.rs"]
mod tests;

use super::*;

struct CannedService {
    ids: Vec<u64>,
}

#[async_trait::async_trait]
impl MuseumService for CannedService {
    async fn fetch_public_museums(&self, _: u64, _: Option<u32>) -> MuseumResult<Vec<Museum>> {
        Ok(Vec::new())
    }

    async fn fetch_museum(&self, id: u64) -> MuseumResult<Museum> {
        Err(MuseumError::http(404, format!("museum {id} not found")))
    }

    async fn create_museum(&self, _: &CreateMuseumRequest) -> MuseumResult<Museum> {
        Err(MuseumError::http(500, "unavailable"))
    }

    async fn update_museum_title(&self, _: u64, _: &str) -> MuseumResult<UpdateTitleResponse> {
        Err(MuseumError::http(500, "unavailable"))
    }

    async fn search_artworks(&self, _: &ArtworkSearchQuery) -> MuseumResult<ArtworkSearchResponse> {
        Ok(ArtworkSearchResponse {
            total: self.ids.len() as u64,
            object_ids: self.ids.clone(),
        })
    }

    async fn fetch_met_object(&self, object_id: u64) -> MuseumResult<MetObject> {
        if object_id == 13 {
            return Err(MuseumError::schema("invalid met object response"));
        }
        let v = serde_json::json!({
            "objectID": object_id,
            "title": format!("Work {object_id}"),
            "primaryImageSmall": format!("https://img/{object_id}.jpg"),
        });
        serde_json::from_value(v).map_err(|e| MuseumError::serde(e.to_string()))
    }

    async fn health(&self) -> MuseumResult<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }
}

#[tokio::test]
async fn discover_artworks_skips_failed_details() {
    let svc = CannedService {
        ids: vec![11, 12, 13, 14],
    };
    let catalog = discover_artworks(&svc, &ArtworkSearchQuery::default())
        .await
        .unwrap();
    let ids: Vec<_> = catalog.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![11, 12, 14]);
    assert_eq!(catalog.get(12).unwrap().display_name, "Work 12");
}

#[test]
fn base_url_is_trimmed_and_required() {
    let c = MuseumClient::new("http://localhost:8080/").unwrap();
    assert_eq!(c.base_url(), "http://localhost:8080");
    assert_eq!(c.url("/health"), "http://localhost:8080/health");

    let err = MuseumClient::new("  ").unwrap_err();
    assert!(matches!(err, MuseumError::Configuration(_)));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let c = MuseumClient::with_timeouts(
        &format!("http://127.0.0.1:{port}"),
        Duration::from_secs(2),
        Duration::from_secs(1),
    )
    .unwrap();
    let err = c.health().await.unwrap_err();
    assert!(matches!(err, MuseumError::Transport(_)), "{err:?}");
    assert!(err.is_user_facing());
}

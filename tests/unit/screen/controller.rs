use std::{
    collections::HashMap,
    io::Cursor,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;
use crate::{
    compose::source::ImageLoader,
    service::types::{
        ArtworkSearchQuery, ArtworkSearchResponse, HealthStatus, MetObject, UpdateTitleResponse,
    },
};

struct MapLoader(HashMap<String, Vec<u8>>);

#[async_trait::async_trait]
impl ImageLoader for MapLoader {
    async fn load(&self, source: &str) -> MuseumResult<Vec<u8>> {
        self.0
            .get(source)
            .cloned()
            .ok_or_else(|| MuseumError::image_load(format!("no such image {source}")))
    }
}

#[derive(Default)]
struct RecordingService {
    fail_title: bool,
    titles: Mutex<Vec<(u64, String)>>,
    created: Mutex<Vec<CreateMuseumRequest>>,
}

#[async_trait::async_trait]
impl MuseumService for RecordingService {
    async fn fetch_public_museums(&self, _: u64, _: Option<u32>) -> MuseumResult<Vec<Museum>> {
        Ok(Vec::new())
    }

    async fn fetch_museum(&self, id: u64) -> MuseumResult<Museum> {
        Err(MuseumError::http(404, format!("museum {id} not found")))
    }

    async fn create_museum(&self, req: &CreateMuseumRequest) -> MuseumResult<Museum> {
        self.created.lock().unwrap().push(req.clone());
        Ok(Museum {
            id: 77,
            user_id: req.user_id,
            name: req.name.clone(),
            description: req.description.clone(),
            visibility: req.visibility.unwrap_or(Visibility::Private),
            image_url: req.image_url.clone(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        })
    }

    async fn update_museum_title(&self, id: u64, title: &str) -> MuseumResult<UpdateTitleResponse> {
        if self.fail_title {
            return Err(MuseumError::http(500, "title store down"));
        }
        self.titles.lock().unwrap().push((id, title.to_string()));
        Ok(UpdateTitleResponse {
            message: "updated".to_string(),
        })
    }

    async fn search_artworks(&self, _: &ArtworkSearchQuery) -> MuseumResult<ArtworkSearchResponse> {
        Err(MuseumError::http(503, "search down"))
    }

    async fn fetch_met_object(&self, _: u64) -> MuseumResult<MetObject> {
        Err(MuseumError::http(503, "search down"))
    }

    async fn health(&self) -> MuseumResult<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }
}

fn png(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn controller() -> ScreenController {
    let mut images = HashMap::new();
    images.insert("bg1.png".to_string(), png([200, 200, 200, 255]));
    images.insert("bg2.png".to_string(), png([20, 20, 20, 255]));
    for id in 1..=3u64 {
        images.insert(format!("art{id}.png"), png([255, 0, 0, 255]));
    }
    let compositor = Arc::new(Compositor::new(Arc::new(MapLoader(images))));
    let artworks = ArtworkCatalog::new(
        (1..=3)
            .map(|id| ArtworkRef::new(id, format!("art{id}.png"), format!("Art {id}")))
            .collect(),
    )
    .unwrap();
    let backgrounds = BackgroundCatalog::new(vec![
        BackgroundRef::new(1, "bg1.png", "one"),
        BackgroundRef::new(2, "bg2.png", "two"),
    ])
    .unwrap();
    ScreenController::new(
        SlotTable::standard().unwrap(),
        CanvasSize::new(100, 100).unwrap(),
        artworks,
        backgrounds,
        compositor,
    )
    .unwrap()
}

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "virtual_museum_screen_{tag}_{}_{}",
        std::process::id(),
        nanos
    ))
}

#[test]
fn opens_with_sidebars_and_first_background() {
    let mut c = controller();
    assert!(c.left_sidebar_open() && c.right_sidebar_open());
    assert_eq!(c.state().background().id, 1);
    assert_eq!(c.title(), "");
    assert!(!c.toggle_left_sidebar());
    assert!(c.toggle_left_sidebar());
    assert!(!c.toggle_right_sidebar());
}

#[test]
fn unknown_catalog_ids_are_validation_errors() {
    let mut c = controller();
    assert!(matches!(c.select_artwork(42), Err(MuseumError::Validation(_))));
    assert!(matches!(c.change_background(9), Err(MuseumError::Validation(_))));
    assert!(c.state().selection().is_none());
}

#[test]
fn click_at_hits_slot_geometry() {
    let mut c = controller();
    c.select_artwork(2).unwrap();
    // Slot B spans x 38..56, y 49..75 on a 100x100 canvas.
    let out = c.click_at(Point::new(45.0, 60.0)).unwrap();
    assert!(matches!(out, Some(SlotActivation::Placed { .. })));
    let b = c.table().id_of("B").unwrap();
    assert_eq!(c.state().occupant(b).map(|a| a.id), Some(2));

    assert!(c.click_at(Point::new(1.0, 1.0)).unwrap().is_none());
    let out = c.click_at(Point::new(45.0, 60.0)).unwrap();
    assert!(matches!(out, Some(SlotActivation::Cleared { .. })));
}

#[tokio::test]
async fn title_commits_locally_before_save() {
    let mut c = controller();
    let svc = RecordingService::default();
    c.begin_title_edit();
    c.set_title_draft("Quiet Hall");
    c.commit_title(&svc).await.unwrap();
    assert_eq!(c.title(), "Quiet Hall");
    assert!(svc.titles.lock().unwrap().is_empty());
}

#[tokio::test]
async fn save_exports_then_creates_public_museum() {
    let mut c = controller();
    let svc = RecordingService::default();
    let dir = temp_dir("save");

    c.set_title_draft("   ");
    let err = c.save(&svc, 5, &dir).await.unwrap_err();
    assert!(matches!(err, MuseumError::Validation(_)));

    c.set_title_draft("My Room");
    c.select_artwork(1).unwrap();
    c.click_slot(c.table().id_of("A").unwrap()).unwrap();
    let saved = c.save(&svc, 5, &dir).await.unwrap();

    assert_eq!(saved.export_path, dir.join("museum.png"));
    assert!(saved.export_path.exists());
    assert_eq!(c.museum_id(), Some(77));
    let created = svc.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "My Room");
    assert_eq!(created[0].visibility, Some(Visibility::Public));
    assert_eq!(created[0].user_id, 5);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn saved_title_goes_through_service() {
    let mut c = controller();
    let svc = RecordingService::default();
    c.attach_museum(&svc.create_museum(&CreateMuseumRequest::new(1, "Old")).await.unwrap());

    c.begin_title_edit();
    c.set_title_draft("New");
    c.commit_title(&svc).await.unwrap();
    assert_eq!(c.title(), "New");
    assert_eq!(svc.titles.lock().unwrap().as_slice(), &[(77, "New".to_string())]);
}

#[tokio::test]
async fn failed_title_update_reverts() {
    let mut c = controller();
    let svc = RecordingService {
        fail_title: true,
        ..RecordingService::default()
    };
    c.attach_museum(&svc.create_museum(&CreateMuseumRequest::new(1, "Old")).await.unwrap());

    c.set_title_draft("New");
    let err = c.commit_title(&svc).await.unwrap_err();
    assert!(err.is_user_facing());
    assert_eq!(c.title(), "Old");

    c.set_title_draft("");
    assert!(matches!(
        c.commit_title(&svc).await,
        Err(MuseumError::Validation(_))
    ));
    assert_eq!(c.title(), "Old");
}

#[tokio::test]
async fn preview_follows_background_change() {
    let mut c = controller();
    let first = c.preview().await.unwrap();
    c.change_background(2).unwrap();
    let second = c.preview().await.unwrap();
    let (a, b) = (first.published().unwrap(), second.published().unwrap());
    assert_ne!(a.fingerprint(), b.fingerprint());
    assert_eq!(&b.rgba8_premul[0..4], &[20, 20, 20, 255]);
}

#[test]
fn reset_keeps_saved_link_but_empties_room() {
    let mut c = controller();
    c.select_artwork(3).unwrap();
    c.click_slot(c.table().id_of("C").unwrap()).unwrap();
    c.begin_title_edit();
    c.reset();
    assert_eq!(c.state().occupied_count(), 0);
    assert!(!c.is_editing_title());
}

#[tokio::test]
async fn saving_again_updates_instead_of_creating() {
    let mut c = controller();
    let svc = RecordingService::default();
    let dir = temp_dir("resave");

    c.set_title_draft("First");
    let first = c.save(&svc, 5, &dir).await.unwrap();
    assert_eq!(first.museum.id, 77);

    let again = c.save(&svc, 5, &dir).await.unwrap();
    assert_eq!(again.museum.id, 77);
    assert!(svc.titles.lock().unwrap().is_empty());

    c.set_title_draft("Second");
    let renamed = c.save(&svc, 5, &dir).await.unwrap();
    assert_eq!(renamed.museum.name, "Second");
    assert_eq!(c.museum_id(), Some(77));
    assert_eq!(svc.created.lock().unwrap().len(), 1);
    assert_eq!(
        svc.titles.lock().unwrap().as_slice(),
        &[(77, "Second".to_string())]
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn blank_title_is_rejected_before_save_too() {
    let mut c = controller();
    let svc = RecordingService::default();
    c.set_title_draft("Kept");
    c.commit_title(&svc).await.unwrap();

    c.begin_title_edit();
    c.set_title_draft("   ");
    let err = c.commit_title(&svc).await.unwrap_err();
    assert!(matches!(err, MuseumError::Validation(_)));
    assert_eq!(c.title(), "Kept");
    assert!(!c.is_editing_title());
}

#[tokio::test]
async fn preview_is_reused_until_room_changes() {
    let mut c = controller();
    let first = c.preview().await.unwrap();
    let again = c.preview().await.unwrap();
    let (a, b) = (first.published().unwrap(), again.published().unwrap());
    assert!(Arc::ptr_eq(a, b));
    assert_eq!(c.compositor().latest_token(), 1);

    c.select_artwork(1).unwrap();
    c.click_slot(c.table().id_of("A").unwrap()).unwrap();
    let placed = c.preview().await.unwrap();
    assert_eq!(placed.published().unwrap().token, 2);
    assert_eq!(c.compositor().latest_token(), 2);
}

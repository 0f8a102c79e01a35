use super::*;

fn met(id: u64, small: Option<&str>, large: Option<&str>, title: Option<&str>) -> MetObject {
    let mut v = serde_json::json!({ "objectID": id });
    if let Some(s) = small {
        v["primaryImageSmall"] = serde_json::json!(s);
    }
    if let Some(s) = large {
        v["primaryImage"] = serde_json::json!(s);
    }
    if let Some(t) = title {
        v["title"] = serde_json::json!(t);
    }
    serde_json::from_value(v).unwrap()
}

#[test]
fn builtin_catalog_has_ten_unique_artworks() {
    let c = ArtworkCatalog::builtin();
    assert_eq!(c.len(), 10);
    c.validate().unwrap();
    assert_eq!(c.get(1).unwrap().image_source, c.get(3).unwrap().image_source);
    assert!(c.get(4).unwrap().image_source.ends_with("DP821128.jpg"));
    assert!(c.get(10).unwrap().image_source.ends_with("DP821134.jpg"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = ArtworkCatalog::new(vec![
        ArtworkRef::new(1, "a.png", "a"),
        ArtworkRef::new(1, "b.png", "b"),
    ])
    .unwrap_err();
    assert!(matches!(err, MuseumError::Validation(_)));
}

#[test]
fn require_unknown_id_is_validation_error() {
    let c = ArtworkCatalog::builtin();
    assert!(c.require(5).is_ok());
    assert!(matches!(c.require(99), Err(MuseumError::Validation(_))));
}

#[test]
fn met_objects_prefer_small_image_and_skip_imageless() {
    let objects = vec![
        met(10, Some("small.jpg"), Some("large.jpg"), Some("Wheat Field")),
        met(11, Some(""), Some("large-only.jpg"), None),
        met(12, None, None, Some("No image")),
        met(10, Some("dup.jpg"), None, None),
    ];
    let c = ArtworkCatalog::from_met_objects(&objects);
    assert_eq!(c.len(), 2);
    let first = c.get(10).unwrap();
    assert_eq!(first.image_source, "small.jpg");
    assert_eq!(first.display_name, "Wheat Field");
    let second = c.get(11).unwrap();
    assert_eq!(second.image_source, "large-only.jpg");
    assert_eq!(second.display_name, "#11");
}

#[test]
fn background_catalog_starts_on_first_entry() {
    let b = BackgroundCatalog::builtin();
    assert_eq!(b.initial().unwrap().id, 1);
    assert!(b.require(2).is_ok());
    assert!(BackgroundCatalog::new(vec![]).is_err());
}

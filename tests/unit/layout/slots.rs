use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn standard_table_resolves_right_anchored_slot() {
    let t = SlotTable::standard().unwrap();
    assert_eq!(t.len(), 3);
    let c = t.geometry_of(t.id_of("C").unwrap()).unwrap();
    assert!(approx(c.left, 1.0 - 0.29 - 0.12));
    assert!(approx(c.top, 0.52));
}

#[test]
fn pixel_rect_maps_fractions_onto_canvas() {
    let t = SlotTable::standard().unwrap();
    let canvas = CanvasSize::new(850, 550).unwrap();
    let b = t.geometry_of(t.id_of("B").unwrap()).unwrap();
    let r = b.pixel_rect(canvas);
    assert!(approx(r.x0, 0.38 * 850.0));
    assert!(approx(r.y0, 0.49 * 550.0));
    assert!(approx(r.width(), 0.18 * 850.0));
    assert!(approx(r.height(), 0.26 * 550.0));
}

#[test]
fn ids_follow_declaration_order() {
    let t = SlotTable::standard().unwrap();
    let names: Vec<_> = t.ids().map(|id| t.name_of(id).unwrap()).collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn out_of_unit_square_is_configuration_error() {
    let err = SlotTable::new(&[SlotSpec::left("X", 0.9, 0.1, 0.2, 0.2)]).unwrap_err();
    assert!(matches!(err, MuseumError::Configuration(_)));

    let err = SlotTable::new(&[SlotSpec::right("X", 0.0, 0.9, 0.2, 0.2)]).unwrap_err();
    assert!(matches!(err, MuseumError::Configuration(_)));
}

#[test]
fn invalid_specs_are_rejected() {
    assert!(SlotTable::new(&[]).is_err());
    assert!(SlotTable::new(&[SlotSpec::left("A", 0.1, 0.1, 0.0, 0.2)]).is_err());
    assert!(SlotTable::new(&[SlotSpec::left("A", f64::NAN, 0.1, 0.1, 0.2)]).is_err());
    assert!(
        SlotTable::new(&[
            SlotSpec::left("A", 0.1, 0.1, 0.1, 0.1),
            SlotSpec::left("A", 0.5, 0.1, 0.1, 0.1),
        ])
        .is_err()
    );

    let both = SlotSpec {
        name: "A".to_string(),
        left: Some(0.1),
        right: Some(0.1),
        top: 0.1,
        width: 0.1,
        height: 0.1,
    };
    assert!(SlotTable::new(&[both]).is_err());
}

#[test]
fn unknown_slot_is_configuration_error() {
    let t = SlotTable::standard().unwrap();
    assert!(matches!(
        t.geometry_of(SlotId(3)),
        Err(MuseumError::Configuration(_))
    ));
    assert!(t.id_of("Z").is_err());
    assert!(!t.contains(SlotId(3)));
}

#[test]
fn hit_test_prefers_later_slot_on_overlap() {
    let t = SlotTable::new(&[
        SlotSpec::left("under", 0.0, 0.0, 0.6, 0.6),
        SlotSpec::left("over", 0.4, 0.4, 0.6, 0.6),
    ])
    .unwrap();
    let canvas = CanvasSize::new(100, 100).unwrap();
    assert_eq!(t.hit_test(canvas, Point::new(50.0, 50.0)), Some(SlotId(1)));
    assert_eq!(t.hit_test(canvas, Point::new(10.0, 10.0)), Some(SlotId(0)));
    assert_eq!(t.hit_test(canvas, Point::new(10.0, 90.0)), None);
}

#[test]
fn spec_deserializes_with_either_anchor() {
    let s: SlotSpec = serde_json::from_str(
        r#"{ "name": "C", "right": 0.29, "top": 0.52, "width": 0.12, "height": 0.25 }"#,
    )
    .unwrap();
    assert_eq!(s.left, None);
    assert_eq!(s.right, Some(0.29));
}

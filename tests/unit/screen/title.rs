use super::*;

#[test]
fn draft_is_displayed_while_editing() {
    let mut t = TitleEditor::new("Hall");
    t.begin_edit();
    assert!(t.is_editing());
    t.set_draft("Hall of Light");
    assert_eq!(t.displayed(), "Hall of Light");
    assert_eq!(t.title(), "Hall");
}

#[test]
fn finish_edit_trims_and_reports_change() {
    let mut t = TitleEditor::new("Hall");
    t.begin_edit();
    t.set_draft("  Blue Room ");
    let change = t.finish_edit().unwrap();
    assert_eq!(
        change,
        TitleChange {
            previous: "Hall".to_string(),
            proposed: "Blue Room".to_string(),
        }
    );
    assert_eq!(t.displayed(), "Blue Room");
    assert!(!t.is_editing());
}

#[test]
fn unchanged_or_closed_edit_yields_nothing() {
    let mut t = TitleEditor::new("Hall");
    assert!(t.finish_edit().is_none());
    t.begin_edit();
    t.set_draft("Hall ");
    assert!(t.finish_edit().is_none());
}

#[test]
fn revert_restores_last_known_good() {
    let mut t = TitleEditor::new("Hall");
    t.set_draft("Rejected");
    let change = t.finish_edit().unwrap();
    t.revert(change);
    assert_eq!(t.displayed(), "Hall");
}

#[test]
fn revert_ignores_superseded_change() {
    let mut t = TitleEditor::new("A");
    t.set_draft("B");
    let first = t.finish_edit().unwrap();
    t.set_draft("C");
    t.finish_edit().unwrap();
    t.revert(first);
    assert_eq!(t.title(), "C");
}

#[test]
fn cancel_keeps_title() {
    let mut t = TitleEditor::new("Hall");
    t.begin_edit();
    t.set_draft("Other");
    t.cancel_edit();
    assert_eq!(t.displayed(), "Hall");
}

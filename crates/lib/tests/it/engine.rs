//! Contract-level tests against the in-memory engine.

use doclens::engine::memory::InMemory;
use doclens::engine::{CausalDelta, Cursor, DocumentExt, Kind, LeafKind};
use doclens::{Document, Step, path};
use uuid::Uuid;

use crate::helpers::{kitchen_sink_doc, todoapp_doc, todoapp_schema};

#[test]
fn construction_from_descriptor() {
    let descriptor = todoapp_schema().to_descriptor().unwrap();
    let doc = InMemory::new(&descriptor).unwrap();
    assert_eq!(doc.schema(), &todoapp_schema());

    let err = InMemory::new(&[0xde, 0xad]).unwrap_err();
    assert!(err.is_schema_error());
}

#[test]
fn pinned_replica_ids() {
    let replica = Uuid::from_u128(42);
    let doc = InMemory::with_replica(todoapp_schema(), replica);
    assert_eq!(doc.replica(), replica);
}

#[test]
fn cursor_classifies_positions() {
    let doc = todoapp_doc();
    let mut cursor = doc.create_cursor();
    assert_eq!(cursor.kind(), Kind::Record);

    cursor.field("tasks").unwrap();
    assert_eq!(cursor.kind(), Kind::Sequence);

    cursor.index(3).unwrap();
    assert_eq!(cursor.kind(), Kind::Record);

    cursor.field("complete").unwrap();
    assert_eq!(cursor.kind(), Kind::Leaf(LeafKind::Flag));
}

#[test]
fn cursor_clones_are_independent() {
    let doc = todoapp_doc();
    let mut cursor = doc.create_cursor();
    cursor.field("tasks").unwrap();

    let mut stepped = cursor.clone();
    stepped.index(0).unwrap();

    assert_eq!(cursor.kind(), Kind::Sequence);
    assert_eq!(stepped.kind(), Kind::Record);
}

#[test]
fn generic_step_dispatches_on_live_kind() {
    let doc = kitchen_sink_doc();

    // A named step works on maps as well as records
    let mut cursor = doc.create_cursor();
    cursor.step(&Step::Field("scores".into())).unwrap();
    assert_eq!(cursor.kind(), Kind::Map);
    cursor.step(&Step::Field("anyone".into())).unwrap();
    assert_eq!(cursor.kind(), Kind::Leaf(LeafKind::Reg(doclens::RegKind::U64)));

    // An index step at a record disagrees with the position kind
    let mut cursor = doc.create_cursor();
    let err = cursor.step(&Step::Index(0)).unwrap_err();
    assert!(err.is_traversal_error());
}

#[test]
fn join_order_cannot_change_the_outcome() {
    let doc = todoapp_doc();

    // Elementary deltas of one logical write, produced once
    let mut c1 = doc.create_cursor();
    c1.field("title").unwrap();
    let d1 = c1.reg_assign_str("Groceries").unwrap();

    let mut c2 = doc.create_cursor();
    c2.field("tasks").unwrap();
    c2.index(0).unwrap();
    c2.field("title").unwrap();
    let d2 = c2.reg_assign_str("Buy milk").unwrap();

    let mut c3 = doc.create_cursor();
    c3.field("tasks").unwrap();
    c3.index(0).unwrap();
    c3.field("complete").unwrap();
    let d3 = c3.flag_enable().unwrap();

    let forward = d1.clone().join(d2.clone()).join(d3.clone());
    let backward = d3.clone().join(d2.clone()).join(d1.clone());
    let rotated = d2.join(d3).join(d1);
    assert_eq!(forward, backward);
    assert_eq!(forward, rotated);

    // And identical applied state, whichever fold is used
    let target_a = todoapp_doc();
    target_a.apply_causal(forward).unwrap();
    let target_b = todoapp_doc();
    target_b.apply_causal(backward).unwrap();
    assert_eq!(
        target_a.lens().to_json().unwrap(),
        target_b.lens().to_json().unwrap()
    );
    assert_eq!(
        target_a.lens().get_text(path!("tasks", 0, "title")).unwrap().as_deref(),
        Some("Buy milk")
    );
}

#[test]
fn concurrent_register_assigns_keep_both_values() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    // Two assignments built from the same observed state
    let mut c1 = doc.create_cursor();
    c1.field("name").unwrap();
    let c2 = c1.clone();
    let d1 = c1.reg_assign_str("alpha").unwrap();
    let d2 = c2.reg_assign_str("beta").unwrap();

    doc.apply_causal(d1).unwrap();
    doc.apply_causal(d2).unwrap();

    // Both survive the merge; the read projection takes the first
    let all = lens.get_all(path!("name")).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(
        lens.get_text(path!("name")).unwrap().as_deref(),
        Some("alpha")
    );

    // A later assignment observes both and retires them
    lens.set(path!("name"), "final").unwrap();
    assert_eq!(lens.get_all(path!("name")).unwrap().len(), 1);
}

#[test]
fn concurrent_enable_wins_over_disable() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    lens.set(path!("done"), true).unwrap();

    // Disable and re-enable race from the same observed state
    let mut cursor = doc.create_cursor();
    cursor.field("done").unwrap();
    let disable = cursor.flag_disable().unwrap();
    let enable = cursor.flag_enable().unwrap();

    doc.apply_causal(disable).unwrap();
    doc.apply_causal(enable).unwrap();

    assert_eq!(lens.get_bool(path!("done")).unwrap(), Some(true));
}

#[test]
fn keys_enumerate_by_kind() {
    let doc = todoapp_doc();
    let lens = doc.lens();
    lens.set_json(
        path!("tasks"),
        serde_json::json!([
            {"title": "a", "complete": false},
            {"title": "b", "complete": false},
        ]),
    )
    .unwrap();

    // Records enumerate their declared fields, in order
    let mut root = doc.create_cursor();
    assert_eq!(
        root.keys(),
        vec![Step::Field("title".into()), Step::Field("tasks".into())]
    );

    // Sequences enumerate their live indices
    root.field("tasks").unwrap();
    assert_eq!(root.keys(), vec![Step::Index(0), Step::Index(1)]);

    // Leaves enumerate nothing
    let mut leaf = doc.create_cursor();
    leaf.field("title").unwrap();
    assert!(leaf.keys().is_empty());
}

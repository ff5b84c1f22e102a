//! Record field writes keep their fixed shape.

use doclens::engine::DocumentExt;
use doclens::path;
use serde_json::json;

use crate::helpers::{kitchen_sink_doc, todoapp_doc};

#[test]
fn field_write_leaves_siblings_untouched() {
    let doc = todoapp_doc();
    let lens = doc.lens();

    lens.set(path!("title"), "Groceries").unwrap();
    lens.set_json(path!("tasks"), json!([{"title": "Buy milk", "complete": false}]))
        .unwrap();

    // Rewriting one field must not disturb the other
    lens.set(path!("title"), "Chores").unwrap();
    assert_eq!(
        lens.get_text(path!("tasks", 0, "title")).unwrap().as_deref(),
        Some("Buy milk")
    );

    lens.set_json(path!("tasks"), json!([])).unwrap();
    assert_eq!(
        lens.get_text(path!("title")).unwrap().as_deref(),
        Some("Chores")
    );
}

#[test]
fn mapping_write_touches_only_named_fields() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    lens.set(path!("name"), "kept").unwrap();

    // A record-shaped write has no removal phase
    lens.set_json(path!(), json!({"count": 2, "offset": -4}))
        .unwrap();

    assert_eq!(lens.get_u64(path!("count")).unwrap(), Some(2));
    assert_eq!(lens.get_i64(path!("offset")).unwrap(), Some(-4));
    assert_eq!(lens.get_text(path!("name")).unwrap().as_deref(), Some("kept"));
}

#[test]
fn nested_record_write_through_sequence() {
    let doc = todoapp_doc();
    let lens = doc.lens();

    lens.set_json(path!("tasks"), json!([{"title": "a", "complete": true}]))
        .unwrap();
    lens.set_json(path!("tasks", 0), json!({"complete": false}))
        .unwrap();

    // Sibling field within the element survives the partial write
    assert_eq!(
        lens.get_text(path!("tasks", 0, "title")).unwrap().as_deref(),
        Some("a")
    );
    assert_eq!(lens.get_bool(path!("tasks", 0, "complete")).unwrap(), Some(false));
}

#[test]
fn unknown_field_aborts_without_applying() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    lens.set(path!("name"), "before").unwrap();

    let err = lens
        .set_json(path!(), json!({"name": "after", "bogus": 1}))
        .unwrap_err();
    assert!(err.is_traversal_error());

    // The failed write applied nothing, even for the valid part
    assert_eq!(
        lens.get_text(path!("name")).unwrap().as_deref(),
        Some("before")
    );
}

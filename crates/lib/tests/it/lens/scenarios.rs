//! End-to-end todo-list scenarios.

use doclens::engine::DocumentExt;
use doclens::{View, path};
use serde_json::json;

use crate::helpers::{todoapp_doc, todoapp_schema};

#[test]
fn todoapp_walkthrough() {
    let doc = todoapp_doc();
    let lens = doc.lens();

    lens.set(path!("title"), "Groceries").unwrap();
    assert_eq!(
        lens.get_text(path!("title")).unwrap().as_deref(),
        Some("Groceries")
    );

    lens.set_json(
        path!("tasks"),
        json!([{"title": "Buy milk", "complete": false}]),
    )
    .unwrap();
    assert_eq!(
        lens.get_text(path!("tasks", 0, "title")).unwrap().as_deref(),
        Some("Buy milk")
    );
    assert_eq!(
        lens.get_bool(path!("tasks", 0, "complete")).unwrap(),
        Some(false)
    );

    lens.set(path!("tasks", 0, "complete"), true).unwrap();
    assert_eq!(
        lens.get_bool(path!("tasks", 0, "complete")).unwrap(),
        Some(true)
    );

    // Clearing the list removes every prior entry
    lens.set_json(path!("tasks"), json!([])).unwrap();
    let tasks = lens.get(path!("tasks")).unwrap().nested().unwrap();
    assert!(tasks.keys().is_empty());
    assert!(lens.get(path!("tasks", 0, "title")).unwrap().is_absent());
}

#[test]
fn nested_handles_are_independent() {
    let doc = todoapp_doc();
    let lens = doc.lens();

    lens.set_json(
        path!("tasks"),
        json!([
            {"title": "a", "complete": false},
            {"title": "b", "complete": true},
        ]),
    )
    .unwrap();

    let View::Nested(tasks) = lens.get(path!("tasks")).unwrap() else {
        panic!("tasks is a container");
    };
    let View::Nested(first) = tasks.get(path!(0)).unwrap() else {
        panic!("element is a container");
    };

    // Reads through the nested handle are relative to its position
    assert_eq!(first.get_text(path!("title")).unwrap().as_deref(), Some("a"));

    // Stepping one handle never disturbs another
    assert_eq!(tasks.keys().len(), 2);
    assert_eq!(
        lens.get_text(path!("tasks", 1, "title")).unwrap().as_deref(),
        Some("b")
    );
}

#[test]
fn json_snapshot_reflects_document() {
    let doc = todoapp_doc();
    let lens = doc.lens();

    lens.set(path!("title"), "Groceries").unwrap();
    lens.set_json(
        path!("tasks"),
        json!([{"title": "Buy milk", "complete": true}]),
    )
    .unwrap();

    assert_eq!(
        lens.to_json().unwrap(),
        json!({
            "title": "Groceries",
            "tasks": [{"title": "Buy milk", "complete": true}],
        })
    );
}

#[test]
fn whole_document_write_from_descriptor() {
    // The full construction path: descriptor bytes in, lens out
    let descriptor = todoapp_schema().to_descriptor().unwrap();
    let doc = doclens::engine::memory::InMemory::new(&descriptor).unwrap();
    let lens = doc.lens();

    lens.set_json(
        path!(),
        json!({
            "title": "Groceries",
            "tasks": [
                {"title": "Buy milk", "complete": false},
                {"title": "Buy eggs", "complete": true},
            ],
        }),
    )
    .unwrap();

    assert_eq!(
        lens.get_text(path!("tasks", 1, "title")).unwrap().as_deref(),
        Some("Buy eggs")
    );
    assert_eq!(lens.get_bool(path!("tasks", 1, "complete")).unwrap(), Some(true));
}

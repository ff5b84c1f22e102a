//! Whole-sequence replacement semantics.

use doclens::engine::DocumentExt;
use doclens::engine::memory::InMemory;
use doclens::{Lens, path};

use crate::helpers::kitchen_sink_doc;

/// Enumerates the notes sequence in order, the way a caller would.
fn notes(lens: &Lens<'_, InMemory>) -> Vec<String> {
    let nested = lens.get(path!("notes")).unwrap().nested().unwrap();
    nested
        .keys()
        .into_iter()
        .map(|step| {
            lens.get_text(path!("notes", step.index().unwrap()))
                .unwrap()
                .unwrap()
        })
        .collect()
}

#[test]
fn replace_from_empty() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    assert!(lens.set(path!("notes"), vec!["a", "b", "c"]).unwrap());
    assert_eq!(notes(&lens), ["a", "b", "c"]);
}

#[test]
fn replace_with_longer_sequence() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    lens.set(path!("notes"), vec!["a"]).unwrap();
    lens.set(path!("notes"), vec!["x", "y", "z"]).unwrap();
    assert_eq!(notes(&lens), ["x", "y", "z"]);
}

#[test]
fn replace_with_shorter_sequence() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    lens.set(path!("notes"), vec!["a", "b", "c"]).unwrap();
    lens.set(path!("notes"), vec!["only"]).unwrap();

    assert_eq!(notes(&lens), ["only"]);
    // Nothing lingers past the new length
    assert!(lens.get(path!("notes", 1)).unwrap().is_absent());
    assert_eq!(lens.keys().len(), 8);

    let nested = lens.get(path!("notes")).unwrap().nested().unwrap();
    assert_eq!(nested.keys().len(), 1);
}

#[test]
fn clear_removes_all_entries() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    lens.set(path!("notes"), vec!["a", "b"]).unwrap();
    assert!(lens.set(path!("notes"), Vec::<String>::new()).unwrap());

    let nested = lens.get(path!("notes")).unwrap().nested().unwrap();
    assert!(nested.keys().is_empty());
    assert!(lens.get(path!("notes", 0)).unwrap().is_absent());
}

#[test]
fn clearing_an_empty_sequence_is_a_no_op() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    // No removals, no inserts: nothing to apply
    assert!(!lens.set(path!("notes"), Vec::<String>::new()).unwrap());
}

#[test]
fn element_writes_by_index() {
    let doc = kitchen_sink_doc();
    let lens = doc.lens();

    lens.set(path!("notes"), vec!["a", "b"]).unwrap();
    lens.set(path!("notes", 1), "B").unwrap();
    assert_eq!(notes(&lens), ["a", "B"]);
}

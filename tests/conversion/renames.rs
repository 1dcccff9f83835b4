//! Referential integrity across renames, moves and deletes

use crate::common::*;

#[test]
fn stored_content_follows_a_rename() {
    let site = Site::new();
    let content = Value::mapping([
        ("body", Value::from("Start at /site/articles/hello-world")),
        ("nav", Value::Array(vec![Value::from("/site/articles")])),
    ]);
    let stored = site.store(content);

    let moved = site
        .index
        .relocate(&loc("/site/articles"), loc("/site/blog"))
        .unwrap();
    assert_eq!(moved, 2);

    let shown = site.converter.to_location(stored).unwrap();
    assert!(shown.is_clean());
    assert_eq!(
        shown.value,
        Value::mapping([
            ("body", Value::from("Start at /site/blog/hello-world")),
            ("nav", Value::Array(vec![Value::from("/site/blog")])),
        ])
    );
}

#[test]
fn stale_locations_are_unresolved_after_a_move() {
    let site = Site::new();
    site.index
        .relocate(&loc("/site/about"), loc("/site/team"))
        .unwrap();

    let out = site
        .converter
        .to_symbolic(Value::from("old link /site/about"))
        .unwrap();
    assert_eq!(out.unresolved.len(), 1);
    assert_eq!(out.unresolved[0].original, "/site/about");
    assert_eq!(out.value, Value::from("old link /site/about"));
}

#[test]
fn deleted_items_leave_ids_in_place() {
    let site = Site::new();
    let about = site.id("/site/about");
    let stored = site.store(Value::from("/site/about and /site"));

    let removed = site.index.remove(&loc("/site/about")).unwrap();
    assert_eq!(removed, vec![about.clone()]);

    let shown = site.converter.to_location(stored).unwrap();
    assert_eq!(shown.unresolved.len(), 1);
    assert_eq!(shown.unresolved[0].original, about.as_str());
    assert_eq!(shown.unresolved[0].form, ReferenceForm::Symbolic);
    assert_eq!(shown.value, Value::from(format!("{} and /site", about)));
}

#[test]
fn retired_id_cannot_be_reassigned_within_an_epoch() {
    let site = Site::new();
    let about = site.id("/site/about");
    site.index.remove(&loc("/site/about")).unwrap();

    assert!(site
        .index
        .insert(about.clone(), loc("/site/impostor"))
        .is_err());
    site.index.begin_epoch();
    assert!(site.index.insert(about, loc("/site/impostor")).is_ok());
}

#[test]
fn concurrent_conversions_share_one_converter() {
    let site = Site::new();
    let converter = site.converter.clone();
    let expected = Value::from(site.id("/site/articles/hello-world").as_str());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let converter = converter.clone();
            let expected = expected.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let out = converter
                        .to_symbolic(Value::from("/site/articles/hello-world"))
                        .unwrap();
                    assert_eq!(out.value, expected);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

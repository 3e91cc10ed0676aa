// tests/migrate_documents.rs
use std::fs;

use serde_json::{ json, Value };

use lender_cache::config::options::DataPaths;
use lender_cache::migrate::{ self, Shape };
use lender_cache::store::{ self, Mapping };
use lender_cache::Error;

fn mapping() -> Mapping {
    let mut m = Mapping::new();
    m.insert("acme".into(), "Acme Capital".into());
    m
}

#[test]
fn current_shape_is_left_alone_but_backed_up() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    let raw = "{\n  \"acme\": [ {\"title\": \"A\", \"url\": \"a.pdf\"} ]\n}";
    fs::write(paths.documents(), raw).unwrap();

    let report = migrate::migrate_documents(&paths.documents(), &mapping()).unwrap();
    assert_eq!(report.shape, Shape::Current);
    assert!(report.persisted.is_none());
    assert_eq!(report.backup, Some(paths.backup()));
    assert_eq!(fs::read_to_string(paths.documents()).unwrap(), raw);
    assert_eq!(fs::read_to_string(paths.backup()).unwrap(), raw);
}

#[test]
fn legacy_list_is_keyed_and_backup_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    let raw = r#"[
        {"company_name": "ACME CAPITAL", "title": "A", "url": "a.pdf", "date": "2024-01-01"},
        {"company_name": "Sun Finance", "title": "S", "url": "s.pdf"},
        {"title": "orphan", "url": "o.pdf"}
    ]"#;
    fs::write(paths.documents(), raw).unwrap();

    let report = migrate::migrate_documents(&paths.documents(), &mapping()).unwrap();
    assert_eq!(report.shape, Shape::Legacy);
    assert_eq!(report.companies, 2);
    assert_eq!(report.tally.resolved, 1);
    assert_eq!(report.tally.synthesized, 1);
    assert_eq!(report.tally.dropped.len(), 1);
    assert!(report.persisted.unwrap().is_ok());

    assert_eq!(fs::read_to_string(paths.backup()).unwrap(), raw);

    let migrated: Value = store::read_json(&paths.documents()).unwrap();
    assert_eq!(
        migrated,
        json!({
            "acme": [{"company_name": "ACME CAPITAL", "title": "A", "url": "a.pdf", "date": "2024-01-01"}],
            "sun-finance": [{"company_name": "Sun Finance", "title": "S", "url": "s.pdf"}]
        })
    );

    // Second run sees the current shape
    let again = migrate::migrate_documents(&paths.documents(), &mapping()).unwrap();
    assert_eq!(again.shape, Shape::Current);
    assert_eq!(again.companies, 2);
}

#[test]
fn missing_cache_is_reported_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());

    let report = migrate::migrate_documents(&paths.documents(), &mapping()).unwrap();
    assert_eq!(report.shape, Shape::Missing);
    assert_eq!(report.backup, None);
    assert_eq!(report.companies, 0);
    assert!(report.persisted.is_none());
    assert!(!paths.backup().exists());
    assert!(!paths.documents().exists());
}

#[test]
fn blocked_backup_leaves_primary_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    let raw = r#"[{"company_name": "Acme Capital", "title": "A", "url": "a.pdf"}]"#;
    fs::write(paths.documents(), raw).unwrap();
    fs::create_dir(paths.backup()).unwrap();

    let err = migrate::migrate_documents(&paths.documents(), &mapping()).unwrap_err();
    assert!(matches!(err, Error::Persistence { .. }), "got {err:?}");
    assert_eq!(fs::read(paths.documents()).unwrap(), raw.as_bytes());
    assert!(paths.backup().is_dir());
}

#[test]
fn malformed_cache_is_backed_up_and_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    fs::write(paths.documents(), "[{\"title\": ").unwrap();

    let report = migrate::migrate_documents(&paths.documents(), &mapping()).unwrap();
    assert_eq!(report.shape, Shape::Unrecognized);
    assert_eq!(fs::read_to_string(paths.documents()).unwrap(), "[{\"title\": ");
    assert_eq!(fs::read_to_string(paths.backup()).unwrap(), "[{\"title\": ");
}

#[test]
fn load_current_refuses_legacy_lists() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());

    assert!(migrate::load_current(&paths.documents()).unwrap().is_empty());

    fs::write(paths.documents(), "[]").unwrap();
    let err = migrate::load_current(&paths.documents()).unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape { .. }));
}

#[test]
fn load_current_carries_entries_as_they_are() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    fs::write(
        paths.documents(),
        r#"{"acme": [{"url": "a.pdf", "pages": 3}, "see annual report", null], "beta": []}"#,
    )
    .unwrap();

    let docs = migrate::load_current(&paths.documents()).unwrap();
    assert_eq!(docs["acme"], vec![json!({"url": "a.pdf", "pages": 3}), json!("see annual report"), Value::Null]);
    assert!(docs["beta"].is_empty());

    store::write_json(&paths.documents(), &docs).unwrap();
    let back: Value = store::read_json(&paths.documents()).unwrap();
    assert_eq!(back["acme"][1], json!("see annual report"));
    assert_eq!(back["acme"][0]["pages"], json!(3));
}

#[test]
fn load_current_refuses_non_list_company_entries() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    let raw = r#"{"acme": [{"url": "a.pdf"}], "beta": {"url": "b.pdf"}}"#;
    fs::write(paths.documents(), raw).unwrap();

    let err = migrate::load_current(&paths.documents()).unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape { found: "non-list company entry", .. }));
    assert_eq!(fs::read_to_string(paths.documents()).unwrap(), raw);
}

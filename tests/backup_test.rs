use chrono::{Local, TimeZone, Utc};
use evento_admin::modules::events::model::{EventRecord, FieldValue, Fields, Mutation, Timestamp};
use evento_admin::services::backup::{
    backup_file_name, build_backup, load_backup, restore_mutations, verify_backup, write_backup,
    BACKUP_PREFIX,
};
use evento_admin::MaintenanceError;
use std::fs;
use tempfile::tempdir;

fn record(id: &str, name: &str, seconds: i64) -> EventRecord {
    let mut data = Fields::new();
    data.insert("name".to_string(), name.into());
    data.insert("when".to_string(), Timestamp::new(seconds, 0).into());
    EventRecord::new(id, data)
}

fn three_records() -> Vec<EventRecord> {
    vec![record("a", "X", 100), record("b", "Y", 200), record("c", "Z", 300)]
}

#[test]
fn test_backup_file_name_format() {
    let now = Local.with_ymd_and_hms(2024, 1, 15, 14, 30, 45).unwrap();

    assert_eq!(backup_file_name(&now), "eventos_backup_2024-01-15_14-30-45.json");
}

#[test]
fn test_build_backup_metadata() {
    let date = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

    let backup = build_backup(&three_records(), "evento", "onde-it-com", date);

    assert_eq!(backup.metadata.collection, "evento");
    assert_eq!(backup.metadata.total_documents, 3);
    assert_eq!(backup.metadata.firebase_project, "onde-it-com");
    assert_eq!(backup.metadata.backup_date, "2024-01-15T12:00:00.000Z");
    assert_eq!(backup.events.len(), 3);
    assert_eq!(
        backup.events[0].data["when"],
        serde_json::json!({
            "_timestamp": true,
            "_seconds": 100,
            "_nanoseconds": 0,
            "_dateString": "1970-01-01T00:01:40.000Z"
        })
    );
}

#[test]
fn test_write_backup_creates_directory_and_file() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("nested").join("backups");

    let path = write_backup(&three_records(), "evento", "onde-it-com", &dir)
        .unwrap()
        .expect("backup path");

    assert!(path.starts_with(&dir));
    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with(BACKUP_PREFIX));
    assert!(file_name.ends_with(".json"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["totalDocuments"], 3);
    assert_eq!(json["metadata"]["firebaseProject"], "onde-it-com");
    assert_eq!(json["events"].as_array().unwrap().len(), 3);
    assert_eq!(json["events"][0]["id"], "a");

    // only the backup itself, no leftover temp files
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn test_write_backup_with_no_records_writes_nothing() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("backups");

    let result = write_backup(&[], "evento", "onde-it-com", &dir).unwrap();

    assert!(result.is_none());
    assert!(!dir.exists());
}

#[test]
fn test_verify_accepts_written_backup() {
    let tmp = tempdir().unwrap();

    let path = write_backup(&three_records(), "evento", "p", tmp.path())
        .unwrap()
        .unwrap();

    assert!(verify_backup(&path));
}

#[test]
fn test_verify_rejects_missing_events() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("no_events.json");
    fs::write(&path, r#"{"metadata": {"collection": "evento"}}"#).unwrap();

    assert!(!verify_backup(&path));
}

#[test]
fn test_verify_rejects_invalid_json() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(!verify_backup(&path));
}

#[test]
fn test_verify_rejects_missing_file() {
    let tmp = tempdir().unwrap();

    assert!(!verify_backup(&tmp.path().join("absent.json")));
}

#[test]
fn test_load_missing_file() {
    let tmp = tempdir().unwrap();

    let err = load_backup(&tmp.path().join("absent.json")).unwrap_err();

    assert!(matches!(err, MaintenanceError::BackupFileMissing(_)));
}

#[test]
fn test_load_rejects_missing_metadata() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("no_metadata.json");
    fs::write(&path, r#"{"events": []}"#).unwrap();

    let err = load_backup(&path).unwrap_err();

    assert!(matches!(err, MaintenanceError::InvalidBackupStructure(_)));
}

#[test]
fn test_load_and_restore_mutations_decode_timestamps() {
    let tmp = tempdir().unwrap();
    let path = write_backup(&three_records(), "evento", "p", tmp.path())
        .unwrap()
        .unwrap();

    let backup = load_backup(&path).unwrap();
    let mutations = restore_mutations(&backup).unwrap();

    assert_eq!(mutations.len(), 3);
    match &mutations[0] {
        Mutation::Set { id, data } => {
            assert_eq!(id, "a");
            assert_eq!(data["when"], FieldValue::Timestamp(Timestamp::new(100, 0)));
            assert_eq!(data["name"], FieldValue::String("X".to_string()));
        }
        other => panic!("expected set, got {:?}", other),
    }
}

#[test]
fn test_restore_mutations_reject_out_of_range_timestamp() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("corrupt.json");
    let content = serde_json::json!({
        "metadata": {
            "collection": "evento",
            "backupDate": "2024-01-01T00:00:00.000Z",
            "totalDocuments": 1,
            "firebaseProject": "p"
        },
        "events": [{
            "id": "a",
            "data": { "when": { "_timestamp": true, "_seconds": i64::MAX / 10, "_nanoseconds": 0 } }
        }]
    });
    fs::write(&path, content.to_string()).unwrap();

    let backup = load_backup(&path).unwrap();
    let err = restore_mutations(&backup).unwrap_err();

    assert!(matches!(err, MaintenanceError::InvalidBackupStructure(_)));
}

use std::fs;

use evento_admin::config::Settings;
use evento_admin::modules::events::controller::{
    backup_and_delete, backup_events, delete_all, restore_events, BackupOutcome, DeleteOutcome,
    RestoreOutcome, WorkflowOutcome,
};
use evento_admin::modules::events::model::{EventRecord, FieldValue, Fields, Timestamp};
use evento_admin::services::backup::{write_backup_file, build_backup};
use evento_admin::services::prompt::ScriptedConfirm;
use evento_admin::store::{EventStore, MemoryStore};
use evento_admin::MaintenanceError;
use tempfile::tempdir;

fn record(id: &str, name: &str, seconds: i64) -> EventRecord {
    let mut venue = Fields::new();
    venue.insert("city".to_string(), "Maputo".into());

    let mut data = Fields::new();
    data.insert("name".to_string(), name.into());
    data.insert("when".to_string(), Timestamp::new(seconds, 0).into());
    data.insert("venue".to_string(), FieldValue::Map(venue));
    EventRecord::new(id, data)
}

fn seeded_store() -> MemoryStore {
    MemoryStore::with_records(
        "evento",
        vec![record("a", "X", 100), record("b", "Y", 200), record("c", "Z", 300)],
    )
}

#[tokio::test]
async fn test_backup_events_creates_verified_file() {
    let tmp = tempdir().unwrap();
    let settings = Settings::local(tmp.path());
    let store = seeded_store();

    let outcome = backup_events(&store, &settings).await.unwrap();

    match outcome {
        BackupOutcome::Created { path, documents } => {
            assert_eq!(documents, 3);
            assert!(path.exists());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_empty_collection_stops_before_prompt() {
    let tmp = tempdir().unwrap();
    let settings = Settings::local(tmp.path().join("backups"));
    let store = MemoryStore::new("evento");
    let mut confirm = ScriptedConfirm::new(["SIM"]);

    let outcome = backup_and_delete(&store, &settings, &mut confirm, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, WorkflowOutcome::NoDocuments);
    assert_eq!(confirm.times_asked(), 0);
    assert!(!settings.backup_dir.exists());
}

#[tokio::test]
async fn test_full_workflow_deletes_after_confirmation() {
    let tmp = tempdir().unwrap();
    let settings = Settings::local(tmp.path());
    let store = seeded_store();
    let mut confirm = ScriptedConfirm::new(["SIM\n"]);

    let outcome = backup_and_delete(&store, &settings, &mut confirm, |_| {})
        .await
        .unwrap();

    let WorkflowOutcome::Completed { backup, deleted } = outcome else {
        panic!("unexpected outcome {:?}", outcome);
    };
    assert_eq!(deleted, 3);
    assert!(store.is_empty());
    assert!(backup.exists());
    assert_eq!(confirm.times_asked(), 1);
    assert!(confirm.prompts[0].contains('3'));
}

#[tokio::test]
async fn test_anything_but_exact_token_cancels() {
    for answer in ["sim", "Sim", "yes", "", " SIM", "SIM!"] {
        let tmp = tempdir().unwrap();
        let settings = Settings::local(tmp.path());
        let store = seeded_store();
        let mut confirm = ScriptedConfirm::new([answer]);

        let outcome = backup_and_delete(&store, &settings, &mut confirm, |_| {})
            .await
            .unwrap();

        let WorkflowOutcome::Cancelled { backup } = outcome else {
            panic!("answer {:?} gave {:?}", answer, outcome);
        };
        assert!(backup.exists(), "backup kept for {:?}", answer);
        assert_eq!(store.len(), 3);
        assert!(store.commit_sizes().is_empty());
    }
}

#[tokio::test]
async fn test_delete_ids_come_from_snapshot() {
    let tmp = tempdir().unwrap();
    let settings = Settings::local(tmp.path());
    let store = seeded_store();
    let mut confirm = ScriptedConfirm::new(["SIM"]);

    backup_and_delete(&store, &settings, &mut confirm, |_| {})
        .await
        .unwrap();

    assert_eq!(store.commit_sizes(), vec![3]);
}

#[tokio::test]
async fn test_failed_delete_keeps_backup() {
    let tmp = tempdir().unwrap();
    let settings = Settings::local(tmp.path());
    let store = seeded_store();
    store.deny_on_commit(0);
    let mut confirm = ScriptedConfirm::new(["SIM"]);

    let err = backup_and_delete(&store, &settings, &mut confirm, |_| {})
        .await
        .unwrap_err();

    assert!(err.is_permission_denied());
    assert_eq!(store.len(), 3);
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_round_trip_restores_snapshot() {
    let tmp = tempdir().unwrap();
    let settings = Settings::local(tmp.path());
    let store = seeded_store();
    let before = store.fetch_all().await.unwrap();

    let outcome = backup_and_delete(&store, &settings, &mut ScriptedConfirm::new(["SIM"]), |_| {})
        .await
        .unwrap();
    let WorkflowOutcome::Completed { backup, .. } = outcome else {
        panic!("unexpected outcome {:?}", outcome);
    };
    assert!(store.is_empty());

    let restored = restore_events(&store, &backup, &mut ScriptedConfirm::new(["SIM"]), |_| {})
        .await
        .unwrap();

    match restored {
        RestoreOutcome::Restored { metadata, restored } => {
            assert_eq!(restored, 3);
            assert_eq!(metadata.total_documents, 3);
            assert_eq!(metadata.collection, "evento");
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let after = store.fetch_all().await.unwrap();
    assert_eq!(after, before);
    assert_eq!(
        after[0].field("when"),
        Some(&FieldValue::Timestamp(Timestamp::new(100, 0)))
    );
}

#[tokio::test]
async fn test_restore_overwrites_existing_documents() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("backup.json");
    let backup = build_backup(&[record("a", "X", 100)], "evento", "p", chrono::Utc::now());
    write_backup_file(&backup, &path).unwrap();

    let mut changed = record("a", "changed", 999).data;
    changed.insert("added".to_string(), true.into());
    let store = MemoryStore::with_records("evento", vec![EventRecord::new("a", changed)]);

    restore_events(&store, &path, &mut ScriptedConfirm::new(["SIM"]), |_| {})
        .await
        .unwrap();

    assert_eq!(store.get("a"), Some(record("a", "X", 100).data));
}

#[tokio::test]
async fn test_restore_cancelled_writes_nothing() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("backup.json");
    let backup = build_backup(&[record("a", "X", 100)], "evento", "p", chrono::Utc::now());
    write_backup_file(&backup, &path).unwrap();
    let store = MemoryStore::new("evento");

    let outcome = restore_events(&store, &path, &mut ScriptedConfirm::new(["nao"]), |_| {})
        .await
        .unwrap();

    assert!(matches!(outcome, RestoreOutcome::Cancelled { .. }));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_restore_missing_file_never_prompts() {
    let tmp = tempdir().unwrap();
    let store = MemoryStore::new("evento");
    let mut confirm = ScriptedConfirm::new(["SIM"]);

    let err = restore_events(&store, &tmp.path().join("nope.json"), &mut confirm, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, MaintenanceError::BackupFileMissing(_)));
    assert_eq!(confirm.times_asked(), 0);
}

#[tokio::test]
async fn test_restore_invalid_structure() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, r#"{"metadata": {}}"#).unwrap();
    let store = MemoryStore::new("evento");

    let err = restore_events(&store, &path, &mut ScriptedConfirm::new(["SIM"]), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, MaintenanceError::InvalidBackupStructure(_)));
}

#[tokio::test]
async fn test_restore_out_of_range_timestamp_writes_nothing() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("far_future.json");
    let content = serde_json::json!({
        "metadata": {
            "collection": "evento",
            "backupDate": "2024-01-01T00:00:00.000Z",
            "totalDocuments": 2,
            "firebaseProject": "p"
        },
        "events": [
            { "id": "ok", "data": { "name": "fine" } },
            { "id": "bad", "data": { "when": { "_timestamp": true, "_seconds": i64::MAX / 10, "_nanoseconds": 0 } } }
        ]
    });
    fs::write(&path, content.to_string()).unwrap();
    let store = MemoryStore::new("evento");
    let mut confirm = ScriptedConfirm::new(["SIM"]);

    let err = restore_events(&store, &path, &mut confirm, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, MaintenanceError::InvalidBackupStructure(_)));
    assert_eq!(confirm.times_asked(), 0);
    assert!(store.is_empty());
    assert!(store.commit_sizes().is_empty());
}

#[tokio::test]
async fn test_delete_all_without_backup() {
    let store = seeded_store();
    let mut confirm = ScriptedConfirm::new(["SIM"]);

    let outcome = delete_all(&store, &mut confirm, |_| {}).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted(3));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_delete_all_cancelled_and_empty() {
    let store = seeded_store();
    let outcome = delete_all(&store, &mut ScriptedConfirm::new(["no"]), |_| {})
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(store.len(), 3);

    let empty = MemoryStore::new("evento");
    let mut confirm = ScriptedConfirm::new(["SIM"]);
    let outcome = delete_all(&empty, &mut confirm, |_| {}).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::NoDocuments);
    assert_eq!(confirm.times_asked(), 0);
}

#[tokio::test]
async fn test_update_fields_merges_into_existing_document() {
    let store = seeded_store();
    let mut fields = Fields::new();
    fields.insert("locationName".to_string(), "Maputo".into());

    assert!(store.update_fields("a", fields.clone()).await.unwrap());
    assert!(!store.update_fields("missing", fields).await.unwrap());

    let updated = store.get("a").unwrap();
    assert_eq!(updated["locationName"], FieldValue::String("Maputo".to_string()));
    assert_eq!(updated["name"], FieldValue::String("X".to_string()));
    assert_eq!(store.len(), 3);
}

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde_json::Value;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{MaintenanceError, Result};
use crate::modules::events::model::{EventRecord, Mutation};
use crate::modules::events::schema::{BackupEntry, BackupFile, BackupMetadata};
use crate::services::codec;
use crate::store::EventStore;

pub const BACKUP_PREFIX: &str = "eventos_backup_";

/// Reads the whole collection. `None` means the collection was empty.
pub async fn read_snapshot<S: EventStore>(store: &S) -> Result<Option<Vec<EventRecord>>> {
    let records = store.fetch_all().await?;

    if records.is_empty() {
        info!(collection = store.collection_name(), "collection is empty");
        return Ok(None);
    }

    info!(collection = store.collection_name(), count = records.len(), "snapshot read");
    Ok(Some(records))
}

pub fn build_backup(
    records: &[EventRecord],
    collection: &str,
    project: &str,
    backup_date: DateTime<Utc>,
) -> BackupFile {
    let events: Vec<BackupEntry> = records
        .iter()
        .map(|record| BackupEntry {
            id: record.id.clone(),
            data: codec::encode_fields(&record.data),
        })
        .collect();

    BackupFile {
        metadata: BackupMetadata {
            collection: collection.to_string(),
            backup_date: backup_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_documents: events.len(),
            firebase_project: project.to_string(),
        },
        events,
    }
}

pub fn backup_file_name(now: &DateTime<Local>) -> String {
    format!("{}{}.json", BACKUP_PREFIX, now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Writes a backup of `records` into `dir`, creating it if needed.
///
/// Returns `Ok(None)` without touching the filesystem when there is nothing to back up.
pub fn write_backup(
    records: &[EventRecord],
    collection: &str,
    project: &str,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }

    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), "created backup directory");
    }

    let backup = build_backup(records, collection, project, Utc::now());
    let path = dir.join(backup_file_name(&Local::now()));
    write_backup_file(&backup, &path)?;

    let size = fs::metadata(&path)?.len();
    info!(path = %path.display(), documents = backup.metadata.total_documents, bytes = size, "backup written");

    Ok(Some(path))
}

/// Serializes into a temp file next to `path`, then moves it into place.
/// Fails if `path` already exists.
pub fn write_backup_file(backup: &BackupFile, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, backup)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(path).map_err(|e| e.error)?;

    Ok(())
}

fn check_structure(value: &Value) -> Result<()> {
    for key in ["metadata", "events"] {
        match value.get(key) {
            None | Some(Value::Null) => {
                return Err(MaintenanceError::InvalidBackupStructure(format!(
                    "missing `{}`",
                    key
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Structural check of a backup file. Never errors: any read, parse or shape problem is
/// logged and reported as `false`.
pub fn verify_backup(path: &Path) -> bool {
    let result = fs::read_to_string(path)
        .map_err(MaintenanceError::from)
        .and_then(|content| Ok(serde_json::from_str::<Value>(&content)?))
        .and_then(|value| check_structure(&value).map(|_| value));

    match result {
        Ok(value) => {
            let events = value["events"].as_array().map(Vec::len).unwrap_or(0);
            let date = value["metadata"]["backupDate"].as_str().unwrap_or("unknown");
            info!(path = %path.display(), events, backup_date = date, "backup verified");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "backup verification failed");
            false
        }
    }
}

pub fn load_backup(path: &Path) -> Result<BackupFile> {
    if !path.exists() {
        return Err(MaintenanceError::BackupFileMissing(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    check_structure(&value)?;

    let backup: BackupFile = serde_json::from_value(value)
        .map_err(|e| MaintenanceError::InvalidBackupStructure(e.to_string()))?;

    if backup.metadata.total_documents != backup.events.len() {
        warn!(
            declared = backup.metadata.total_documents,
            actual = backup.events.len(),
            "backup document count does not match metadata"
        );
    }

    Ok(backup)
}

/// One upsert per backup entry, timestamps decoded back to native values. Fails with
/// `InvalidBackupStructure` on the first entry that does not decode.
pub fn restore_mutations(backup: &BackupFile) -> Result<Vec<Mutation>> {
    backup
        .events
        .iter()
        .map(|entry| {
            Ok(Mutation::Set {
                id: entry.id.clone(),
                data: codec::decode_fields(&entry.data)?,
            })
        })
        .collect()
}

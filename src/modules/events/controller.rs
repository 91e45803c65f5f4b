use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::modules::events::model::EventRecord;
use crate::modules::events::schema::BackupMetadata;
use crate::services::backup::{self, read_snapshot, verify_backup, write_backup};
use crate::services::batch::{apply_mutations, delete_requests, BatchProgress};
use crate::services::prompt::Confirm;
use crate::store::EventStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Empty,
    Created { path: PathBuf, documents: usize },
    /// Written, but did not pass verification.
    Unverified { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Completed { backup: PathBuf, deleted: usize },
    NoDocuments,
    InvalidBackup { backup: PathBuf },
    Cancelled { backup: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    NoDocuments,
    Cancelled,
    Deleted(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Cancelled { metadata: BackupMetadata },
    Restored { metadata: BackupMetadata, restored: usize },
}

async fn snapshot_to_file<S: EventStore>(
    store: &S,
    settings: &Settings,
) -> Result<Option<(PathBuf, Vec<EventRecord>)>> {
    let Some(records) = read_snapshot(store).await? else {
        return Ok(None);
    };

    let path = write_backup(
        &records,
        store.collection_name(),
        &settings.project_id,
        &settings.backup_dir,
    )?;

    Ok(path.map(|path| (path, records)))
}

pub async fn backup_events<S: EventStore>(store: &S, settings: &Settings) -> Result<BackupOutcome> {
    let Some((path, records)) = snapshot_to_file(store, settings).await? else {
        return Ok(BackupOutcome::Empty);
    };

    if !verify_backup(&path) {
        return Ok(BackupOutcome::Unverified { path });
    }

    Ok(BackupOutcome::Created {
        path,
        documents: records.len(),
    })
}

/// Backup, verify, confirm, delete. Nothing is deleted unless the backup on disk verified and
/// the user answered with the exact affirmative token.
pub async fn backup_and_delete<S, C, F>(
    store: &S,
    settings: &Settings,
    confirm: &mut C,
    on_progress: F,
) -> Result<WorkflowOutcome>
where
    S: EventStore,
    C: Confirm,
    F: FnMut(BatchProgress),
{
    let Some((path, records)) = snapshot_to_file(store, settings).await? else {
        return Ok(WorkflowOutcome::NoDocuments);
    };

    if !verify_backup(&path) {
        warn!(path = %path.display(), "backup failed verification, nothing deleted");
        return Ok(WorkflowOutcome::InvalidBackup { backup: path });
    }

    let prompt = format!(
        "Delete ALL {} documents from '{}' now? The backup is at {} but deletion is irreversible.",
        records.len(),
        store.collection_name(),
        path.display()
    );
    if !confirm.confirm(&prompt) {
        info!(path = %path.display(), "deletion cancelled, backup kept");
        return Ok(WorkflowOutcome::Cancelled { backup: path });
    }

    let requests = delete_requests(records.iter().map(|r| r.id.as_str()));
    let deleted = apply_mutations(store, &requests, on_progress).await?;

    Ok(WorkflowOutcome::Completed {
        backup: path,
        deleted,
    })
}

/// Deletes every document after confirmation, without taking a backup first.
pub async fn delete_all<S, C, F>(store: &S, confirm: &mut C, on_progress: F) -> Result<DeleteOutcome>
where
    S: EventStore,
    C: Confirm,
    F: FnMut(BatchProgress),
{
    let Some(records) = read_snapshot(store).await? else {
        return Ok(DeleteOutcome::NoDocuments);
    };

    let prompt = format!(
        "You are about to PERMANENTLY delete {} documents from '{}'.",
        records.len(),
        store.collection_name()
    );
    if !confirm.confirm(&prompt) {
        return Ok(DeleteOutcome::Cancelled);
    }

    let requests = delete_requests(records.iter().map(|r| r.id.as_str()));
    let deleted = apply_mutations(store, &requests, on_progress).await?;

    Ok(DeleteOutcome::Deleted(deleted))
}

/// Upserts every event from the backup at `path`. Existing documents with the same id are
/// replaced, not merged.
pub async fn restore_events<S, C, F>(
    store: &S,
    path: &Path,
    confirm: &mut C,
    on_progress: F,
) -> Result<RestoreOutcome>
where
    S: EventStore,
    C: Confirm,
    F: FnMut(BatchProgress),
{
    let backup = backup::load_backup(path)?;
    info!(
        backup_date = %backup.metadata.backup_date,
        events = backup.events.len(),
        project = %backup.metadata.firebase_project,
        "backup loaded"
    );

    let requests = backup::restore_mutations(&backup)?;

    let prompt = format!(
        "Restore {} events into '{}'?",
        backup.events.len(),
        store.collection_name()
    );
    if !confirm.confirm(&prompt) {
        return Ok(RestoreOutcome::Cancelled {
            metadata: backup.metadata,
        });
    }

    let restored = apply_mutations(store, &requests, on_progress).await?;

    Ok(RestoreOutcome::Restored {
        metadata: backup.metadata,
        restored,
    })
}

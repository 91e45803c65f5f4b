use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{MaintenanceError, Result};
use crate::modules::events::model::{EventRecord, Fields, Mutation};
use crate::store::EventStore;

#[derive(Debug, Default)]
struct Inner {
    documents: BTreeMap<String, Fields>,
    commits: Vec<usize>,
    fail_on_commit: Option<(usize, FailureKind)>,
}

#[derive(Debug, Clone, Copy)]
enum FailureKind {
    PermissionDenied,
    Transport,
}

/// In-process collection used by tests and dry runs.
#[derive(Debug)]
pub struct MemoryStore {
    collection: String,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_records(collection: impl Into<String>, records: Vec<EventRecord>) -> Self {
        let store = Self::new(collection);
        store.lock().documents = records.into_iter().map(|r| (r.id, r.data)).collect();
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a poisoned lock only means a test panicked mid-commit
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes the commit with the given zero-based index fail with a transport error.
    pub fn fail_on_commit(&self, index: usize) {
        self.lock().fail_on_commit = Some((index, FailureKind::Transport));
    }

    /// Makes the commit with the given zero-based index fail as if access were denied.
    pub fn deny_on_commit(&self, index: usize) {
        self.lock().fail_on_commit = Some((index, FailureKind::PermissionDenied));
    }

    /// Operation count of every successful commit, in order.
    pub fn commit_sizes(&self) -> Vec<usize> {
        self.lock().commits.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Fields> {
        self.lock().documents.get(id).cloned()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.lock()
            .documents
            .iter()
            .map(|(id, data)| EventRecord::new(id.clone(), data.clone()))
            .collect()
    }
}

impl EventStore for MemoryStore {
    fn collection_name(&self) -> &str {
        &self.collection
    }

    async fn fetch_all(&self) -> Result<Vec<EventRecord>> {
        Ok(self.records())
    }

    async fn commit(&self, batch: &[Mutation]) -> Result<()> {
        let mut inner = self.lock();

        let index = inner.commits.len();
        if let Some((fail_index, kind)) = inner.fail_on_commit {
            if fail_index == index {
                return Err(match kind {
                    FailureKind::PermissionDenied => {
                        MaintenanceError::PermissionDenied("missing write permission".to_string())
                    }
                    FailureKind::Transport => {
                        MaintenanceError::Transport("connection reset".to_string())
                    }
                });
            }
        }

        for mutation in batch {
            match mutation {
                Mutation::Delete { id } => {
                    inner.documents.remove(id);
                }
                Mutation::Set { id, data } => {
                    inner.documents.insert(id.clone(), data.clone());
                }
            }
        }
        inner.commits.push(batch.len());

        Ok(())
    }

    async fn update_fields(&self, id: &str, fields: Fields) -> Result<bool> {
        let mut inner = self.lock();
        match inner.documents.get_mut(id) {
            Some(existing) => {
                existing.extend(fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

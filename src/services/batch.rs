use tracing::{error, info};

use crate::error::{MaintenanceError, Result};
use crate::modules::events::model::Mutation;
use crate::store::EventStore;

/// Most operations the backing store accepts in one atomic batch.
pub const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub committed: usize,
    pub total: usize,
}

/// Commits `mutations` in chunks of at most [`MAX_BATCH_SIZE`], one atomic commit per chunk.
///
/// The sequence as a whole is not atomic. When a chunk fails, earlier chunks stay committed and
/// the error is wrapped in [`MaintenanceError::BatchAborted`] with the count applied so far.
/// `on_progress` runs after every successful chunk.
pub async fn apply_mutations<S, F>(store: &S, mutations: &[Mutation], mut on_progress: F) -> Result<usize>
where
    S: EventStore,
    F: FnMut(BatchProgress),
{
    let total = mutations.len();
    let mut committed = 0;

    for chunk in mutations.chunks(MAX_BATCH_SIZE) {
        if let Err(e) = store.commit(chunk).await {
            error!(committed, total, error = %e, "batch commit failed");
            return Err(MaintenanceError::BatchAborted {
                applied: committed,
                total,
                source: Box::new(e),
            });
        }

        committed += chunk.len();
        info!(committed, total, collection = store.collection_name(), "batch committed");
        on_progress(BatchProgress { committed, total });
    }

    Ok(committed)
}

pub fn delete_requests<'a, I>(ids: I) -> Vec<Mutation>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .map(|id| Mutation::Delete { id: id.to_string() })
        .collect()
}

use std::future::Future;

use crate::error::Result;
use crate::modules::events::model::{EventRecord, Fields, Mutation};

pub mod memory;

pub use memory::MemoryStore;

/// A single document collection that supports full reads and atomic multi-document batches.
pub trait EventStore: Sync {
    /// Name of the collection this store reads and writes.
    fn collection_name(&self) -> &str;

    /// Every document currently in the collection, in backend order.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<EventRecord>>> + Send;

    /// Applies all mutations atomically, or none of them.
    fn commit(&self, batch: &[Mutation]) -> impl Future<Output = Result<()>> + Send;

    /// Merges `fields` into one existing document. Returns false when the id does not exist.
    fn update_fields(&self, id: &str, fields: Fields) -> impl Future<Output = Result<bool>> + Send;
}

use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Client, ClientSession, Collection};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{MaintenanceError, Result};
use crate::modules::events::model::{EventRecord, FieldValue, Fields, Mutation, Timestamp};
use crate::store::EventStore;

pub const COLLECTION_NAME: &str = "evento";

/// MongoDB-backed event collection. Batches run inside a multi-document transaction,
/// which needs a replica set or sharded deployment.
pub struct EventCrud {
    client: Client,
    collection: Collection<Document>,
}

impl EventCrud {
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        Self {
            client: client.clone(),
            collection: client.database(database).collection(collection),
        }
    }

    async fn apply(&self, session: &mut ClientSession, batch: &[Mutation]) -> Result<()> {
        let expected = batch
            .iter()
            .filter(|m| matches!(m, Mutation::Delete { .. }))
            .count();

        if expected == batch.len() {
            let ids: Vec<Bson> = batch.iter().map(|m| id_to_bson(m.id())).collect();
            let result = self
                .collection
                .delete_many(doc! { "_id": { "$in": ids } })
                .session(&mut *session)
                .await?;
            check_deleted(expected, result.deleted_count);
            return Ok(());
        }

        let mut deleted = 0;
        for mutation in batch {
            match mutation {
                Mutation::Delete { id } => {
                    let result = self
                        .collection
                        .delete_one(doc! { "_id": id_to_bson(id) })
                        .session(&mut *session)
                        .await?;
                    deleted += result.deleted_count;
                }
                Mutation::Set { id, data } => {
                    let mut replacement = fields_to_document(data)?;
                    replacement.insert("_id", id_to_bson(id));
                    self.collection
                        .replace_one(doc! { "_id": id_to_bson(id) }, replacement)
                        .upsert(true)
                        .session(&mut *session)
                        .await?;
                }
            }
        }
        check_deleted(expected, deleted);

        Ok(())
    }
}

/// Deleting an id that is already gone is a no-op, so a short count only warns.
fn check_deleted(expected: usize, deleted: u64) {
    if deleted != expected as u64 {
        warn!(expected, deleted, "deleted count does not match batch");
    }
}

impl EventStore for EventCrud {
    fn collection_name(&self) -> &str {
        self.collection.name()
    }

    async fn fetch_all(&self) -> Result<Vec<EventRecord>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        debug!(count = documents.len(), collection = self.collection.name(), "fetched documents");

        Ok(documents.into_iter().map(document_to_record).collect())
    }

    async fn commit(&self, batch: &[Mutation]) -> Result<()> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        if let Err(e) = self.apply(&mut session, batch).await {
            if let Err(abort) = session.abort_transaction().await {
                warn!(error = %abort, "transaction abort failed");
            }
            return Err(e);
        }

        session.commit_transaction().await?;
        debug!(operations = batch.len(), "committed batch");

        Ok(())
    }

    async fn update_fields(&self, id: &str, fields: Fields) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id_to_bson(id) },
                doc! { "$set": fields_to_document(&fields)? },
            )
            .await?;

        Ok(result.matched_count > 0)
    }
}

/// Record id for a stored `_id`. Plain strings are used as-is; every other type, and strings
/// that would read back as JSON, are written as canonical extended JSON so the type survives:
/// `{"$oid":"507f1f77bcf86cd799439011"}`, `{"$numberInt":"5"}`, `"\"{quoted}\""`.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::String(s) if !looks_like_json(s) => s.clone(),
        Bson::String(s) => Value::String(s.clone()).to_string(),
        other => other.clone().into_canonical_extjson().to_string(),
    }
}

/// Inverse of [`id_to_string`]. Never guesses a type from the shape of a plain string.
pub fn id_to_bson(id: &str) -> Bson {
    if !looks_like_json(id) {
        return Bson::String(id.to_string());
    }

    match serde_json::from_str::<Value>(id) {
        Ok(Value::String(s)) => Bson::String(s),
        Ok(value) => Bson::try_from(value).unwrap_or_else(|_| Bson::String(id.to_string())),
        Err(_) => Bson::String(id.to_string()),
    }
}

fn looks_like_json(id: &str) -> bool {
    id.starts_with('{') || id.starts_with('"')
}

pub fn document_to_record(mut document: Document) -> EventRecord {
    let id = document
        .remove("_id")
        .map(|id| id_to_string(&id))
        .unwrap_or_default();

    EventRecord::new(id, document_to_fields(document))
}

pub fn document_to_fields(document: Document) -> Fields {
    document
        .into_iter()
        .map(|(key, value)| (key, bson_to_value(value)))
        .collect()
}

pub fn fields_to_document(fields: &Fields) -> Result<Document> {
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), value_to_bson(value)?)))
        .collect()
}

pub fn bson_to_value(value: Bson) -> FieldValue {
    match value {
        Bson::Null | Bson::Undefined => FieldValue::Null,
        Bson::Boolean(b) => FieldValue::Bool(b),
        Bson::Int32(i) => FieldValue::Integer(i64::from(i)),
        Bson::Int64(i) => FieldValue::Integer(i),
        Bson::Double(d) => FieldValue::Double(d),
        Bson::String(s) => FieldValue::String(s),
        Bson::Array(items) => FieldValue::Array(items.into_iter().map(bson_to_value).collect()),
        Bson::Document(doc) => FieldValue::Map(document_to_fields(doc)),
        Bson::DateTime(dt) => FieldValue::Timestamp(Timestamp::from_millis(dt.timestamp_millis())),
        Bson::Timestamp(ts) => FieldValue::Timestamp(Timestamp::new(i64::from(ts.time), 0)),
        other => FieldValue::Bson(other),
    }
}

/// Fails for timestamps outside the millisecond range of `bson::DateTime`.
pub fn value_to_bson(value: &FieldValue) -> Result<Bson> {
    Ok(match value {
        FieldValue::Null => Bson::Null,
        FieldValue::Bool(b) => Bson::Boolean(*b),
        FieldValue::Integer(i) => match i32::try_from(*i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(*i),
        },
        FieldValue::Double(d) => Bson::Double(*d),
        FieldValue::String(s) => Bson::String(s.clone()),
        FieldValue::Array(items) => {
            Bson::Array(items.iter().map(value_to_bson).collect::<Result<_>>()?)
        }
        FieldValue::Map(fields) => Bson::Document(fields_to_document(fields)?),
        FieldValue::Timestamp(ts) => {
            let millis = ts.to_millis().ok_or_else(|| {
                MaintenanceError::UnrepresentableValue(format!(
                    "timestamp {}s out of range",
                    ts.seconds
                ))
            })?;
            Bson::DateTime(bson::DateTime::from_millis(millis))
        }
        FieldValue::Bson(b) => b.clone(),
    })
}

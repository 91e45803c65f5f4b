use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub collection: String,
    pub backup_date: String,
    pub total_documents: usize,
    pub firebase_project: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackupEntry {
    pub id: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackupFile {
    pub metadata: BackupMetadata,
    pub events: Vec<BackupEntry>,
}

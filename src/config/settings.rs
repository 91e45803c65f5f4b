use std::env;
use std::path::PathBuf;

use crate::error::{MaintenanceError, Result};
use crate::modules::events::crud::COLLECTION_NAME;

pub const DEFAULT_DATABASE: &str = "onde-it-com";
pub const DEFAULT_BACKUP_DIR: &str = "backups";

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub database: String,
    pub collection: String,
    pub backup_dir: PathBuf,
    /// Recorded as `firebaseProject` in backup metadata.
    pub project_id: String,
}

impl Settings {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mongodb_uri =
            env::var("MONGODB_URI").map_err(|_| MaintenanceError::MissingEnv("MONGODB_URI"))?;
        let database = env::var("MONGODB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        let collection =
            env::var("EVENTS_COLLECTION").unwrap_or_else(|_| COLLECTION_NAME.to_string());
        let backup_dir = env::var("BACKUP_DIR").unwrap_or_else(|_| DEFAULT_BACKUP_DIR.to_string());
        let project_id = env::var("PROJECT_ID").unwrap_or_else(|_| database.clone());

        Ok(Self {
            mongodb_uri,
            database,
            collection,
            backup_dir: PathBuf::from(backup_dir),
            project_id,
        })
    }

    /// Settings for offline use, e.g. against a `MemoryStore`.
    pub fn local(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            mongodb_uri: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            collection: COLLECTION_NAME.to_string(),
            backup_dir: backup_dir.into(),
            project_id: DEFAULT_DATABASE.to_string(),
        }
    }
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaintenanceError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Backup file not found: {}", .0.display())]
    BackupFileMissing(PathBuf),
    #[error("Invalid backup structure: {0}")]
    InvalidBackupStructure(String),
    #[error("Cancelled by user")]
    UserCancelled,
    #[error("Store error: {0}")]
    Transport(String),
    #[error("Value cannot be stored: {0}")]
    UnrepresentableValue(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} must be set")]
    MissingEnv(&'static str),
    #[error("Batch aborted after {applied}/{total} operations: {source}")]
    BatchAborted {
        applied: usize,
        total: usize,
        #[source]
        source: Box<MaintenanceError>,
    },
}

impl MaintenanceError {
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::PermissionDenied(_) => true,
            Self::BatchAborted { source, .. } => source.is_permission_denied(),
            _ => false,
        }
    }
}

impl From<mongodb::error::Error> for MaintenanceError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            // 13 is Unauthorized
            ErrorKind::Command(command) if command.code == 13 => {
                Self::PermissionDenied(command.message.clone())
            }
            ErrorKind::Authentication { .. } => Self::PermissionDenied(err.to_string()),
            _ => Self::Transport(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, MaintenanceError>;

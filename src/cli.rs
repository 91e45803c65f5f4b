//! Console helpers shared by the maintenance binaries.

use crate::error::MaintenanceError;
use crate::services::batch::BatchProgress;

pub fn print_progress(verb: &str) -> impl FnMut(BatchProgress) + '_ {
    move |p| println!("✓ {} {}/{} documents...", verb, p.committed, p.total)
}

/// Prints `err` and, for permission failures, the usual suspects.
pub fn report_failure(err: &anyhow::Error, collection: &str) {
    eprintln!("❌ Error: {:#}", err);

    let maintenance = err.downcast_ref::<MaintenanceError>();

    if let Some(MaintenanceError::BatchAborted { applied, total, .. }) = maintenance {
        eprintln!("   {} of {} operations were committed before the failure.", applied, total);
    }

    if maintenance.is_some_and(MaintenanceError::is_permission_denied) {
        eprintln!("🔒 Permission error. Check that:");
        eprintln!("   - MONGODB_URI carries valid credentials");
        eprintln!("   - the database user's roles allow reading and writing \"{}\"", collection);
        eprintln!("   - EVENTS_COLLECTION names the right collection");
    }
}

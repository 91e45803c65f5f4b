pub mod cli;
pub mod config;
pub mod error;
pub mod modules;
pub mod services;
pub mod store;

pub use error::{MaintenanceError, Result};

/// Installs the fmt subscriber used by every maintenance binary.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("evento_admin=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

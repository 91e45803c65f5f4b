//! Run with: cargo run --bin backup_events

use std::process::ExitCode;

use evento_admin::cli;
use evento_admin::config::{self, Settings};
use evento_admin::modules::events::controller::{self, BackupOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    evento_admin::init_tracing();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("🚀 Backing up '{}'...\n", settings.collection);

    match run(&settings).await {
        Ok(code) => code,
        Err(e) => {
            cli::report_failure(&e, &settings.collection);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings) -> anyhow::Result<ExitCode> {
    let client = config::database::connect(settings).await?;
    let events = config::database::events(&client, settings);

    match controller::backup_events(&events, settings).await? {
        BackupOutcome::Empty => {
            println!("✓ No documents found, nothing to back up.");
            Ok(ExitCode::SUCCESS)
        }
        BackupOutcome::Unverified { path } => {
            eprintln!("❌ Backup written to {} but failed verification!", path.display());
            Ok(ExitCode::FAILURE)
        }
        BackupOutcome::Created { path, documents } => {
            println!("✓ Backed up {} documents", documents);
            println!("📄 File: {}", path.display());
            println!("\nTo restore:");
            println!("   cargo run --bin restore_events -- \"{}\"", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

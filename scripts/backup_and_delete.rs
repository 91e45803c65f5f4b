//! Backs up the event collection, verifies the file, asks for confirmation and only then
//! deletes everything.
//!
//! Run with: cargo run --bin backup_and_delete

use std::process::ExitCode;

use evento_admin::cli;
use evento_admin::config::{self, Settings};
use evento_admin::modules::events::controller::{self, WorkflowOutcome};
use evento_admin::services::prompt::StdinConfirm;

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

    println!("🛡️  Backup + delete for '{}'", settings.collection);
    println!("{:=<50}\n", "");

    match run(&settings).await {
        Ok(code) => code,
        Err(e) => {
            cli::report_failure(&e, &settings.collection);
            eprintln!("\n🛡️  If a backup was written, it is still in {}", settings.backup_dir.display());
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings) -> anyhow::Result<ExitCode> {
    let client = config::database::connect(settings).await?;
    let events = config::database::events(&client, settings);

    let outcome = controller::backup_and_delete(
        &events,
        settings,
        &mut StdinConfirm,
        cli::print_progress("Deleted"),
    )
    .await?;

    match outcome {
        WorkflowOutcome::NoDocuments => {
            println!("✓ No documents found. Nothing to do.");
            Ok(ExitCode::SUCCESS)
        }
        WorkflowOutcome::InvalidBackup { backup } => {
            eprintln!("❌ Backup {} is invalid. Aborted, nothing deleted.", backup.display());
            Ok(ExitCode::FAILURE)
        }
        WorkflowOutcome::Cancelled { backup } => {
            println!("✗ Deletion cancelled by user.");
            println!("✓ Backup kept at {}", backup.display());
            Ok(ExitCode::SUCCESS)
        }
        WorkflowOutcome::Completed { backup, deleted } => {
            println!("\n🎉 Done!");
            println!("✓ Deleted: {}", deleted);
            println!("💾 Backup: {}", backup.display());
            println!("\nTo restore:");
            println!("   cargo run --bin restore_events -- \"{}\"", backup.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

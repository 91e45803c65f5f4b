//! Deletes every event WITHOUT a backup. Prefer `backup_and_delete`.
//!
//! Run with: cargo run --bin delete_all_events

use std::process::ExitCode;

use evento_admin::cli;
use evento_admin::config::{self, Settings};
use evento_admin::modules::events::controller::{self, DeleteOutcome};
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

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::report_failure(&e, &settings.collection);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let client = config::database::connect(settings).await?;
    let events = config::database::events(&client, settings);

    let outcome =
        controller::delete_all(&events, &mut StdinConfirm, cli::print_progress("Deleted")).await?;

    match outcome {
        DeleteOutcome::NoDocuments => println!("✓ No documents found, nothing to delete."),
        DeleteOutcome::Cancelled => println!("✗ Cancelled by user."),
        DeleteOutcome::Deleted(count) => println!("\n🎉 Deleted {} documents.", count),
    }

    Ok(())
}

//! Run with: cargo run --bin restore_events -- "backups/eventos_backup_2024-01-15_14-30-45.json"

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use evento_admin::cli;
use evento_admin::config::{self, Settings};
use evento_admin::modules::events::controller::{self, RestoreOutcome};
use evento_admin::services::prompt::StdinConfirm;

#[tokio::main]
async fn main() -> ExitCode {
    evento_admin::init_tracing();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("❌ Missing backup file path\n");
        eprintln!("Usage: restore_events <path/to/backup.json>\n");
        eprintln!("Example:");
        eprintln!("  cargo run --bin restore_events -- \"./backups/eventos_backup_2024-01-15_14-30-45.json\"");
        return ExitCode::FAILURE;
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("🚀 Restoring '{}' from {}\n", settings.collection, path.display());

    match run(&settings, &path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::report_failure(&e, &settings.collection);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings, path: &Path) -> anyhow::Result<()> {
    let client = config::database::connect(settings).await?;
    let events = config::database::events(&client, settings);

    let outcome =
        controller::restore_events(&events, path, &mut StdinConfirm, cli::print_progress("Restored"))
            .await?;

    match outcome {
        RestoreOutcome::Cancelled { .. } => println!("✗ Cancelled by user."),
        RestoreOutcome::Restored { metadata, restored } => {
            println!("\n🎉 Restored {} documents", restored);
            println!("   - backup date: {}", metadata.backup_date);
            println!("   - project: {}", metadata.firebase_project);
        }
    }

    Ok(())
}

//! Rewrites one event's `locationName` so it matches the Maputo filter.
//!
//! Run with: cargo run --bin fix_event_location [event-id]

use std::process::ExitCode;

use evento_admin::cli;
use evento_admin::config::{self, Settings};
use evento_admin::modules::events::model::Fields;
use evento_admin::services::filters::{location_fix, LOCATION_FIXES, LOCATION_NAME_FIELD};
use evento_admin::services::prompt::read_line;
use evento_admin::store::EventStore;

const DEFAULT_EVENT_ID: &str = "pV04td1F1eFvnuUCHzXr";

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
    let event_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_EVENT_ID.to_string());

    match run(&settings, &event_id).await {
        Ok(code) => code,
        Err(e) => {
            cli::report_failure(&e, &settings.collection);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings, event_id: &str) -> anyhow::Result<ExitCode> {
    println!("📍 Location options:");
    for (index, fix) in LOCATION_FIXES.iter().enumerate() {
        println!("   {}. {}", index + 1, fix);
    }

    let choice = read_line(&format!("Choose an option (1-{}): ", LOCATION_FIXES.len()))?;
    let Some(location_name) = location_fix(&choice) else {
        println!("✗ Invalid option");
        return Ok(ExitCode::FAILURE);
    };

    let client = config::database::connect(settings).await?;
    let events = config::database::events(&client, settings);

    println!("🔄 Setting {} to \"{}\"", LOCATION_NAME_FIELD, location_name);
    let mut fields = Fields::new();
    fields.insert(LOCATION_NAME_FIELD.to_string(), location_name.into());

    if !events.update_fields(event_id, fields).await? {
        eprintln!("❌ Event {} not found", event_id);
        return Ok(ExitCode::FAILURE);
    }

    println!("✓ Event updated");
    Ok(ExitCode::SUCCESS)
}

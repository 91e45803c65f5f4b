//! Prints which events the app would list, to diagnose events that do not show up.
//!
//! Run with: cargo run --bin test_events_fetch [event-id]

use std::process::ExitCode;

use evento_admin::cli;
use evento_admin::config::{self, Settings};
use evento_admin::modules::events::model::{EventRecord, Timestamp};
use evento_admin::services::filters::{event_date, is_deleted, upcoming_events, visible_events};
use evento_admin::store::EventStore;

const DEFAULT_EVENT_ID: &str = "pV04td1F1eFvnuUCHzXr";

fn print_event(event: &EventRecord) {
    let date = event_date(event)
        .map(|d| d.date_string())
        .unwrap_or_else(|| "N/A".to_string());

    println!("   - ID: {}", event.id);
    println!("     Name: {}", event.name());
    println!("     Date: {}", date);
    println!("     Deleted: {}\n", is_deleted(event));
}

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
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::report_failure(&e, &settings.collection);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings, event_id: &str) -> anyhow::Result<()> {
    let client = config::database::connect(settings).await?;
    let events = config::database::events(&client, settings);

    println!("📋 1. All events (no filters):");
    let all = events.fetch_all().await?;
    println!("   Total: {}\n", all.len());
    all.iter().for_each(print_event);

    let now = Timestamp::now();
    println!("📋 2. Upcoming events (date >= now):");
    println!("   Reference: {} ({})", now.date_string(), now.seconds);
    let upcoming = upcoming_events(&all, now);
    println!("   Found: {}\n", upcoming.len());
    upcoming.iter().copied().for_each(print_event);

    println!("📋 3. Upcoming and not deleted:");
    let visible = visible_events(&all, now);
    println!("   Found: {}\n", visible.len());
    visible.iter().copied().for_each(print_event);

    println!("📋 4. Checking event \"{}\":", event_id);
    match all.iter().find(|e| e.id == event_id) {
        Some(event) => {
            println!("   ✓ Found");
            print_event(event);

            let is_future = event_date(event).is_some_and(|d| d.seconds >= now.seconds);
            let not_deleted = !is_deleted(event);
            println!("   - upcoming? {}", is_future);
            println!("   - not deleted? {}", not_deleted);
            println!(
                "   - listed by the app? {}",
                if is_future && not_deleted { "✓ YES" } else { "✗ NO" }
            );
        }
        None => println!("   ✗ Not found"),
    }

    Ok(())
}

//! Offline check of the province filter against a location name.
//!
//! Run with: cargo run --bin test_location_filter ["location name"]

use evento_admin::services::filters::{
    matches_province, matching_provinces, LOCATION_FIXES, PROVINCES,
};

const SAMPLE_LOCATION_NAME: &str = "Av. Mártires da Mueda n. 790";

fn main() {
    let location_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SAMPLE_LOCATION_NAME.to_string());

    println!("🧪 Location filter check");
    println!("{:=<40}\n", "");
    println!("📍 locationName: \"{}\"\n", location_name);

    println!("🔍 Province filters:");
    for province in PROVINCES {
        let matches = matches_province(&location_name, province);
        println!("   {}: {}", province, if matches { "✓ PASS" } else { "✗ FAIL" });
        if matches {
            println!("      → \"{}\" contains \"{}\"", location_name, province);
        }
    }

    let matched = matching_provinces(&location_name);
    if matched.is_empty() {
        println!("\n⚠️  No province filter would show this event");
    } else {
        println!("\n✅ Visible under: {}", matched.join(", "));
    }

    println!("\n🔧 Candidate fixes for \"Maputo\":");
    for (index, fix) in LOCATION_FIXES.iter().enumerate() {
        let matches = matches_province(fix, "Maputo");
        println!(
            "   {}. \"{}\": {}",
            index + 1,
            fix,
            if matches { "✓ would match" } else { "✗ would not match" }
        );
    }
}

use crate::modules::events::model::{EventRecord, FieldValue, Timestamp};

pub const PROVINCES: [&str; 10] = [
    "Maputo",
    "Gaza",
    "Inhambane",
    "Sofala",
    "Manica",
    "Tete",
    "Zambezia",
    "Nampula",
    "Cabo Delgado",
    "Niassa",
];

/// Suggested `locationName` values that satisfy the Maputo filter.
pub const LOCATION_FIXES: [&str; 4] = [
    "Av. Mártires da Mueda n. 790, Maputo",
    "A Casa da Maria, Maputo",
    "Maputo - Av. Mártires da Mueda n. 790",
    "Maputo",
];

pub const DATE_FIELD: &str = "data";
pub const DELETED_FIELD: &str = "deleted";
pub const LOCATION_NAME_FIELD: &str = "locationName";

pub fn matches_province(location_name: &str, province: &str) -> bool {
    location_name
        .to_lowercase()
        .contains(&province.to_lowercase())
}

pub fn matching_provinces(location_name: &str) -> Vec<&'static str> {
    PROVINCES
        .iter()
        .copied()
        .filter(|province| matches_province(location_name, province))
        .collect()
}

pub fn event_date(record: &EventRecord) -> Option<Timestamp> {
    record.field(DATE_FIELD).and_then(FieldValue::as_timestamp)
}

pub fn is_upcoming(record: &EventRecord, now: Timestamp) -> bool {
    event_date(record).is_some_and(|date| date.seconds >= now.seconds)
}

pub fn is_deleted(record: &EventRecord) -> bool {
    record
        .field(DELETED_FIELD)
        .is_some_and(FieldValue::is_truthy)
}

pub fn upcoming_events(records: &[EventRecord], now: Timestamp) -> Vec<&EventRecord> {
    records.iter().filter(|r| is_upcoming(r, now)).collect()
}

/// What the app lists: upcoming and not soft-deleted.
pub fn visible_events(records: &[EventRecord], now: Timestamp) -> Vec<&EventRecord> {
    records
        .iter()
        .filter(|r| is_upcoming(r, now) && !is_deleted(r))
        .collect()
}

/// Option number (1-based, as typed by the user) to fix.
pub fn location_fix(choice: &str) -> Option<&'static str> {
    let index: usize = choice.trim().parse().ok()?;
    index.checked_sub(1).and_then(|i| LOCATION_FIXES.get(i).copied())
}

//! CSV export of the authoritative event set.
//!
//! Every field is quoted (embedded quotes doubled), missing fields render as
//! empty strings, and the column order is fixed. The file lands next to the
//! process as `events.csv` unless the caller picks a path.

use std::fs;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;

use crate::model::Event;

/// Default export file name.
pub const CSV_FILE_NAME: &str = "events.csv";

const CSV_HEADERS: [&str; 6] = ["Name", "Date", "Venue", "City", "Genre", "Image URL"];

/// Serializes the events to CSV text, header row first.
#[must_use]
pub fn to_csv(events: &[Event]) -> String {
    let mut rows = Vec::with_capacity(events.len() + 1);
    rows.push(csv_row(CSV_HEADERS.iter().copied()));
    for event in events {
        rows.push(csv_row(
            [
                event.name().as_deref().unwrap_or(""),
                event.local_date().unwrap_or(""),
                event.venue_name().unwrap_or(""),
                event.city_name().unwrap_or(""),
                event.genre_name().unwrap_or(""),
                event.image_url().unwrap_or(""),
            ]
            .into_iter(),
        ));
    }
    rows.join("\n")
}

/// Writes the events to `path` as CSV.
pub fn write_csv(events: &[Event], path: &Path) -> Result<()> {
    fs::write(path, to_csv(events)).with_context(|| format!("writing {}", path.display()))
}

fn csv_row<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields.map(quote).collect::<Vec<_>>().join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

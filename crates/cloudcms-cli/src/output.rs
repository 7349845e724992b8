//! Output formatting helpers.
//!
//! Results go to stdout as JSON; everything meant for a human goes to stderr.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;

use cloudcms_core::ResultMap;

/// Print a success message.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    eprintln!("{}: {}", label.dimmed(), value);
}

/// Print a dimmed note.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a document, pretty unless `compact` is set.
pub fn document<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    if compact { json(value) } else { json_pretty(value) }
}

/// Print a listing: one compact row per line, or the whole envelope.
pub fn listing(listing: &ResultMap, envelope: bool) -> Result<()> {
    if envelope {
        return json_pretty(&json!({
            "rows": listing.rows,
            "size": listing.size,
            "total_rows": listing.total_rows,
            "offset": listing.offset,
        }));
    }

    if listing.is_empty() {
        note("No results.");
        return Ok(());
    }
    for row in listing.iter() {
        json(row)?;
    }
    if listing.has_more() {
        field(
            "Showing",
            &format!(
                "{}-{} of {}",
                listing.offset.saturating_add(1),
                listing.offset.saturating_add(listing.size),
                listing.total_rows
            ),
        );
    }
    Ok(())
}

/// Snapshot operations: searching, export naming, stats
use crate::config::EXPORT_FILE_PREFIX;
use crate::display::format_bytes;
use crate::snapshot::StorageSnapshot;

/// Entries whose key or value contains `term`, ignoring case; an empty term keeps everything
pub fn filter_snapshot(snapshot: &StorageSnapshot, term: &str) -> StorageSnapshot {
    if term.is_empty() {
        return snapshot.clone();
    }

    let needle = term.to_lowercase();
    snapshot
        .iter()
        .filter(|(key, value)| {
            key.to_lowercase().contains(&needle) || value.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Download name for an export, e.g. `local-storage-example.com-2024-10-28.json`
///
/// `iso_timestamp` is an ISO-8601 timestamp; only its date part is used.
pub fn export_filename(domain: &str, iso_timestamp: &str) -> String {
    let date = iso_timestamp.split('T').next().unwrap_or(iso_timestamp);
    format!("{}-{}-{}.json", EXPORT_FILE_PREFIX, domain, date)
}

/// Footer line: item count, approximate size, and domain
pub fn stats_line(snapshot: &StorageSnapshot, domain: &str) -> String {
    format!(
        "Total items: {} | Approximate size: {} | Domain: {}",
        snapshot.len(),
        format_bytes(snapshot.approximate_size()),
        domain
    )
}

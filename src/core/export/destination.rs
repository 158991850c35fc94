//! Destination and run-log path resolution
//!
//! When overwriting is disabled and the requested file already exists, the
//! current date (`YYYYMMDD`) is inserted before the extension. The dated name
//! depends only on the inputs and the calendar day, so a second run on the
//! same day replaces the dated file instead of creating a third variant.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

const DATE_SUFFIX_FORMAT: &str = "%Y%m%d";
const RUN_LOG_SUFFIX: &str = "_log.txt";

/// Resolve the artifact path using today's local date
pub fn resolve_destination(folder: &Path, filename: &str, overwrite: bool) -> PathBuf {
    resolve_destination_on(folder, filename, overwrite, Local::now().date_naive())
}

/// Resolve the artifact path for a given calendar day
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use std::path::Path;
/// use tautulli_exporter::core::export::destination::resolve_destination_on;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// let path = resolve_destination_on(Path::new("/nonexistent"), "movies.json", false, day);
/// assert_eq!(path, Path::new("/nonexistent/movies.json"));
/// ```
pub fn resolve_destination_on(
    folder: &Path,
    filename: &str,
    overwrite: bool,
    today: NaiveDate,
) -> PathBuf {
    let plain = folder.join(filename);
    if overwrite || !plain.exists() {
        return plain;
    }
    folder.join(dated_filename(filename, today))
}

/// `movies.json` → `movies_20240309.json`
pub fn dated_filename(filename: &str, date: NaiveDate) -> String {
    let (stem, extension) = split_extension(filename);
    format!("{stem}_{}{extension}", date.format(DATE_SUFFIX_FORMAT))
}

/// Run log next to the artifact, named after the requested file's stem
pub fn run_log_path(folder: &Path, filename: &str) -> PathBuf {
    let (stem, _) = split_extension(filename);
    folder.join(format!("{stem}{RUN_LOG_SUFFIX}"))
}

/// Split at the last dot, keeping the dot with the extension
///
/// Leading dots belong to the stem, so `.hidden` has no extension.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if filename[..idx].chars().any(|c| c != '.') => filename.split_at(idx),
        _ => (filename, ""),
    }
}

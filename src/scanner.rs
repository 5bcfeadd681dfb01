//! Migration directory scanning and file naming.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local};

/// Create the migrations directory if it does not exist yet.
/// Idempotent; an existing directory is not an error.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// List the `.sql` file names in `dir`, sorted bytewise ascending.
///
/// This order is the authoritative apply order; it has no hidden state
/// and is stable across restarts regardless of how the filesystem
/// happens to enumerate entries.
pub fn list_migration_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(".sql") {
            names.push(name.to_string());
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// Build the file name for a new migration: a fixed-width
/// lexicographically sortable timestamp, an underscore, and the given
/// name with whitespace collapsed to underscores.
///
/// Two calls in different seconds always order correctly. Two calls
/// within the same second collide only if the caller also reuses the
/// name; that is an accepted limitation.
pub fn next_file_name(name: &str, now: DateTime<Local>) -> String {
    let stamp = now.format("%Y%m%d%H%M%S");
    let sanitized = name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{stamp}_{sanitized}.sql")
}

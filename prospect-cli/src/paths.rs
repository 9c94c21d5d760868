//! Where `prospect` keeps its files (XDG dirs on Linux).

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Archived logs kept besides `latest.log`.
const KEEP_LOGS: usize = 25;

fn dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "prospect", "prospect")
}

/// SQLite database of persisted view state, in the data dir.
pub fn settings_db() -> Option<PathBuf> {
    dirs().map(|d| d.data_dir().join("settings.db"))
}

/// Per-dataset table config: `<config dir>/tables/<name>.json`.
pub fn table_config(name: &str) -> Option<PathBuf> {
    dirs().map(|d| d.config_dir().join("tables").join(format!("{name}.json")))
}

pub fn log_file() -> Option<PathBuf> {
    dirs().map(|d| d.cache_dir().join("latest.log"))
}

/// Rename the previous run's `latest.log` to `<timestamp>.log` and delete
/// all but the newest [`KEEP_LOGS`] archives.
pub fn rotate_logs() {
    let Some(latest) = log_file() else { return };
    let Some(dir) = latest.parent().map(PathBuf::from) else { return };

    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{stamp}.log")));
    }

    // Timestamped names sort chronologically.
    let Ok(entries) = fs::read_dir(&dir) else { return };
    let mut archives: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "log") && *path != latest)
        .collect();
    archives.sort();
    let excess = archives.len().saturating_sub(KEEP_LOGS);
    for path in &archives[..excess] {
        let _ = fs::remove_file(path);
    }
}

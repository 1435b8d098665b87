//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "datagrid";
const APPLICATION: &str = "datagrid";

/// Name of the active log file inside the cache directory.
const LATEST_LOG: &str = "latest.log";

/// Archived sessions live in this subdirectory of the cache directory.
const ARCHIVE_DIR: &str = "sessions";

/// Archives are named `session-<stamp>[-n].log`.
const ARCHIVE_PREFIX: &str = "session-";
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Maximum number of archived sessions to keep.
const MAX_SESSIONS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where logs live.
///
/// - Linux: `$XDG_CACHE_HOME/datagrid` or `~/.cache/datagrid`
/// - macOS: `~/Library/Caches/dev.datagrid.datagrid`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/datagrid` or `~/.config/datagrid`
/// - macOS: `~/Library/Application Support/dev.datagrid.datagrid`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the default config file.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Move the previous session's log into the archive and prune it.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let _ = archive_latest(&cache, Local::now());
    prune_sessions(&cache.join(ARCHIVE_DIR), MAX_SESSIONS);
}

/// Archive `latest.log` stamped with the time it was last written,
/// falling back to `now`. Returns the archive path.
fn archive_latest(cache: &Path, now: DateTime<Local>) -> Option<PathBuf> {
    let latest = cache.join(LATEST_LOG);
    let written = fs::metadata(&latest).ok()?.modified().ok();
    let stamp = written
        .map(DateTime::<Local>::from)
        .unwrap_or(now)
        .format(STAMP_FORMAT)
        .to_string();

    let archive = cache.join(ARCHIVE_DIR);
    fs::create_dir_all(&archive).ok()?;
    let target = free_name(&archive, &stamp);
    fs::rename(&latest, &target).ok()?;
    Some(target)
}

/// First unused archive name for a stamp; sessions within one second get
/// a numeric suffix.
fn free_name(archive: &Path, stamp: &str) -> PathBuf {
    let mut candidate = archive.join(format!("{}{}.log", ARCHIVE_PREFIX, stamp));
    let mut n = 1;
    while candidate.exists() {
        candidate = archive.join(format!("{}{}-{}.log", ARCHIVE_PREFIX, stamp, n));
        n += 1;
    }
    candidate
}

/// Stamp and collision suffix of an archive file name.
fn session_key(name: &str) -> Option<(NaiveDateTime, u32)> {
    let rest = name.strip_prefix(ARCHIVE_PREFIX)?.strip_suffix(".log")?;
    let (stamp, suffix) = match rest.split_once('-') {
        Some((stamp, n)) => (stamp, n.parse().ok()?),
        None => (rest, 0),
    };
    let stamp = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
    Some((stamp, suffix))
}

/// Delete the oldest archived sessions beyond `keep`, ordered by the
/// stamp in their names. Files that are not session archives are left.
fn prune_sessions(archive: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(archive) else { return };

    let mut sessions: Vec<((NaiveDateTime, u32), PathBuf)> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let key = session_key(&e.file_name().to_string_lossy())?;
            Some((key, e.path()))
        })
        .collect();
    if sessions.len() <= keep {
        return;
    }

    sessions.sort_by(|a, b| a.0.cmp(&b.0));
    let excess = sessions.len() - keep;
    for (_, path) in sessions.into_iter().take(excess) {
        let _ = fs::remove_file(path);
    }
}

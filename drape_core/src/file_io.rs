//! # File I/O Module
//!
//! Project files and exported documents:
//! - **Atomic writes**: write to `.tmp`, fsync, rename, so an interrupted
//!   save never leaves a half-written survey behind
//! - **File locking**: shop tablets and the office PC often share one
//!   network folder; a lock keeps two people from editing the same survey
//! - **Version validation**: refuse files written by a newer schema
//!
//! ## File Format
//!
//! Projects are saved as `.drp` files containing pretty-printed JSON. Lock
//! files sit next to them as `.drp.lock` with metadata about the holder.
//!
//! ## Example
//!
//! ```rust,no_run
//! use drape_core::file_io::{load_project, save_project, FileLock};
//! use drape_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("松仁路 100 號");
//! let path = Path::new("songren-100.drp");
//!
//! let lock = FileLock::acquire(path, "lin")?;
//! save_project(&project, path)?;
//! drop(lock);
//!
//! let loaded = load_project(path)?;
//! assert_eq!(loaded.info.name, "松仁路 100 號");
//! # Ok::<(), drape_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Project file extension
pub const PROJECT_EXTENSION: &str = "drp";

/// Locks older than this are considered abandoned.
const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in .drp.lock files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// `user (machine)`, as shown to whoever is locked out
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }

    /// Whether the holder is gone: a dead process on this machine, or a
    /// lock older than a day.
    pub fn is_stale(&self) -> bool {
        if self.machine == machine_name() && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

/// Default lock owner: the OS login name.
pub fn default_user_id() -> String {
    whoami::username()
}

fn machine_name() -> String {
    whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    // Without a cheap liveness check, rely on the age limit
    true
}

/// File lock guard that releases the lock when dropped.
///
/// Combines an OS-level lock (via fs2) with a `.lock` file whose metadata
/// other users can read.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// A stale lock left by a crashed session is taken over.
    ///
    /// # Errors
    ///
    /// [`CalcError::FileLocked`] when another live session holds the lock.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    existing.holder(),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            warn!(path = %path.display(), holder = %existing.holder(), "Taking over stale lock");
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        info!(path = %path.display(), user = %info.user_id, "Acquired lock");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// The live lock on `path`, if someone else holds one.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !info.is_stale())
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        debug!(path = %self.project_path.display(), "Released lock");
    }
}

/// `survey.drp` -> `survey.drp.lock`
fn lock_path_for(project_path: &Path) -> PathBuf {
    let mut lock_path = project_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = fs::read_to_string(lock_path)
        .map_err(|e| CalcError::file_error("read lock", lock_path.display().to_string(), e.to_string()))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write `bytes` to `path` atomically (temp file, fsync, rename).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(bytes)
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    path.with_extension(extension)
}

/// Save a project as pretty JSON with an atomic write.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), windows = project.windows.len(), "Saved project");
    Ok(())
}

/// Load a project and recompute all derived values.
///
/// Stored costs and totals are never trusted: the file may have been edited
/// by hand or written by an older pricing rule.
///
/// # Errors
///
/// - [`CalcError::FileError`] on I/O failure
/// - [`CalcError::SerializationError`] for invalid JSON
/// - [`CalcError::VersionMismatch`] for an incompatible schema
/// - [`CalcError::InvalidInput`] when window ids are exhausted
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut project: Project = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&project.meta.version)?;
    project.windows.refresh()?;

    info!(path = %path.display(), windows = project.windows.len(), "Loaded project");
    Ok(project)
}

/// Load a project along with any live lock another session holds on it.
///
/// A `Some` lock means the caller should open the project read-only.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    let lock_info = FileLock::check(path);
    Ok((project, lock_info))
}

/// Same major version; for 0.x, the file's minor may not be newer than ours.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

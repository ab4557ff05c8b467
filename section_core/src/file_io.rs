//! # File I/O Module
//!
//! Project file operations:
//! - **Atomic saves**: write to `.tmp`, sync, rename over the target
//! - **File locking**: advisory lock plus a `.lock` file naming the holder
//! - **Version validation**: refuse files written by a newer schema
//!
//! ## File Format
//!
//! Projects are saved as `.sct` files containing pretty-printed JSON.
//! Lock files use the `.sct.lock` extension.
//!
//! ## Example
//!
//! ```rust,no_run
//! use section_core::file_io::{save_project, load_project, FileLock};
//! use section_core::project::SectionProject;
//! use std::path::Path;
//!
//! let project = SectionProject::new("Deck", "Engineer");
//! let path = Path::new("deck.sct");
//!
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock);
//!
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.meta.title, "Deck");
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{SectionError, SectionResult};
use crate::project::{SectionProject, SCHEMA_VERSION};

/// Extension of project files
pub const PROJECT_EXTENSION: &str = "sct";

/// Locks older than this are treated as abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in `.sct.lock` files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process holding the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: machine_name().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Expired, or held by a process that has exited on this machine
    pub fn is_stale(&self) -> bool {
        self.age_hours() > STALE_LOCK_HOURS || self.holder_exited()
    }

    fn age_hours(&self) -> i64 {
        (Utc::now() - self.locked_at).num_hours()
    }

    fn holder_exited(&self) -> bool {
        machine_name().is_some_and(|m| m == self.machine) && !process_alive(self.pid)
    }

    fn describe_holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn machine_name() -> Option<String> {
    ["COMPUTERNAME", "HOSTNAME", "HOST"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .filter(|name| !name.is_empty())
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Maps an I/O error on `path` to a `FileError` for `operation`.
fn io_error<'a>(operation: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> SectionError + 'a {
    move |e| SectionError::file_error(operation, path.display().to_string(), e.to_string())
}

/// Exclusive lock on a project file, released on drop.
///
/// The `.sct.lock` file is locked through fs2 and holds the [`LockInfo`]
/// JSON so other users can see who has the project open.
#[derive(Debug)]
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// # Errors
    /// `FileLocked` when another live process holds the lock.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> SectionResult<Self> {
        if let Some(holder) = Self::check(path) {
            return Err(SectionError::file_locked(
                path.display().to_string(),
                holder.describe_holder(),
                holder.locked_at.to_rfc3339(),
            ));
        }

        let lock_path = lock_path_for(path);
        let mut handle = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(io_error("create lock", &lock_path))?;
        if handle.try_lock_exclusive().is_err() {
            return Err(SectionError::file_locked(path.display().to_string(), "another process", "unknown"));
        }

        let info = LockInfo::new(user_id);
        let holder = serde_json::to_vec_pretty(&info).map_err(SectionError::serialization)?;
        handle.write_all(&holder).map_err(io_error("write lock", &lock_path))?;
        handle.sync_all().map_err(io_error("sync lock", &lock_path))?;

        debug!(path = %path.display(), user = %info.user_id, "acquired project lock");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            handle,
            info,
        })
    }

    /// Current live lock on `path`, if any. Stale and unreadable locks are ignored.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let info = read_lock_info(&lock_path_for(path)).ok()?;
        if info.is_stale() {
            warn!(user = %info.user_id, machine = %info.machine, "ignoring stale project lock");
            return None;
        }
        Some(info)
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.handle.unlock();
        if let Err(e) = fs::remove_file(&self.lock_path) {
            debug!(path = %self.lock_path.display(), error = %e, "lock file already gone");
        }
    }
}

/// `deck.sct` locks through `deck.sct.lock`.
fn lock_path_for(project_path: &Path) -> PathBuf {
    let mut name = project_path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

fn read_lock_info(lock_path: &Path) -> SectionResult<LockInfo> {
    let contents = fs::read_to_string(lock_path).map_err(io_error("read lock", lock_path))?;
    serde_json::from_str(&contents).map_err(SectionError::serialization)
}

/// Save a project with atomic write semantics.
///
/// The JSON is written to a sibling `.tmp` file, synced to disk, then
/// renamed over `path`, so an interrupted save never leaves a truncated
/// project behind.
pub fn save_project(project: &SectionProject, path: &Path) -> SectionResult<()> {
    let json = serde_json::to_vec_pretty(project).map_err(SectionError::serialization)?;
    let tmp_path = path.with_extension(format!("{}.tmp", PROJECT_EXTENSION));

    let mut tmp = File::create(&tmp_path).map_err(io_error("create temp file", &tmp_path))?;
    tmp.write_all(&json).map_err(io_error("write temp file", &tmp_path))?;
    tmp.sync_all().map_err(io_error("sync temp file", &tmp_path))?;
    drop(tmp);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error("rename to final", path)(e));
    }

    debug!(path = %path.display(), components = project.components.len(), "saved project");
    Ok(())
}

/// Load a project and check its schema version.
///
/// # Errors
/// * `FileError` - I/O failure
/// * `SerializationError` - invalid JSON
/// * `VersionMismatch` - incompatible schema version
pub fn load_project(path: &Path) -> SectionResult<SectionProject> {
    let contents = fs::read_to_string(path).map_err(io_error("read", path))?;

    let project: SectionProject = serde_json::from_str(&contents).map_err(|e| SectionError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Load a project along with the lock held by another user, if any.
pub fn load_project_with_lock_check(path: &Path) -> SectionResult<(SectionProject, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Major versions must match; in 0.x the file's minor may not exceed ours.
fn validate_version(file_version: &str) -> SectionResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || SectionError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

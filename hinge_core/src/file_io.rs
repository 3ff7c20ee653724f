//! # File I/O Module
//!
//! Shared file plumbing for session files and model text files:
//! - **Atomic writes**: write to a sibling `.tmp`, fsync, rename over the target
//! - **File locking**: one writer per file, visible to other users via a `.lock` file
//! - **Version validation**: session schema compatibility on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use hinge_core::file_io::{save_session, load_session, FileLock};
//! use hinge_core::session::Session;
//! use std::path::Path;
//!
//! let session = Session::new("Engineer", "model.$2k");
//! let path = Path::new("hinges.json");
//!
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//! save_session(&session, path).unwrap();
//! drop(lock);
//!
//! let loaded = load_session(path).unwrap();
//! assert_eq!(loaded.meta.engineer, "Engineer");
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::session::{Session, SCHEMA_VERSION};

/// Metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
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
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// `user (machine)`, as shown in lock errors
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

/// Best-effort name of the user running this process
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Exclusive lock on a file, released when dropped.
///
/// Combines an OS-level advisory lock (via fs2) with a `.lock` file carrying
/// [`LockInfo`] so other users can see who holds it.
pub struct FileLock {
    target: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`.
    ///
    /// Fails with [`CalcError::FileLocked`] if a live holder exists. Lock files
    /// left behind by dead processes, or older than a day, are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(existing) = read_lock_info(&lock_path) {
            if !is_lock_stale(&existing) {
                return Err(CalcError::file_locked(path.display().to_string(), existing.holder()));
            }
            debug!(path = %lock_path.display(), holder = %existing.holder(), "taking over stale lock");
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
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process"))?;

        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(FileLock {
            target: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current live holder of `path`, if any
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).filter(|info| !is_lock_stale(info))
    }

    /// The locked file
    pub fn path(&self) -> &Path {
        &self.target
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `model.$2k` -> `model.$2k.lock`
pub fn lock_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "lock")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    path.with_extension(extension)
}

fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// A lock is stale when its process is gone (same machine) or it is over 24h old
fn is_lock_stale(info: &LockInfo) -> bool {
    #[cfg(unix)]
    {
        if hostname().as_deref() == Some(info.machine.as_str())
            && fs::metadata(format!("/proc/{}", info.pid)).is_err()
        {
            return true;
        }
    }
    (Utc::now() - info.locked_at).num_hours() > 24
}

/// Replace `path` with `contents` atomically.
///
/// Writes a sibling `.tmp` file, syncs it to disk, then renames it over the
/// target. An interrupted write leaves the original file intact.
pub fn atomic_write(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = sibling_with_suffix(path, "tmp");

    let write = || -> std::io::Result<()> {
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(contents)?;
        tmp_file.sync_all()
    };
    if let Err(e) = write() {
        let _ = fs::remove_file(&tmp_path);
        return Err(CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Save a session as pretty JSON with atomic write semantics.
pub fn save_session(session: &Session, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(session)?;
    atomic_write(path, json.as_bytes())?;
    debug!(path = %path.display(), variants = session.variant_count(), "session saved");
    Ok(())
}

/// Load a session and check its schema version.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_session(path: &Path) -> CalcResult<Session> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let session: Session = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid session JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&session.meta.version)?;
    session.validate_variants()?;
    Ok(session)
}

/// Load a session along with the current lock holder, if another user has it open
pub fn load_session_with_lock_check(path: &Path) -> CalcResult<(Session, Option<LockInfo>)> {
    let session = load_session(path)?;
    Ok((session, FileLock::check(path)))
}

/// Major versions must match; for 0.x the file's minor version must not be newer.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };

    let file = parse(file_version).filter(|p| !p.is_empty()).ok_or_else(mismatch)?;
    let current = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file[0] != current[0] {
        return Err(mismatch());
    }
    if current[0] == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file.get(1), current.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_generation() {
        assert_eq!(
            lock_path_for(Path::new("/models/frame.$2k")),
            Path::new("/models/frame.$2k.lock")
        );
        assert_eq!(lock_path_for(Path::new("/models/frame")), Path::new("/models/frame.lock"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let session = Session::new("Test Engineer", "frame.$2k");
        save_session(&session, &path).unwrap();

        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.model_path, Path::new("frame.$2k"));
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.$2k");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new\r\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new\r\n");
    }

    #[test]
    fn test_atomic_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("model.$2k");
        let err = atomic_write(&path, b"x").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.$2k");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");
        assert_eq!(lock.path(), path.as_path());
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());
        assert!(FileLock::check(&path).is_some());

        let err = FileLock::acquire(&path, "other@example.com").err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::check(&path).is_none());
    }

    #[test]
    fn test_old_lock_is_taken_over() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.$2k");
        let mut info = LockInfo::new("someone");
        info.machine = "elsewhere".to_string();
        info.locked_at = Utc::now() - chrono::Duration::hours(30);
        fs::write(lock_path_for(&path), serde_json::to_string(&info).unwrap()).unwrap();

        assert!(FileLock::check(&path).is_none());
        let lock = FileLock::acquire(&path, "me").unwrap();
        assert_eq!(lock.info.user_id, "me");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut session = Session::new("Test", "frame.$2k");
        session.meta.version = "0.9.0".to_string();
        save_session(&session, &path).unwrap();

        let err = load_session(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_rejects_duplicate_variants() {
        use crate::calculations::{ColumnInput, MemberInput};
        use crate::sections::ShapeKind;
        use crate::session::Variant;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let column = MemberInput::Column(ColumnInput {
            section_name: "HEB300".to_string(),
            shape: ShapeKind::I,
            length_mm: 3500.0,
            fy_mpa: 355.0,
            unbraced_length_minor_mm: None,
            unbraced_length_major_mm: None,
        });
        let mut session = Session::new("Test", "frame.$2k");
        session.variants.push(Variant::new("C1", column.clone()));
        session.variants.push(Variant::new("C1", column));
        save_session(&session, &path).unwrap();

        let err = load_session(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_load_with_lock_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        save_session(&Session::new("Test", "frame.$2k"), &path).unwrap();

        let (loaded, lock_info) = load_session_with_lock_check(&path).unwrap();
        assert_eq!(loaded.variant_count(), 0);
        assert!(lock_info.is_none());
    }
}

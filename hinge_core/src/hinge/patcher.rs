//! Writes hinge records into a model text file on disk.
//!
//! One patch is a locked read-modify-write: acquire the file lock, read the
//! whole file, upsert the record in memory, then replace the file atomically.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::document::ModelDocument;
use super::record::{validate_hinge_name, HingeRecord};
use crate::errors::{CalcError, CalcResult};
use crate::file_io::{atomic_write, current_user, FileLock};

/// What a patch changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatchReport {
    pub removed: usize,
    pub inserted: usize,
    pub tables_created: usize,
}

/// The `.$2k` text file next to a model file (same stem)
pub fn s2k_path_for(model_path: &Path) -> PathBuf {
    model_path.with_extension("$2k")
}

/// Replace every line for `hinge_name` in the model file at `path` with `record`.
///
/// # Errors
///
/// * `ModelFileNotFound` - `path` does not exist
/// * `FileLocked` - another writer holds the file
/// * `FileError` - read or write failed
pub fn patch(path: &Path, hinge_name: &str, record: &HingeRecord) -> CalcResult<PatchReport> {
    validate_hinge_name(hinge_name)?;
    if !path.is_file() {
        return Err(CalcError::model_file_not_found(path.display().to_string()));
    }

    let _lock = FileLock::acquire(path, current_user())?;

    let text = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    let mut document = ModelDocument::parse(&text);
    let upsert = document.upsert_hinge(hinge_name, record);
    atomic_write(path, document.serialize().as_bytes())?;

    let report = PatchReport {
        removed: upsert.removed,
        inserted: upsert.inserted,
        tables_created: upsert.tables_created,
    };
    if report.tables_created > 0 {
        debug!(path = %path.display(), tables = report.tables_created, "appended missing hinge tables");
    }
    info!(
        hinge = hinge_name,
        path = %path.display(),
        removed = report.removed,
        inserted = report.inserted,
        "hinge written"
    );
    Ok(report)
}

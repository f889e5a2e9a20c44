//! Durable progress storage
//!
//! The file store uses the atomic write pattern:
//! 1. Write envelope to temp file
//! 2. fsync temp file
//! 3. Rename temp to final (atomic on POSIX)
//! 4. fsync the directory
//!
//! A reader therefore sees either the previous record or the new one,
//! never a torn write. The envelope carries a CRC32 of the progress body
//! so that bit rot is reported instead of silently restarting the hunt.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{ProgressError, ProgressResult};
use super::state::ProgressState;
use crate::crash_point::{maybe_crash, points};

const PROGRESS_FILE_NAME: &str = "progress.json";
const FORMAT_VERSION: u32 = 1;

/// Persistence boundary for hunt progress.
///
/// `save` must be durable when it returns `Ok`.
pub trait ProgressStore: Send + Sync {
    /// Load the last saved progress, or the default when nothing was saved.
    fn load(&self) -> ProgressResult<ProgressState>;

    /// Durably replace the saved progress.
    fn save(&self, state: &ProgressState) -> ProgressResult<()>;
}

/// On-disk envelope around a progress record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgressEnvelope {
    format_version: u32,
    checksum: u32,
    saved_at: DateTime<Utc>,
    progress: ProgressState,
}

fn compute_checksum(state: &ProgressState) -> ProgressResult<u32> {
    let body = serde_json::to_vec(state).map_err(|e| ProgressError::io("serialize", e))?;
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&body);
    Ok(hasher.finalize())
}

/// File-backed progress store at `<data_dir>/metadata/progress.json`.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
    temp_path: PathBuf,
}

impl FileProgressStore {
    pub fn new(data_dir: &Path) -> Self {
        let metadata_dir = data_dir.join("metadata");
        Self {
            path: metadata_dir.join(PROGRESS_FILE_NAME),
            temp_path: metadata_dir.join(format!("{}.tmp", PROGRESS_FILE_NAME)),
        }
    }

    /// Path of the committed progress file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> ProgressResult<ProgressState> {
        if !self.path.exists() {
            return Ok(ProgressState::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| ProgressError::io("read", e))?;

        let envelope: ProgressEnvelope = serde_json::from_str(&content)
            .map_err(|e| ProgressError::Corrupted(format!("unparsable envelope: {}", e)))?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(ProgressError::UnsupportedVersion(envelope.format_version));
        }

        let expected = compute_checksum(&envelope.progress)?;
        if expected != envelope.checksum {
            return Err(ProgressError::Corrupted(format!(
                "checksum mismatch: stored {:08x}, computed {:08x}",
                envelope.checksum, expected
            )));
        }

        Ok(envelope.progress)
    }

    fn save(&self, state: &ProgressState) -> ProgressResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProgressError::io("create metadata dir", e))?;
        }

        let envelope = ProgressEnvelope {
            format_version: FORMAT_VERSION,
            checksum: compute_checksum(state)?,
            saved_at: Utc::now(),
            progress: state.clone(),
        };
        let content =
            serde_json::to_string_pretty(&envelope).map_err(|e| ProgressError::io("serialize", e))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| ProgressError::io("create temp file", e))?;

        file.write_all(content.as_bytes())
            .map_err(|e| ProgressError::io("write temp file", e))?;
        file.sync_all()
            .map_err(|e| ProgressError::io("fsync temp file", e))?;

        maybe_crash(points::PROGRESS_AFTER_FSYNC);

        fs::rename(&self.temp_path, &self.path).map_err(|e| ProgressError::io("commit", e))?;

        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }
}

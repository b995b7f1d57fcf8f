//! # Snapshot Sink
//!
//! Durable persistence of the latest telemetry snapshot.
//!
//! The file-backed implementation always replaces the target atomically:
//! the snapshot is written to a temp file in the target directory, synced,
//! and renamed over the previous document. A concurrent reader either sees
//! the old complete document or the new complete document, never a torn
//! write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::TelemetrySnapshot;
use crate::error::SinkError;

/// Capability for durably persisting one snapshot per tick
///
/// `publish` is a blocking call executed synchronously within the sampling
/// tick. Implementations must contain their failures in [`SinkError`]; the
/// caller decides whether to keep sampling.
pub trait SnapshotSink {
    /// Persist the snapshot, replacing any previous one
    fn publish(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError>;
}

/// File-backed snapshot sink producing a pretty-printed JSON document
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Create a sink targeting `path`, creating the parent directory if
    /// absent
    ///
    /// Directory creation happens once here, not on the per-tick path.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the parent directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sim_bridge::telemetry::sink::JsonFileSink;
    ///
    /// let sink = JsonFileSink::create("data/telemetry.json")?;
    /// # Ok::<(), sim_bridge::error::SinkError>(())
    /// ```
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(target_dir(&path))?;
        Ok(Self { path })
    }

    /// Get the target path of this sink
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for JsonFileSink {
    fn publish(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError> {
        let json = serde_json::to_vec_pretty(snapshot)?;

        // Temp file must live in the target directory so the rename stays
        // on one filesystem
        let mut tmp = tempfile::NamedTempFile::new_in(target_dir(&self.path))?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| SinkError::Io(e.error))?;

        debug!("Published snapshot to {}", self.path.display());
        Ok(())
    }
}

/// Directory the target file lives in, defaulting to the working directory
fn target_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

//! Filesystem cache store
//!
//! The cache directory is a flat namespace of `<key><extension>` files.
//! Existence of the expected file is the only coherency signal.

use crate::error::{PreviewError, PreviewResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Format bytes as human-readable size (e.g., "1.5 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Path of the artifact `<cache_dir>/<key><extension>`
pub fn artifact_path(cache_dir: &Path, key: &str, extension: &str) -> PathBuf {
    cache_dir.join(format!("{}{}", key, extension))
}

/// Write an artifact through a temp file in the same directory, then rename
/// it onto `target`.
///
/// `write` receives the temp path (which carries the target's extension so
/// format-sniffing encoders behave). Readers never observe a partial file.
pub fn publish_atomically<F>(target: &Path, write: F) -> PreviewResult<()>
where
    F: FnOnce(&Path) -> PreviewResult<()>,
{
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let suffix = target
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let temp = tempfile::Builder::new()
        .prefix(".partial-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| PreviewError::io(format!("creating temp file in {}", dir.display()), e))?;

    write(temp.path())?;

    temp.persist(target).map_err(|e| {
        PreviewError::io(format!("publishing {}", target.display()), e.error)
    })?;
    debug!("Published {}", target.display());
    Ok(())
}

/// Summary of the artifacts currently in a cache directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheInventory {
    /// Artifact count per extension (without the dot)
    pub by_extension: BTreeMap<String, usize>,
    /// Total number of artifacts
    pub artifacts: usize,
    /// Total size in bytes
    pub total_bytes: u64,
}

/// Handle on a cache directory
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Wrap a cache directory path (no IO)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the directory if it is missing.
    ///
    /// Failure is logged and swallowed: the store stays usable if the
    /// directory already exists or can be created later.
    pub fn ensure_dir(&self) -> bool {
        match fs::create_dir_all(&self.dir) {
            Ok(()) => true,
            Err(e) => {
                error!("Can't create cache folder {}: {}", self.dir.display(), e);
                false
            }
        }
    }

    /// The cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path where the artifact for `key` + `extension` lives
    pub fn artifact_path(&self, key: &str, extension: &str) -> PathBuf {
        artifact_path(&self.dir, key, extension)
    }

    /// Whether the artifact for `key` + `extension` exists
    pub fn exists(&self, key: &str, extension: &str) -> bool {
        self.artifact_path(key, extension).exists()
    }

    /// Scan the directory and summarise its artifacts.
    ///
    /// Leftover temp files from interrupted builds are not counted.
    pub fn inventory(&self) -> PreviewResult<CacheInventory> {
        let mut inventory = CacheInventory::default();
        if !self.dir.exists() {
            return Ok(inventory);
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            PreviewError::io(format!("reading cache directory {}", self.dir.display()), e)
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| PreviewError::io("reading cache entry", e))?;
            let path = entry.path();
            if !path.is_file() || entry.file_name().to_string_lossy().starts_with(".partial-") {
                continue;
            }

            let metadata = entry
                .metadata()
                .map_err(|e| PreviewError::io(format!("reading {}", path.display()), e))?;
            let ext = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_default();

            *inventory.by_extension.entry(ext).or_insert(0) += 1;
            inventory.artifacts += 1;
            inventory.total_bytes += metadata.len();
        }

        Ok(inventory)
    }
}

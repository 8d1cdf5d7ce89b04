use crate::error::{CateringError, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Mutual-exclusion guard around record writes
///
/// Two layers: an in-process mutex serialises refresher tasks sharing one store,
/// and an exclusive `fs2` lock on a sidecar file serialises separate processes
/// writing the same data file. In-memory stores use the mutex only.
#[derive(Debug)]
pub struct WriteGuard {
    lock: Mutex<()>,
    lock_file: Option<PathBuf>,
}

impl WriteGuard {
    /// Guard with no file lock
    pub fn in_process() -> Self {
        Self {
            lock: Mutex::new(()),
            lock_file: None,
        }
    }

    /// Guard that also locks `<data file>.lock`
    pub fn for_file(data_path: &Path) -> Self {
        let mut lock_path = data_path.as_os_str().to_owned();
        lock_path.push(".lock");
        Self {
            lock: Mutex::new(()),
            lock_file: Some(PathBuf::from(lock_path)),
        }
    }

    pub fn lock_path(&self) -> Option<&Path> {
        self.lock_file.as_deref()
    }

    /// Run `write` while holding both locks
    pub fn with_lock<T>(&self, write: impl FnOnce() -> Result<T>) -> Result<T> {
        let _held = self
            .lock
            .lock()
            .map_err(|e| CateringError::Lock(format!("write guard poisoned: {}", e)))?;

        let Some(path) = &self.lock_file else {
            return write();
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        #[allow(clippy::suspicious_open_options)]
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| CateringError::Lock(format!("failed to open {:?}: {}", path, e)))?;

        file.lock_exclusive()
            .map_err(|e| CateringError::Lock(format!("failed to lock {:?}: {}", path, e)))?;
        debug!("Acquired store lock: {:?}", path);

        let result = write();

        if let Err(e) = FileExt::unlock(&file) {
            debug!("Failed to release store lock {:?}: {}", path, e);
        }
        result
    }
}

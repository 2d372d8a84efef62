use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use nestrec_types::AssetHandle;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{TranscodeError, TranscodeResult};

/// A reference to a file that already exists outside the store.
///
/// Unlike a binary payload, the contents are not copied when encoding: the
/// asset handle points at the file itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileUrl(pub PathBuf);

impl FileUrl {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Writes binary payloads to uniquely named files and hands out handles.
///
/// Each payload gets its own file under the staging directory. The file is
/// created as a temporary and only kept once the write has fully succeeded;
/// a failed write removes it again.
///
/// A [`tracked`](Self::tracked) stager also remembers every file it kept,
/// so a caller that abandons the work can [`discard`](Self::discard) them.
#[derive(Clone, Debug)]
pub struct AssetStager {
    dir: PathBuf,
    journal: Option<Arc<Mutex<Vec<PathBuf>>>>,
}

impl AssetStager {
    /// Stage under the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            journal: None,
        }
    }

    /// Same directory, with a fresh journal of staged files.
    pub fn tracked(&self) -> Self {
        Self {
            dir: self.dir.clone(),
            journal: Some(Arc::default()),
        }
    }

    /// Files staged through this stager's journal so far.
    pub fn staged(&self) -> Vec<PathBuf> {
        self.journal
            .as_ref()
            .and_then(|journal| journal.lock().ok().map(|paths| paths.clone()))
            .unwrap_or_default()
    }

    /// Remove every file recorded in the journal and clear it.
    ///
    /// Returns how many files were removed. Untracked stagers remove
    /// nothing.
    pub fn discard(&self) -> usize {
        let Some(journal) = &self.journal else {
            return 0;
        };
        let paths = match journal.lock() {
            Ok(mut paths) => std::mem::take(&mut *paths),
            Err(_) => {
                warn!(dir = %self.dir.display(), "asset journal poisoned; staged files left behind");
                return 0;
            }
        };
        let mut removed = 0;
        for path in paths {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "cannot remove staged asset"),
            }
        }
        debug!(removed, "discarded staged assets");
        removed
    }

    /// Stage under the OS temporary directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` to a fresh file and return a handle to it.
    pub fn stage(&self, data: &[u8]) -> TranscodeResult<AssetHandle> {
        let io_err = |source| TranscodeError::Asset {
            path: self.dir.clone(),
            source,
        };
        let mut file = tempfile::Builder::new()
            .prefix("nestrec-")
            .suffix("_file.bin")
            .tempfile_in(&self.dir)
            .map_err(io_err)?;
        file.write_all(data).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        let (_, path) = file.keep().map_err(|e| io_err(e.error))?;
        if let Some(journal) = &self.journal {
            if let Ok(mut paths) = journal.lock() {
                paths.push(path.clone());
            }
        }
        debug!(path = %path.display(), bytes = data.len(), "staged asset");
        Ok(AssetHandle::new(path))
    }

    /// Read the contents behind a handle.
    pub fn read(handle: &AssetHandle) -> TranscodeResult<Vec<u8>> {
        std::fs::read(handle.path()).map_err(|source| TranscodeError::Asset {
            path: handle.path.clone(),
            source,
        })
    }
}

impl Default for AssetStager {
    fn default() -> Self {
        Self::in_temp_dir()
    }
}

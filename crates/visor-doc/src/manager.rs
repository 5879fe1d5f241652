use std::path::{Path, PathBuf};

use tracing::debug;

use visor_common::{DocError, Result};

/// Seam to the host's file storage.
///
/// `rename` has overwrite semantics: renaming onto an existing path
/// replaces it.
pub trait DocumentManager: Send + Sync {
    fn rename(&self, old: &str, new: &str) -> Result<()>;
    fn persist(&self, path: &str, text: &str) -> Result<()>;
}

/// Filesystem-backed document manager. Paths are resolved relative to a
/// root directory.
pub struct FsDocumentManager {
    root: PathBuf,
}

impl FsDocumentManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(Path::new(path))
    }
}

impl DocumentManager for FsDocumentManager {
    fn rename(&self, old: &str, new: &str) -> Result<()> {
        let from = self.resolve(old);
        let to = self.resolve(new);
        // std::fs::rename replaces the target on Unix; remove first so the
        // overwrite contract holds on every platform.
        if to.exists() {
            std::fs::remove_file(&to).map_err(|source| DocError::Rename {
                old: old.to_string(),
                new: new.to_string(),
                source,
            })?;
        }
        std::fs::rename(&from, &to).map_err(|source| DocError::Rename {
            old: old.to_string(),
            new: new.to_string(),
            source,
        })?;
        debug!(old = %old, new = %new, "document renamed");
        Ok(())
    }

    fn persist(&self, path: &str, text: &str) -> Result<()> {
        std::fs::write(self.resolve(path), text).map_err(|source| DocError::Persist {
            path: path.to_string(),
            source,
        })?;
        Ok(())
    }
}

//! Private temporary directory the renderer writes into.
//!
//! A [`Workspace`] is created fresh for every conversion with a random,
//! exclusively-created name, so it can never collide with an existing path.
//! [`Workspace::cleanup`] removes it deepest entries first and only logs what
//! it could not delete. If the workspace is dropped without an explicit
//! cleanup (early return, panic unwinding) `Drop` performs the same removal.

use crate::error::Ofd2JpgError;
use std::io;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};
use walkdir::WalkDir;

const PREFIX: &str = "ofd2jpg-";

/// Exclusive scratch directory for one conversion.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
}

impl Workspace {
    /// Create a workspace under the platform temp root.
    pub fn create() -> Result<Self, Ofd2JpgError> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a workspace under `root`.
    pub fn create_in(root: impl AsRef<Path>) -> Result<Self, Ofd2JpgError> {
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(root)
            .map_err(|source| Ofd2JpgError::WorkspaceCreation { source })?;
        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Delete the workspace and everything in it.
    ///
    /// Returns how many entries could not be removed; each one has already
    /// been reported with `warn!`.
    pub fn cleanup(mut self) -> usize {
        self.remove()
    }

    fn remove(&mut self) -> usize {
        self.remove_with(remove_entry)
    }

    /// Removal loop with the per-entry delete pulled out, so a failing
    /// filesystem can be simulated.
    fn remove_with(
        &mut self,
        mut remove_entry: impl FnMut(&Path, bool) -> io::Result<()>,
    ) -> usize {
        let Some(dir) = self.dir.take() else {
            return 0;
        };
        let mut failures = 0;

        for entry in WalkDir::new(dir.path()).min_depth(1).contents_first(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("can't walk temp dir: {e}");
                    failures += 1;
                    continue;
                }
            };
            if let Err(e) = remove_entry(entry.path(), entry.file_type().is_dir()) {
                warn!("can't delete file '{}': {e}", entry.path().display());
                failures += 1;
            }
        }

        let root = dir.path().to_path_buf();
        if let Err(e) = dir.close() {
            warn!("can't delete temp dir '{}': {e}", root.display());
            failures += 1;
        } else {
            debug!("Removed workspace {}", root.display());
        }
        failures
    }
}

fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_prefixed() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::create_in(root.path()).unwrap();
        let b = Workspace::create_in(root.path()).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        let name = a.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(PREFIX), "{name}");
    }

    #[test]
    fn cleanup_removes_nested_content() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::create_in(root.path()).unwrap();
        let path = ws.path().to_path_buf();
        std::fs::write(path.join("0.jpg"), b"x").unwrap();
        std::fs::create_dir_all(path.join("fonts/cache")).unwrap();
        std::fs::write(path.join("fonts/cache/a.ttf"), b"x").unwrap();

        assert_eq!(ws.cleanup(), 0);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn drop_also_removes() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let ws = Workspace::create_in(root.path()).unwrap();
            std::fs::write(ws.path().join("1.jpg"), b"x").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn failed_deletes_are_warned_and_counted() {
        let root = tempfile::tempdir().unwrap();
        let mut ws = Workspace::create_in(root.path()).unwrap();
        let path = ws.path().to_path_buf();
        std::fs::write(path.join("0.jpg"), b"x").unwrap();
        std::fs::write(path.join("locked.jpg"), b"x").unwrap();

        let (failures, warnings) = crate::pipeline::count_warnings(|| {
            ws.remove_with(|entry, is_dir| {
                if entry.ends_with("locked.jpg") {
                    Err(io::Error::from(io::ErrorKind::PermissionDenied))
                } else {
                    remove_entry(entry, is_dir)
                }
            })
        });

        // The final recursive close of the root still sweeps the leftover.
        assert_eq!(failures, 1);
        assert_eq!(warnings, 1);
        assert!(!path.exists());

        // Already released: dropping afterwards does nothing more.
        let (_, warnings) = crate::pipeline::count_warnings(|| drop(ws));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn missing_root_is_an_environment_error() {
        let root = tempfile::tempdir().unwrap();
        let err = Workspace::create_in(root.path().join("gone")).unwrap_err();
        assert!(matches!(err, Ofd2JpgError::WorkspaceCreation { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}

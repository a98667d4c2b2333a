//! Output directory resolution.
//!
//! A requested directory is honoured only if it already exists. Anything else
//! (no request, a blank string, a missing path, a regular file) silently falls
//! back to the directory holding the source document.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Pick the directory final images are written to.
///
/// `source` should already be absolute. This function never touches the
/// filesystem beyond a metadata lookup on `requested`.
pub fn resolve_output_dir(source: &Path, requested: Option<&Path>) -> PathBuf {
    let fallback = || {
        source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    };

    let Some(requested) = requested else {
        return fallback();
    };
    if requested.as_os_str().to_string_lossy().trim().is_empty() {
        return fallback();
    }

    match std::path::absolute(requested) {
        Ok(dir) if dir.is_dir() => dir,
        _ => {
            debug!(
                "Output directory '{}' is not an existing directory; using the source directory",
                requested.display()
            );
            fallback()
        }
    }
}

//! Source validation: make sure the path names a readable OFD package.
//!
//! An OFD document is a ZIP container, so the first four bytes must be the
//! local-file-header signature `PK\x03\x04`. Checking this up front gives the
//! user a meaningful error instead of whatever the renderer prints for
//! garbage input.

use crate::error::Ofd2JpgError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// ZIP local file header signature.
pub const OFD_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// Resolve `path` to an absolute path and validate it as an OFD source.
pub fn resolve_source(path: &Path) -> Result<PathBuf, Ofd2JpgError> {
    let path = std::path::absolute(path).map_err(|e| {
        Ofd2JpgError::Internal(format!("cannot resolve '{}': {e}", path.display()))
    })?;

    if !path.is_file() {
        return Err(Ofd2JpgError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && magic != OFD_MAGIC {
                return Err(Ofd2JpgError::NotAnOfd { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Ofd2JpgError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Ofd2JpgError::FileNotFound { path });
        }
    }

    debug!("Resolved local OFD: {}", path.display());
    Ok(path)
}

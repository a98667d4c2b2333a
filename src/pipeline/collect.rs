//! Discover and order the page images left in the workspace.
//!
//! The renderer names each page `<index>.jpg`. Ordering is by the parsed
//! integer, never by the string, so `2.jpg` comes before `10.jpg`. Files that
//! do not follow the naming convention are skipped with a warning. Files that
//! do, but do not start with a JPEG signature, abort the conversion.

use crate::error::Ofd2JpgError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static RE_PAGE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(\d+)\.jpe?g$").unwrap());

/// One rendered page waiting in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// Page index as written by the renderer.
    pub index: u64,
    pub path: PathBuf,
}

/// Parse the page index out of a file name like `12.jpg`.
pub fn page_index(file_name: &str) -> Option<u64> {
    let caps = RE_PAGE_NAME.captures(file_name)?;
    caps[1].parse().ok()
}

/// List, validate and sort the page images in `dir`.
///
/// # Errors
/// - [`Ofd2JpgError::WorkspaceRead`] if the directory cannot be listed
/// - [`Ofd2JpgError::InvalidPageImage`] if a page file is not a JPEG
/// - [`Ofd2JpgError::NoPagesGenerated`] if nothing matched
pub fn collect_page_images(dir: &Path) -> Result<Vec<PageImage>, Ofd2JpgError> {
    let read_err = |source| Ofd2JpgError::WorkspaceRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(index) = name.to_str().and_then(page_index) else {
            warn!("Ignoring workspace entry {:?}", name);
            continue;
        };
        pages.push(PageImage {
            index,
            path: entry.path(),
        });
    }

    if pages.is_empty() {
        return Err(Ofd2JpgError::NoPagesGenerated);
    }

    pages.sort_by_key(|p| p.index);
    for page in &pages {
        ensure_jpeg(&page.path)?;
    }
    debug!("Collected {} page images", pages.len());
    Ok(pages)
}

/// Check the file header against the JPEG signature.
fn ensure_jpeg(path: &Path) -> Result<(), Ofd2JpgError> {
    let invalid = || Ofd2JpgError::InvalidPageImage {
        path: path.to_path_buf(),
    };

    let mut header = Vec::with_capacity(16);
    std::fs::File::open(path)
        .and_then(|f| f.take(16).read_to_end(&mut header))
        .map_err(|e| {
            warn!("can't read page image '{}': {e}", path.display());
            invalid()
        })?;

    match image::guess_format(&header) {
        Ok(image::ImageFormat::Jpeg) => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn write_pages(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), JPEG_HEADER).unwrap();
        }
    }

    #[test]
    fn page_index_parsing() {
        assert_eq!(page_index("0.jpg"), Some(0));
        assert_eq!(page_index("17.JPG"), Some(17));
        assert_eq!(page_index("3.jpeg"), Some(3));
        assert_eq!(page_index("cover.jpg"), None);
        assert_eq!(page_index("1.png"), None);
        assert_eq!(page_index("1.jpg.tmp"), None);
        assert_eq!(page_index(".jpg"), None);
    }

    #[test]
    fn sorts_numerically_not_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..12).map(|i| format!("{i}.jpg")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        write_pages(dir.path(), &refs);

        let pages = collect_page_images(dir.path()).unwrap();
        let order: Vec<u64> = pages.iter().map(|p| p.index).collect();
        assert_eq!(order, (0..12).collect::<Vec<u64>>());
    }

    #[test]
    fn ignores_foreign_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(dir.path(), &["2.jpg", "10.jpg"]);
        std::fs::write(dir.path().join("render.log"), b"ok").unwrap();
        std::fs::create_dir(dir.path().join("5.jpg.d")).unwrap();

        let (pages, warnings) =
            crate::pipeline::count_warnings(|| collect_page_images(dir.path()).unwrap());
        let order: Vec<u64> = pages.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![2, 10]);
        // Only the stray file is reported; subdirectories are passed over.
        assert_eq!(warnings, 1);
    }

    #[test]
    fn empty_workspace_is_no_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let err = collect_page_images(dir.path()).unwrap_err();
        assert!(matches!(err, Ofd2JpgError::NoPagesGenerated));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn non_jpeg_page_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(dir.path(), &["0.jpg"]);
        std::fs::write(dir.path().join("1.jpg"), b"\x89PNG\r\n\x1a\n").unwrap();
        let err = collect_page_images(dir.path()).unwrap_err();
        match err {
            Ofd2JpgError::InvalidPageImage { path } => assert!(path.ends_with("1.jpg")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreadable_workspace_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_page_images(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Ofd2JpgError::WorkspaceRead { .. }));
    }
}

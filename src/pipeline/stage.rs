//! Move rendered pages to their final names.
//!
//! Naming: a single page becomes `<source file name>.jpg`; several pages
//! become `<source file name>-<N>.jpg` where `N` is the zero-based position in
//! page order. Existing files are overwritten. Staging is not transactional:
//! if a move fails, pages moved before it stay in place.

use crate::error::Ofd2JpgError;
use crate::pipeline::collect::PageImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Final file name for the page at `position` out of `total`.
pub fn output_file_name(base_name: &str, position: usize, total: usize, extension: &str) -> String {
    if total == 1 {
        format!("{base_name}.{extension}")
    } else {
        format!("{base_name}-{position}.{extension}")
    }
}

/// Move every page into `out_dir` and return the final paths in order.
pub fn stage_pages(
    pages: &[PageImage],
    base_name: &str,
    out_dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, Ofd2JpgError> {
    let mut staged = Vec::with_capacity(pages.len());
    for (position, page) in pages.iter().enumerate() {
        let target = out_dir.join(output_file_name(base_name, position, pages.len(), extension));
        move_file(&page.path, &target).map_err(|source| Ofd2JpgError::StageFailed {
            from: page.path.clone(),
            to: target.clone(),
            source,
        })?;
        debug!("Staged page {} → {}", page.index, target.display());
        staged.push(target);
    }
    info!("Wrote {} images to {}", staged.len(), out_dir.display());
    Ok(staged)
}

/// Rename, falling back to copy + delete when the rename cannot work
/// (typically when the temp dir lives on another filesystem).
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!(
                "rename {} → {} failed ({rename_err}); copying instead",
                from.display(),
                to.display()
            );
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(dir: &Path, index: u64) -> PageImage {
        let path = dir.join(format!("{index}.jpg"));
        std::fs::write(&path, format!("page {index}")).unwrap();
        PageImage { index, path }
    }

    #[test]
    fn single_page_keeps_plain_name() {
        assert_eq!(output_file_name("report.ofd", 0, 1, "jpg"), "report.ofd.jpg");
    }

    #[test]
    fn multi_page_uses_position_suffix() {
        let names: Vec<String> = (0..3)
            .map(|i| output_file_name("report.ofd", i, 3, "jpg"))
            .collect();
        assert_eq!(
            names,
            vec!["report.ofd-0.jpg", "report.ofd-1.jpg", "report.ofd-2.jpg"]
        );
    }

    #[test]
    fn position_not_page_index_drives_the_suffix() {
        let ws = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let pages = vec![page(ws.path(), 1), page(ws.path(), 7)];

        let staged = stage_pages(&pages, "a.ofd", out.path(), "jpg").unwrap();
        assert_eq!(
            staged,
            vec![out.path().join("a.ofd-0.jpg"), out.path().join("a.ofd-1.jpg")]
        );
        assert_eq!(std::fs::read_to_string(&staged[1]).unwrap(), "page 7");
        assert!(!pages[0].path.exists());
    }

    #[test]
    fn existing_output_is_overwritten() {
        let ws = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(out.path().join("a.ofd.jpg"), "stale").unwrap();

        let pages = vec![page(ws.path(), 0)];
        stage_pages(&pages, "a.ofd", out.path(), "jpg").unwrap();
        assert_eq!(
            std::fs::read_to_string(out.path().join("a.ofd.jpg")).unwrap(),
            "page 0"
        );
    }

    #[test]
    fn missing_destination_is_a_stage_failure() {
        let ws = tempfile::tempdir().unwrap();
        let out = ws.path().join("no-such-dir");
        let pages = vec![page(ws.path(), 0), page(ws.path(), 1)];

        let err = stage_pages(&pages, "a.ofd", &out, "jpg").unwrap_err();
        assert!(matches!(err, Ofd2JpgError::StageFailed { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}

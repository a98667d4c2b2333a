//! The renderer seam.
//!
//! Parsing and rasterising OFD pages is someone else's job. This module
//! defines the small surface the orchestrator needs from that collaborator:
//! open a document, export every page as an image into a directory, answer a
//! few metadata queries, and close. [`crate::pipeline::engine::CommandRenderer`]
//! is the production implementation; tests plug in in-process fakes.
//!
//! Open handles are always wrapped in a [`DocumentGuard`], which closes the
//! document exactly once when it goes out of scope, error paths included.

use crate::error::Ofd2JpgError;
use crate::output::{DocMetadata, DocumentInfo};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::{debug, warn};

/// Millimetres per inch; the renderer measures density in pixels per mm.
const MM_PER_INCH: f64 = 25.4;

/// Convert dots per inch into the renderer's pixels per millimetre.
pub fn density_from_dpi(dpi: u32) -> f64 {
    f64::from(dpi) / MM_PER_INCH
}

/// Image format requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jpeg,
}

impl ExportFormat {
    /// Name passed to the renderer.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "JPG",
        }
    }

    /// Extension of the final output files.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// Something that can open OFD documents.
pub trait DocumentRenderer {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, Ofd2JpgError>;
}

/// An open OFD document.
pub trait Document {
    /// Write one image per page into `dest`, named `<page index>.<ext>`.
    fn export_pages(
        &mut self,
        dest: &Path,
        format: ExportFormat,
        density: f64,
    ) -> Result<(), Ofd2JpgError>;

    fn page_count(&mut self) -> Result<usize, Ofd2JpgError>;

    fn fonts(&mut self) -> Result<Vec<String>, Ofd2JpgError>;

    fn metadata(&mut self) -> Result<DocMetadata, Ofd2JpgError>;

    /// Release renderer-held resources. Called once, by [`DocumentGuard`].
    fn close(&mut self) -> Result<(), Ofd2JpgError>;

    /// Gather everything `--info` prints.
    fn info(&mut self) -> Result<DocumentInfo, Ofd2JpgError> {
        Ok(DocumentInfo {
            page_count: self.page_count()?,
            fonts: self.fonts()?,
            doc_info: self.metadata()?,
        })
    }
}

/// Scoped handle: closes the wrapped document when dropped.
pub struct DocumentGuard {
    inner: Box<dyn Document>,
}

impl DocumentGuard {
    /// Open `path` with `renderer`.
    pub fn open(renderer: &dyn DocumentRenderer, path: &Path) -> Result<Self, Ofd2JpgError> {
        let inner = renderer.open(path)?;
        debug!("Opened {}", path.display());
        Ok(Self { inner })
    }
}

impl Deref for DocumentGuard {
    type Target = dyn Document;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DerefMut for DocumentGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.as_mut()
    }
}

impl Drop for DocumentGuard {
    fn drop(&mut self) {
        if let Err(e) = self.inner.close() {
            warn!("can't close OFD document: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        closes: Rc<Cell<usize>>,
        fail_export: bool,
    }

    impl Document for Counting {
        fn export_pages(&mut self, _: &Path, _: ExportFormat, _: f64) -> Result<(), Ofd2JpgError> {
            if self.fail_export {
                Err(Ofd2JpgError::Internal("export exploded".into()))
            } else {
                Ok(())
            }
        }
        fn page_count(&mut self) -> Result<usize, Ofd2JpgError> {
            Ok(4)
        }
        fn fonts(&mut self) -> Result<Vec<String>, Ofd2JpgError> {
            Ok(vec!["SimSun".into()])
        }
        fn metadata(&mut self) -> Result<DocMetadata, Ofd2JpgError> {
            Ok(DocMetadata::default())
        }
        fn close(&mut self) -> Result<(), Ofd2JpgError> {
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }
    }

    struct Opener {
        closes: Rc<Cell<usize>>,
        fail_export: bool,
    }

    impl DocumentRenderer for Opener {
        fn open(&self, _: &Path) -> Result<Box<dyn Document>, Ofd2JpgError> {
            Ok(Box::new(Counting {
                closes: Rc::clone(&self.closes),
                fail_export: self.fail_export,
            }))
        }
    }

    #[test]
    fn density_is_pixels_per_millimetre() {
        assert!((density_from_dpi(254) - 10.0).abs() < 1e-9);
        assert!((density_from_dpi(300) - 11.811_023_622).abs() < 1e-6);
    }

    #[test]
    fn guard_closes_exactly_once_on_success() {
        let closes = Rc::new(Cell::new(0));
        let opener = Opener { closes: Rc::clone(&closes), fail_export: false };
        {
            let mut doc = DocumentGuard::open(&opener, Path::new("a.ofd")).unwrap();
            doc.export_pages(Path::new("/tmp"), ExportFormat::Jpeg, 1.0).unwrap();
            assert_eq!(doc.info().unwrap().page_count, 4);
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn guard_closes_when_export_fails() {
        let closes = Rc::new(Cell::new(0));
        let opener = Opener { closes: Rc::clone(&closes), fail_export: true };
        let result = (|| {
            let mut doc = DocumentGuard::open(&opener, Path::new("a.ofd"))?;
            doc.export_pages(Path::new("/tmp"), ExportFormat::Jpeg, 1.0)
        })();
        assert!(result.is_err());
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn jpeg_format_names() {
        assert_eq!(ExportFormat::Jpeg.as_str(), "JPG");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
    }
}

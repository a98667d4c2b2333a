//! External-process renderer backend.
//!
//! Rasterising OFD pages is delegated to a separate program (by default
//! `ofdrw-render` on `PATH`, override with `OFD2JPG_RENDERER`). It is driven
//! through two subcommands:
//!
//! ```text
//! <program> export --format JPG --ppm <pixels-per-mm> <source> <dest-dir>
//! <program> info <source>            # prints DocumentInfo as JSON on stdout
//! ```
//!
//! A non-zero exit is a render failure carrying the program's stderr. Failing
//! to start the program at all is an environment problem and is reported as
//! such. The child is waited on synchronously; there is no timeout.

use crate::error::Ofd2JpgError;
use crate::output::{DocMetadata, DocumentInfo};
use crate::pipeline::render::{Document, DocumentRenderer, ExportFormat};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

/// Environment variable naming the renderer program.
pub const RENDERER_ENV: &str = "OFD2JPG_RENDERER";

/// Program used when [`RENDERER_ENV`] is unset.
pub const DEFAULT_RENDERER: &str = "ofdrw-render";

/// Renderer that shells out to an external program.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: OsString,
}

impl CommandRenderer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `OFD2JPG_RENDERER` if set and non-empty, else [`DEFAULT_RENDERER`].
    pub fn from_env() -> Self {
        match std::env::var_os(RENDERER_ENV) {
            Some(p) if !p.is_empty() => Self::new(p),
            _ => Self::new(DEFAULT_RENDERER),
        }
    }

    pub fn program(&self) -> &Path {
        Path::new(&self.program)
    }
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DocumentRenderer for CommandRenderer {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, Ofd2JpgError> {
        Ok(Box::new(CommandDocument {
            program: self.program.clone(),
            path: path.to_path_buf(),
            info: None,
        }))
    }
}

/// A document "opened" by the external renderer.
///
/// The child process owns the real handle for the duration of each call, so
/// there is nothing to release on close. `info` output is cached so the three
/// metadata queries cost one process launch.
struct CommandDocument {
    program: OsString,
    path: PathBuf,
    info: Option<DocumentInfo>,
}

impl CommandDocument {
    fn run(&self, args: &[OsString]) -> Result<Output, Ofd2JpgError> {
        debug!("Running {:?} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| Ofd2JpgError::RendererUnavailable {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = match stderr.trim() {
                "" => format!("renderer exited with {}", output.status),
                msg => format!("renderer exited with {}: {msg}", output.status),
            };
            return Err(Ofd2JpgError::RenderFailed {
                path: self.path.clone(),
                detail,
            });
        }
        Ok(output)
    }

    fn load_info(&mut self) -> Result<&DocumentInfo, Ofd2JpgError> {
        if self.info.is_none() {
            let output = self.run(&["info".into(), self.path.clone().into()])?;
            let parsed: DocumentInfo =
                serde_json::from_slice(&output.stdout).map_err(|e| Ofd2JpgError::RenderFailed {
                    path: self.path.clone(),
                    detail: format!("renderer printed malformed info JSON: {e}"),
                })?;
            self.info = Some(parsed);
        }
        self.info
            .as_ref()
            .ok_or_else(|| Ofd2JpgError::Internal("document info cache is empty".into()))
    }
}

impl Document for CommandDocument {
    fn export_pages(
        &mut self,
        dest: &Path,
        format: ExportFormat,
        density: f64,
    ) -> Result<(), Ofd2JpgError> {
        info!(
            "Exporting {} as {} at {:.3} px/mm",
            self.path.display(),
            format.as_str(),
            density
        );
        let args: Vec<OsString> = vec![
            "export".into(),
            "--format".into(),
            format.as_str().into(),
            "--ppm".into(),
            density.to_string().into(),
            self.path.clone().into(),
            dest.to_path_buf().into(),
        ];
        self.run(&args).map(|_| ())
    }

    fn page_count(&mut self) -> Result<usize, Ofd2JpgError> {
        Ok(self.load_info()?.page_count)
    }

    fn fonts(&mut self) -> Result<Vec<String>, Ofd2JpgError> {
        Ok(self.load_info()?.fonts.clone())
    }

    fn metadata(&mut self) -> Result<DocMetadata, Ofd2JpgError> {
        Ok(self.load_info()?.doc_info.clone())
    }

    fn close(&mut self) -> Result<(), Ofd2JpgError> {
        self.info = None;
        Ok(())
    }
}

//! Error types for the ofd2jpg library.
//!
//! Every failure funnels into [`Ofd2JpgError`]. Each variant belongs to one
//! [`ErrorClass`], and the class decides the process exit code:
//!
//! | Class         | Exit | Examples                                           |
//! |---------------|------|----------------------------------------------------|
//! | `Usage`       | 1    | bad flags, invalid builder configuration           |
//! | `Conversion`  | 2    | renderer failure, no page images, move failure     |
//! | `Source`      | 3    | source missing, unreadable, not an OFD package     |
//! | `Environment` | 3    | temp workspace cannot be created, renderer missing |
//! | `Unexpected`  | 3    | anything else                                      |
//!
//! `--info` reports a `Source` failure with exit 1 instead; see
//! [`ErrorClass::info_exit_code`].
//!
//! Cleanup problems never become errors; they are logged with `tracing::warn!`
//! and leave the outcome untouched.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ofd2jpg library.
#[derive(Debug, Error)]
pub enum Ofd2JpgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source file was not found at the given path.
    #[error("OFD file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the source file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not an OFD (ZIP) package.
    #[error("File is not a valid OFD package: '{path}'\nFirst bytes: {magic:?}")]
    NotAnOfd { path: PathBuf, magic: [u8; 4] },

    // ── Environment errors ────────────────────────────────────────────────
    /// The temporary workspace could not be created.
    #[error("can't create tmp dir: {source}")]
    WorkspaceCreation {
        #[source]
        source: std::io::Error,
    },

    /// The external renderer program could not be started.
    #[error(
        "Failed to start OFD renderer '{program}': {source}\n\
Install the renderer or point OFD2JPG_RENDERER at it."
    )]
    RendererUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The renderer reported a failure.
    #[error("Rendering failed for '{path}': {detail}")]
    RenderFailed { path: PathBuf, detail: String },

    /// The renderer succeeded but left no page images behind.
    #[error("no jpg files generated")]
    NoPagesGenerated,

    /// A file named like a page image does not carry JPEG data.
    #[error("Page image '{path}' is not a JPEG file")]
    InvalidPageImage { path: PathBuf },

    /// The workspace could not be listed after rendering.
    #[error("Failed to read rendered pages from '{path}': {source}")]
    WorkspaceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rendered page could not be moved into the output directory.
    #[error("process file failed: '{from}' → '{to}': {source}")]
    StageFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse category of an [`Ofd2JpgError`], used to pick the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller supplied something unusable.
    Usage,
    /// A classified conversion failure.
    Conversion,
    /// The source document could not be opened.
    Source,
    /// The host environment is missing something the tool needs.
    Environment,
    /// Anything not anticipated above.
    Unexpected,
}

impl ErrorClass {
    /// Process exit status for this class.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorClass::Usage => 1,
            ErrorClass::Conversion => 2,
            ErrorClass::Source | ErrorClass::Environment | ErrorClass::Unexpected => 3,
        }
    }

    /// Exit status when the failure happened while printing document info.
    /// A source that can't be read is reported as a bad argument there.
    pub fn info_exit_code(self) -> u8 {
        match self {
            ErrorClass::Source => 1,
            other => other.exit_code(),
        }
    }
}

impl Ofd2JpgError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Ofd2JpgError::InvalidConfig(_) => ErrorClass::Usage,
            Ofd2JpgError::FileNotFound { .. }
            | Ofd2JpgError::PermissionDenied { .. }
            | Ofd2JpgError::NotAnOfd { .. } => ErrorClass::Source,
            Ofd2JpgError::RenderFailed { .. }
            | Ofd2JpgError::NoPagesGenerated
            | Ofd2JpgError::InvalidPageImage { .. }
            | Ofd2JpgError::WorkspaceRead { .. }
            | Ofd2JpgError::StageFailed { .. } => ErrorClass::Conversion,
            Ofd2JpgError::WorkspaceCreation { .. } | Ofd2JpgError::RendererUnavailable { .. } => {
                ErrorClass::Environment
            }
            Ofd2JpgError::Internal(_) => ErrorClass::Unexpected,
        }
    }

    /// Shorthand for `self.class().exit_code()`.
    pub fn exit_code(&self) -> u8 {
        self.class().exit_code()
    }
}

//! # ofd2jpg
//!
//! Convert OFD documents (the Chinese fixed-layout format, similar in spirit
//! to PDF) into JPEG images, one image per page.
//!
//! Rasterisation is delegated to an external renderer behind the
//! [`DocumentRenderer`] trait. This crate owns the command-line grammar and
//! the staging pipeline around that renderer: a private temp workspace,
//! numeric page ordering, deterministic output names, and cleanup on every
//! exit path.
//!
//! ## Pipeline Overview
//!
//! ```text
//! OFD
//!  │
//!  ├─ 1. Input      check the file exists and is a ZIP/OFD package
//!  ├─ 2. Output dir requested directory if it exists, else beside the source
//!  ├─ 3. Workspace  fresh uniquely-named temp directory
//!  ├─ 4. Render     renderer exports N.jpg per page into the workspace
//!  ├─ 5. Collect    validate and sort pages by N (numerically)
//!  ├─ 6. Stage      move to <name>.jpg or <name>-<i>.jpg, overwriting
//!  └─ 7. Cleanup    remove the workspace, success or not
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ofd2jpg::{convert, CommandRenderer, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder("invoice.ofd").dpi(200).build()?;
//!     let output = convert(&config, &CommandRenderer::from_env())?;
//!     for file in &output.files {
//!         println!("{}", file.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ofd2jpg` binary (anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod args;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use args::{parse_args, Command, UsageError};
pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI};
pub use convert::{convert, inspect};
pub use error::{ErrorClass, Ofd2JpgError};
pub use output::{ConversionOutput, CustomDatum, DocMetadata, DocumentInfo};
pub use pipeline::engine::CommandRenderer;
pub use pipeline::render::{Document, DocumentRenderer, ExportFormat};

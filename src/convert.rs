//! Conversion entry points.
//!
//! [`convert`] runs the whole pipeline for one document; [`inspect`] is the
//! read-only `--info` path, which shares nothing with conversion except
//! opening the document.

use crate::config::ConversionConfig;
use crate::error::Ofd2JpgError;
use crate::output::{ConversionOutput, DocumentInfo};
use crate::pipeline::render::{density_from_dpi, DocumentGuard, DocumentRenderer, ExportFormat};
use crate::pipeline::workspace::Workspace;
use crate::pipeline::{collect, input, output_dir, stage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

const FORMAT: ExportFormat = ExportFormat::Jpeg;

/// Convert an OFD document into one JPEG per page.
///
/// # Errors
/// Returns `Err(Ofd2JpgError)` when:
/// - the source is missing, unreadable or not an OFD package
/// - the temp workspace cannot be created (renderer is never called)
/// - the renderer fails or produces no page images
/// - a page cannot be moved into the output directory
///
/// The workspace is removed before this function returns, whatever the
/// outcome.
pub fn convert(
    config: &ConversionConfig,
    renderer: &dyn DocumentRenderer,
) -> Result<ConversionOutput, Ofd2JpgError> {
    let start = Instant::now();
    info!("Starting conversion: {}", config.source().display());

    // ── Step 1: Resolve source and destination ───────────────────────────
    let source = input::resolve_source(config.source())?;
    let out_dir = output_dir::resolve_output_dir(&source, config.output_dir());
    debug!("Output directory: {}", out_dir.display());

    // ── Step 2: Create workspace ─────────────────────────────────────────
    let workspace = match &config.workspace_root {
        Some(root) => Workspace::create_in(root)?,
        None => Workspace::create()?,
    };

    // ── Steps 3–6: Render, collect, stage ────────────────────────────────
    let density = density_from_dpi(config.dpi);
    let staged = render_and_stage(renderer, &source, workspace.path(), &out_dir, density);

    // ── Step 7: Cleanup (always) ─────────────────────────────────────────
    let failures = workspace.cleanup();
    if failures > 0 {
        debug!("{failures} workspace entries could not be removed");
    }

    let files = staged?;
    let duration_ms = start.elapsed().as_millis() as u64;
    info!("Converted {} pages in {}ms", files.len(), duration_ms);

    Ok(ConversionOutput {
        output_dir: out_dir,
        page_count: files.len(),
        files,
        duration_ms,
    })
}

/// Everything between workspace creation and cleanup.
fn render_and_stage(
    renderer: &dyn DocumentRenderer,
    source: &Path,
    workspace: &Path,
    out_dir: &Path,
    density: f64,
) -> Result<Vec<PathBuf>, Ofd2JpgError> {
    {
        // The document is closed at the end of this block, before staging.
        let mut document = DocumentGuard::open(renderer, source)?;
        document.export_pages(workspace, FORMAT, density)?;
    }

    let pages = collect::collect_page_images(workspace)?;
    let base_name = base_name(source);
    stage::stage_pages(&pages, &base_name, out_dir, FORMAT.extension())
}

/// File name of the source including its extension, e.g. `report.ofd`.
fn base_name(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Read page count, fonts and `DocInfo` without rendering anything.
pub fn inspect(
    source: impl AsRef<Path>,
    renderer: &dyn DocumentRenderer,
) -> Result<DocumentInfo, Ofd2JpgError> {
    let source = input::resolve_source(source.as_ref())?;
    let mut document = DocumentGuard::open(renderer, &source)?;
    let info = document.info()?;
    debug!("{} has {} pages", source.display(), info.page_count);
    Ok(info)
}

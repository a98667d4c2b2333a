//! Configuration for a single OFD-to-JPEG conversion.
//!
//! The CLI fills a [`ConversionConfig`] from the parsed arguments; library
//! callers use [`ConversionConfig::builder`]. The value is never mutated after
//! it has been built.

use crate::error::Ofd2JpgError;
use std::path::{Path, PathBuf};

/// Resolution used when the caller does not pick one.
pub const DEFAULT_DPI: u32 = 300;

/// Configuration for one conversion.
///
/// # Example
/// ```rust
/// use ofd2jpg::ConversionConfig;
///
/// let config = ConversionConfig::builder("invoice.ofd")
///     .dpi(150)
///     .output_dir("/tmp/pages")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Path to the OFD document to convert.
    pub source: PathBuf,

    /// Requested output directory. When `None`, blank, or not an existing
    /// directory, output lands next to the source file.
    pub output_dir: Option<PathBuf>,

    /// Output resolution in dots per inch. Default: 300.
    pub dpi: u32,

    /// Where the temporary workspace is created. `None` uses the platform
    /// temp directory (honours `TMPDIR`).
    pub workspace_root: Option<PathBuf>,
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder(source: impl Into<PathBuf>) -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self {
                source: source.into(),
                output_dir: None,
                dpi: DEFAULT_DPI,
                workspace_root: None,
            },
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn workspace_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.workspace_root = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Ofd2JpgError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(Ofd2JpgError::InvalidConfig(
                "DPI must be a positive integer, got 0".into(),
            ));
        }
        if c.source.as_os_str().is_empty() {
            return Err(Ofd2JpgError::InvalidConfig(
                "source file path is empty".into(),
            ));
        }
        Ok(self.config)
    }
}

//! Command-line grammar for `ofd2jpg`.
//!
//! [`parse_args`] is a pure function from the argument tokens (without the
//! program name) to a [`Command`]. It never prints and never exits; the binary
//! decides what to do with a [`UsageError`].
//!
//! ```text
//! ofd2jpg [options] <OFD file>
//!
//!   --help | -h | -?           show usage           (stops parsing)
//!   --version | -v             show version         (stops parsing)
//!   --info | -i                print document metadata
//!   --dpi=N | -d N | -dN       output resolution    (default 300)
//!   --output=DIR | -o DIR      output directory     (default: beside the source)
//! ```
//!
//! Short options that take a value accept it glued (`-d150`), after `=`
//! (`-d=150`) or as the next token (`-d 150`). Long options only take a value
//! after `=`.

use crate::config::{ConversionConfig, DEFAULT_DPI};
use std::path::PathBuf;
use thiserror::Error;

/// Text printed for `--help`.
pub const HELP: &str = "\
Usage: ofd2jpg [options] <OFD file>
Options:
  -h, --help          Show this help message and exit
  -v, --version       Show version information and exit
  -i, --info          Show OFD DocInfo and exit
  -d, --dpi=DPI       Set the DPI for the output images (default: 300)
  -o, --output=DIR    Set the output directory for the converted images (default: ofd file directory)

Output files are named <OFD file name>.jpg for a single page and
<OFD file name>-<N>.jpg (N starting at 0) when the document has several pages.

Environment:
  OFD2JPG_RENDERER    Renderer program used to rasterise pages (default: ofdrw-render)
  RUST_LOG            Log filter for diagnostics on stderr (default: warn)";

/// Line printed for `--version`.
pub fn version_line() -> String {
    format!("ofd2jpg {}", env!("CARGO_PKG_VERSION"))
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    /// Print document metadata for `source`; no files are written.
    Info { source: PathBuf },
    Convert(ConversionConfig),
}

/// A problem with the command line. Always fatal, exit status 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("missing arguments")]
    MissingArguments,

    #[error("missing OFD file")]
    MissingSource,

    #[error("only one OFD file can be converted at a time (got '{first}' and '{second}')")]
    ExtraSource { first: String, second: String },

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("{option} needs {expected}")]
    MissingValue {
        option: String,
        expected: &'static str,
    },

    #[error("{option} takes no value")]
    UnexpectedValue { option: String },

    #[error("invalid int argument: {0}")]
    InvalidInt(String),

    #[error("DPI must be a positive integer, got 0")]
    ZeroDpi,

    #[error("{0}")]
    Invalid(String),
}

const DPI_VALUE: &str = "a DPI value";
const DIR_VALUE: &str = "a directory path";

/// Parse the argument tokens that follow the program name.
///
/// Help and version flags end parsing immediately, so anything after them is
/// ignored, including tokens that would otherwise be errors.
pub fn parse_args<I, S>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = args.into_iter().map(Into::into).peekable();
    if tokens.peek().is_none() {
        return Err(UsageError::MissingArguments);
    }

    let mut parsed = ParsedArgs::default();
    while let Some(arg) = tokens.next() {
        let flow = if let Some(long) = arg.strip_prefix("--") {
            parsed.long_option(long)?
        } else if let Some(short) = arg.strip_prefix('-') {
            parsed.short_option(short, &mut tokens)?
        } else {
            parsed.set_source(arg)?;
            Flow::Continue
        };
        if let Flow::Stop(command) = flow {
            return Ok(command);
        }
    }
    parsed.finish()
}

enum Flow {
    Continue,
    Stop(Command),
}

#[derive(Debug, Default)]
struct ParsedArgs {
    dpi: Option<u32>,
    output: Option<String>,
    source: Option<String>,
    info: bool,
}

impl ParsedArgs {
    fn long_option(&mut self, body: &str) -> Result<Flow, UsageError> {
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        if matches!(name, "help" | "version" | "info") && value.is_some() {
            return Err(UsageError::UnexpectedValue {
                option: format!("--{name}"),
            });
        }

        match name {
            "help" => return Ok(Flow::Stop(Command::Help)),
            "version" => return Ok(Flow::Stop(Command::Version)),
            "info" => self.info = true,
            "dpi" => {
                let value = require(value.map(str::to_owned), "--dpi", DPI_VALUE)?;
                self.dpi = Some(parse_dpi(&value)?);
            }
            "output" => {
                self.output = Some(require(value.map(str::to_owned), "--output", DIR_VALUE)?);
            }
            other => return Err(UsageError::UnknownOption(format!("--{other}"))),
        }
        Ok(Flow::Continue)
    }

    fn short_option<I>(&mut self, body: &str, rest: &mut I) -> Result<Flow, UsageError>
    where
        I: Iterator<Item = String>,
    {
        let Some(option) = body.chars().next() else {
            return Err(UsageError::UnknownOption("-".into()));
        };
        let glued = &body[option.len_utf8()..];
        let inline = if glued.is_empty() {
            None
        } else {
            Some(glued.strip_prefix('=').unwrap_or(glued).to_owned())
        };

        if matches!(option, 'h' | '?' | 'v' | 'i') && inline.is_some() {
            return Err(UsageError::UnexpectedValue {
                option: format!("-{option}"),
            });
        }

        match option {
            'h' | '?' => return Ok(Flow::Stop(Command::Help)),
            'v' => return Ok(Flow::Stop(Command::Version)),
            'i' => self.info = true,
            'd' => {
                let value = require(inline.or_else(|| rest.next()), "-d", DPI_VALUE)?;
                self.dpi = Some(parse_dpi(&value)?);
            }
            'o' => {
                self.output = Some(require(inline.or_else(|| rest.next()), "-o", DIR_VALUE)?);
            }
            other => return Err(UsageError::UnknownOption(format!("-{other}"))),
        }
        Ok(Flow::Continue)
    }

    fn set_source(&mut self, arg: String) -> Result<(), UsageError> {
        if let Some(first) = &self.source {
            return Err(UsageError::ExtraSource {
                first: first.clone(),
                second: arg,
            });
        }
        self.source = Some(arg);
        Ok(())
    }

    fn finish(self) -> Result<Command, UsageError> {
        let source = self.source.ok_or(UsageError::MissingSource)?;
        if self.info {
            return Ok(Command::Info {
                source: PathBuf::from(source),
            });
        }

        let mut builder = ConversionConfig::builder(source).dpi(self.dpi.unwrap_or(DEFAULT_DPI));
        if let Some(output) = self.output {
            builder = builder.output_dir(output);
        }
        builder
            .build()
            .map(Command::Convert)
            .map_err(|e| UsageError::Invalid(e.to_string()))
    }
}

fn require(
    value: Option<String>,
    option: &str,
    expected: &'static str,
) -> Result<String, UsageError> {
    value.ok_or_else(|| UsageError::MissingValue {
        option: option.to_owned(),
        expected,
    })
}

fn parse_dpi(value: &str) -> Result<u32, UsageError> {
    match value.parse::<u32>() {
        Ok(0) => Err(UsageError::ZeroDpi),
        Ok(dpi) => Ok(dpi),
        Err(_) => Err(UsageError::InvalidInt(value.to_owned())),
    }
}

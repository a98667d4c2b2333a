//! CLI binary for ofd2jpg.
//!
//! A thin shim over the library crate: parse the arguments, dispatch, and
//! map failures to exit codes. This is the only place a process status is
//! decided.
//!
//! | Exit | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | success, help, version, info                             |
//! | 1    | usage error; with `--info`, a source that can't be read  |
//! | 2    | conversion failed                                        |
//! | 3    | source can't be opened, environment, unexpected failure  |

use anyhow::{Context, Result};
use ofd2jpg::args::{version_line, HELP};
use ofd2jpg::{convert, inspect, parse_args, Command, CommandRenderer, ErrorClass, Ofd2JpgError};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // ── Logging setup ────────────────────────────────────────────────────
    // `warn` by default so workspace-cleanup problems always reach stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let tokens = std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned());
    let command = match parse_args(tokens) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("use --help to see usage information");
            return ExitCode::from(ErrorClass::Usage.exit_code());
        }
    };

    let info_mode = matches!(command, Command::Info { .. });
    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err, info_mode),
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Help => println!("{HELP}"),
        Command::Version => println!("{}", version_line()),
        Command::Info { source } => {
            let info = inspect(&source, &CommandRenderer::from_env())
                .context("read OFD file failed")?;
            println!("{info}");
        }
        Command::Convert(config) => {
            convert(&config, &CommandRenderer::from_env()).context("convert failed")?;
            println!("convert success!");
        }
    }
    Ok(())
}

/// Print `err` and pick the exit code from its class.
fn report(err: &anyhow::Error, info_mode: bool) -> ExitCode {
    let class = err
        .downcast_ref::<Ofd2JpgError>()
        .map(Ofd2JpgError::class)
        .unwrap_or(ErrorClass::Unexpected);

    match class {
        // Full debug chain (and backtrace when RUST_BACKTRACE is set).
        ErrorClass::Unexpected => eprintln!("unknown error: {err:?}"),
        _ => eprintln!("{err:#}"),
    }
    if info_mode {
        ExitCode::from(class.info_exit_code())
    } else {
        ExitCode::from(class.exit_code())
    }
}

//! `calcpw` — command-line front-end for the calc.pw password calculation.
//!
//! Three invocation shapes:
//!
//! - `calcpw` — interactive mode: query the master password, then derive
//!   passwords for any number of information strings
//! - `calcpw dieharder <secret> <info>` — stream raw keystream blocks to
//!   stdout for randomness analysis
//! - `calcpw modulobias <secret> <info> [charset]` — stream the bias-free
//!   encoded characters to stdout for distribution analysis
//!
//! Each failure class exits with its own code so conformance harnesses
//! can tell them apart.

mod interactive;

use clap::{Parser, Subcommand};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use calcpw_core::{stream_encoded, stream_raw_keystream, CalcError, Charset, Config};

/// A cryptographic primitive failed.
const EXIT_PRIMITIVE: u8 = 2;
/// Wrong arguments for the dieharder mode.
const EXIT_DIEHARDER_USAGE: u8 = 3;
/// The dieharder mode failed while running.
const EXIT_DIEHARDER_FAILED: u8 = 4;
/// Wrong arguments for the modulobias mode.
const EXIT_MODULOBIAS_USAGE: u8 = 5;
/// The modulobias mode failed while running.
const EXIT_MODULOBIAS_FAILED: u8 = 6;
/// The requested mode does not exist.
const EXIT_UNKNOWN_MODE: u8 = 7;

#[derive(Parser)]
#[command(name = "calcpw")]
#[command(about = "Deterministic password calculation from a master password and a service string")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Stream raw keystream blocks to stdout (randomness validation).
    Dieharder {
        /// Secret master password.
        secret: String,
        /// Service-specific information string.
        info: String,
    },
    /// Stream bias-free encoded characters to stdout (encoding validation).
    Modulobias {
        /// Secret master password.
        secret: String,
        /// Service-specific information string.
        info: String,
        /// Character set override (defaults to "0-9 A-Z a-z").
        charset: Option<String>,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_exit(&err),
    };

    match cli.mode {
        None => interactive::run(),
        Some(Mode::Dieharder { secret, info }) => run_dieharder(&secret, &info),
        Some(Mode::Modulobias {
            secret,
            info,
            charset,
        }) => run_modulobias(&secret, &info, charset.as_deref()),
    }
}

/// Map an argument parsing failure onto the per-mode exit codes.
fn usage_exit(err: &clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    let _ = err.print();
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return ExitCode::SUCCESS;
    }

    match std::env::args().nth(1).as_deref() {
        Some("dieharder") => ExitCode::from(EXIT_DIEHARDER_USAGE),
        Some("modulobias") => ExitCode::from(EXIT_MODULOBIAS_USAGE),
        _ => ExitCode::from(EXIT_UNKNOWN_MODE),
    }
}

/// Stream raw keystream blocks until the sink fails.
fn run_dieharder(secret: &str, info: &str) -> ExitCode {
    tracing::debug!("entering dieharder mode");

    let config = Config::default();
    let stdout = io::stdout();
    let mut sink = io::BufWriter::new(stdout.lock());

    match stream_raw_keystream(secret.as_bytes(), info.as_bytes(), &config, &mut sink) {
        Err(CalcError::Primitive(message)) => primitive_exit(&message),
        Err(err) => {
            eprintln!("ERROR: dieharder mode failed: {err}");
            ExitCode::from(EXIT_DIEHARDER_FAILED)
        }
        Ok(()) => ExitCode::SUCCESS,
    }
}

/// Stream encoded characters until the sink fails.
fn run_modulobias(secret: &str, info: &str, charset: Option<&str>) -> ExitCode {
    tracing::debug!("entering modulobias mode");

    let config = match modulobias_config(charset) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: modulobias mode failed: {err}");
            return ExitCode::from(EXIT_MODULOBIAS_FAILED);
        }
    };

    let stdout = io::stdout();
    let mut sink = io::BufWriter::new(stdout.lock());

    match stream_encoded(secret.as_bytes(), info.as_bytes(), &config, &mut sink) {
        Err(CalcError::Primitive(message)) => primitive_exit(&message),
        Err(err) => {
            eprintln!("ERROR: modulobias mode failed: {err}");
            ExitCode::from(EXIT_MODULOBIAS_FAILED)
        }
        Ok(()) => ExitCode::SUCCESS,
    }
}

/// Default configuration with an optional charset override.
fn modulobias_config(charset: Option<&str>) -> Result<Config, CalcError> {
    match charset {
        Some(string) => {
            let charset = Charset::parse(string)?;
            Config::new(
                calcpw_core::DEFAULT_LENGTH,
                charset,
                false,
                calcpw_core::DEFAULT_ITERATIONS,
            )
        }
        None => Ok(Config::default()),
    }
}

/// Report a fatal primitive failure.
fn primitive_exit(message: &str) -> ExitCode {
    tracing::error!(message, "cryptographic primitive failure");
    eprintln!("ERROR: cryptographic primitive failure: {message}");
    ExitCode::from(EXIT_PRIMITIVE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

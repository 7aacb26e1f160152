//! `forecast` CLI entry point.
//!
//! Fetches the forecast, prints `properties` and the periods for tomorrow, and maps any
//! failure onto a distinct exit code via `to_exit_code`.
use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind as ClapErrorKind, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chisel_forecast::decoders::Encoding;
use chisel_forecast::dom::{Parser as JsonParser, DEFAULT_MAX_DEPTH, MAX_NESTING_LIMIT};
use chisel_forecast::errors::{to_exit_code, Error, ErrorKind};
use chisel_forecast::fetch::{Fetch, FileFetcher, HttpFetcher};
use chisel_forecast::forecast::{self, ReportOptions, DEFAULT_FORECAST_URL};
use chisel_forecast::JsonPointer;

/// Print the weather.gov forecast for tomorrow
#[derive(Parser, Debug)]
#[command(name = "forecast", version, about)]
struct Cli {
    /// Forecast endpoint to request
    #[arg(long, env = "FORECAST_URL", default_value = DEFAULT_FORECAST_URL)]
    url: String,

    /// Read a saved forecast document instead of making a request
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Seconds to wait for a connection
    #[arg(long, value_name = "SECS", default_value_t = 20)]
    connect_timeout: u64,

    /// Seconds to wait on each read of the response
    #[arg(long, value_name = "SECS")]
    read_timeout: Option<u64>,

    /// Text encoding of the document
    #[arg(long, default_value_t = Encoding::Utf8)]
    encoding: Encoding,

    /// Maximum nesting of objects and arrays
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_MAX_DEPTH as u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_NESTING_LIMIT as u64)
    )]
    max_depth: u64,

    /// Print the raw document before parsing it
    #[arg(long)]
    echo: bool,

    /// Also print the value at this JSON pointer (repeatable), e.g. /properties/units
    #[arg(long = "select", value_name = "POINTER")]
    selects: Vec<JsonPointer>,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().map_err(|io_err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to write usage")
                    .with_source(io_err)
            })?;
            return match err.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => Ok(0),
                _ => Ok(to_exit_code(ErrorKind::Usage)),
            };
        }
    };
    debug!(?cli, "arguments parsed");

    let fetcher: Box<dyn Fetch> = match &cli.file {
        Some(path) => Box::new(FileFetcher::new(path)),
        None => Box::new(HttpFetcher::new(
            &cli.url,
            Duration::from_secs(cli.connect_timeout),
            cli.read_timeout.map(Duration::from_secs),
        )?),
    };
    let options = ReportOptions {
        parser: JsonParser::with_encoding(cli.encoding)
            .with_max_depth(Some(cli.max_depth as usize)),
        echo: cli.echo,
        selects: cli.selects,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    forecast::run(fetcher.as_ref(), &options, &mut out)?;
    Ok(0)
}

fn emit_error(err: &Error) {
    match err.message() {
        Some(message) => eprintln!("error: {message}"),
        None => eprintln!("error: {err}"),
    }
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

//! Sensor Log Reader CLI Application
//!
//! This is the command-line interface for the sensor log reader.
//! It uses the sensor-log-decoder library and adds:
//! - Configuration file and flag handling
//! - The built-in operation table
//! - The interactive command session (print / analyze / clear / exit)
//! - Text and JSON rendering of records

use anyhow::{bail, Context, Result};
use clap::Parser;
use sensor_log_decoder::{Decoder, StreamByteOrder, UnsetOperationPolicy};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

mod config;
mod operations;
mod report;
mod session;

use config::{AppConfig, OutputFormat};
use operations::OperationMessages;
use session::Session;

/// Sensor Log Reader - Inspect, analyze and clear vehicle sensor logs
#[derive(Parser, Debug)]
#[command(name = "sensor-log-cli")]
#[command(about = "Inspect, analyze and clear binary vehicle sensor logs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the binary sensor stream
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Byte order of the sensor stream
    #[arg(long, value_name = "ORDER", value_parser = parse_byte_order)]
    byte_order: Option<StreamByteOrder>,

    /// What `analyze` does with an empty operation slot
    #[arg(long, value_name = "POLICY", value_parser = parse_unset_policy)]
    unset_operation: Option<UnsetOperationPolicy>,

    /// Output format for `print`
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Read commands from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Sensor Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", sensor_log_decoder::VERSION);

    let config = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    let Some(input) = config.input.file.as_ref() else {
        bail!("No input file given (pass FILE or set [input] file in the config)");
    };

    let decoder = Decoder::with_config(config.decoder);
    let store = decoder
        .decode_file(input)
        .with_context(|| format!("Failed to decode sensor stream: {:?}", input))?;

    let messages = OperationMessages::new();
    let table = operations::builtin_table(&messages);
    let mut session = Session::new(store, table, config.output.format).with_messages(messages);
    let mut stdout = io::stdout();

    match &config.input.script {
        Some(script) => {
            let file = File::open(script)
                .with_context(|| format!("Failed to open command script: {:?}", script))?;
            session.run(BufReader::new(file), &mut stdout)?;
        }
        None => session.run(io::stdin().lock(), &mut stdout)?,
    }

    log::info!("{} sensors remaining at exit", session.store().len());
    Ok(())
}

/// Merge the optional config file with command line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input.file = Some(input.clone());
    }
    if let Some(script) = &args.script {
        config.input.script = Some(script.clone());
    }
    if let Some(byte_order) = args.byte_order {
        config.decoder.byte_order = byte_order;
    }
    if let Some(policy) = args.unset_operation {
        config.decoder.unset_operation = policy;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    Ok(config)
}

fn parse_byte_order(value: &str) -> Result<StreamByteOrder, String> {
    match value {
        "native" => Ok(StreamByteOrder::Native),
        "little" => Ok(StreamByteOrder::Little),
        "big" => Ok(StreamByteOrder::Big),
        other => Err(format!("expected native, little or big, got `{}`", other)),
    }
}

fn parse_unset_policy(value: &str) -> Result<UnsetOperationPolicy, String> {
    match value {
        "skip" => Ok(UnsetOperationPolicy::Skip),
        "error" => Ok(UnsetOperationPolicy::Error),
        other => Err(format!("expected skip or error, got `{}`", other)),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

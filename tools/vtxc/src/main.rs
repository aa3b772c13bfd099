use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use vtx_lang::{compile::Compiler, limits::Limits};
use vtx_log::{error, LevelFilter};

/// Generates a C header and an HLSL fragment from a `.vtx` interface description.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `.vtx` file to compile.
    input: PathBuf,
    /// Output path without extension. `.h` and `.hlsl` are appended.
    output_basename: String,
    /// RON file overriding the layout, field and declaration limits.
    #[arg(long)]
    limits: Option<PathBuf>,
    /// Lowest level of log messages to print.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
    /// Also write logs to a file in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = vtx_log::init(args.log_level.into(), args.log_dir.as_deref()) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    let limits = match &args.limits {
        Some(path) => match Limits::load(path) {
            Ok(limits) => limits,
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Limits::default(),
    };

    match Compiler::new(limits).compile_file(&args.input, &args.output_basename) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

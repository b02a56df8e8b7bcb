use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;

use chipvm::constants::DEFAULT_CYCLES_PER_FRAME;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity of logging; RUST_LOG takes precedence when set
    #[arg(short, long, value_enum, default_value_t = LogLevel::Error, global = true)]
    log: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a ROM in a window
    Run {
        /// The path to the ROM
        rom: PathBuf,

        /// Instructions executed per 60 Hz frame
        #[arg(short, long, default_value_t = DEFAULT_CYCLES_PER_FRAME, value_parser = clap::value_parser!(u32).range(1..))]
        cycles_per_frame: u32,

        /// Tone volume, from 0.0 to 1.0
        #[arg(short, long, default_value_t = 0.7, value_parser = parse_volume)]
        volume: f32,

        /// Window pixels per display pixel
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,
    },
    /// Write a listing of a ROM's instructions
    Disassemble {
        /// The path to the ROM
        rom: PathBuf,

        /// Where to write the listing; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

fn parse_volume(arg: &str) -> Result<f32, String> {
    let volume: f32 = arg
        .parse()
        .map_err(|_| format!("`{}` isn't a number", arg))?;
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(format!("volume must be between 0.0 and 1.0, got {}", volume))
    }
}

pub fn init() -> Cli {
    let cli = Cli::parse();
    let level = cli.log.as_str();
    let filters = format!("chipvm={0},chip8={0},display={0}", level);
    env_logger::Builder::from_env(Env::default().default_filter_or(filters)).init();

    cli
}

//! CLI frontend for vn: play a script in the terminal, trace it headless,
//! or check it for broken links.

mod commands;
mod voice;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "vn",
    about = "vn: typewriter text and music fades for branching stories",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a script in the terminal
    Play {
        /// Script file (JSON)
        script: PathBuf,

        /// Presentation configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write logs to this file
        #[arg(short, long)]
        log: Option<PathBuf>,

        /// Refuse sound until the first key press
        #[arg(long)]
        mute_until_key: bool,
    },

    /// Run a script headless and print what happened
    Trace {
        /// Script file (JSON)
        script: PathBuf,

        /// Passage to start from (default: the script's start)
        #[arg(short, long)]
        passage: Option<String>,

        /// Milliseconds to wait at each held line before continuing
        #[arg(long, default_value = "500")]
        hold_ms: u64,

        /// Presentation configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a script
    Check {
        /// Script file (JSON)
        script: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            script,
            config,
            log,
            mute_until_key,
        } => init_logging(log.as_deref()).and_then(|()| {
            commands::play::run(&script, config.as_deref(), mute_until_key)
        }),
        Commands::Trace {
            script,
            passage,
            hold_ms,
            config,
        } => init_stderr_logging().and_then(|()| {
            commands::trace::run(&script, passage.as_deref(), hold_ms, config.as_deref())
        }),
        Commands::Check { script } => {
            init_stderr_logging().and_then(|()| commands::check::run(&script))
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("logging setup failed: {e}"))
}

/// The terminal belongs to the player, so logs only go to a file, if any.
fn init_logging(path: Option<&Path>) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .map_err(|e| format!("cannot create log file {}: {e}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| format!("logging setup failed: {e}"))
}

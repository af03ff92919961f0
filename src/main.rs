//! TETRS Crush - scripted driver
//!
//! Feeds command words from a script or stdin into a session and prints
//! snapshots to stdout. Logs go to a file so stdout stays machine-readable.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;
use tetrs_crush::input::{InputHandler, ScriptAction};
use tetrs_crush::{runtime, GameSession, Settings, Snapshot, Variant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tetrs-crush", version, about)]
struct Args {
    /// Rule variant: line-clear | match3
    #[arg(long)]
    variant: Option<Variant>,

    /// Seed for the piece randomizer. Entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Grid width, including walls in line-clear
    #[arg(long)]
    columns: Option<usize>,

    /// Grid height, including the floor in line-clear
    #[arg(long)]
    rows: Option<usize>,

    /// Colors in the match-3 palette (2..=7)
    #[arg(long)]
    palette_size: Option<usize>,

    /// Gravity interval in milliseconds, 0 disables it
    #[arg(long, value_name = "ms")]
    tick_ms: Option<u64>,

    /// Settings file. The per-user settings file when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command script, one word per line. Stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Snapshot output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the effective settings to this file and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Get the log directory, creating it if needed
fn log_dir(settings: &Settings) -> PathBuf {
    let dir = settings
        .logging
        .directory
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("tetrs-crush"));
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        // Logging is not up yet; report a broken per-user file on stderr
        None => {
            let stderr = tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_ansi(false)
                .finish();
            tracing::subscriber::with_default(stderr, Settings::load)
        }
    };

    let session = &mut settings.session;
    if let Some(variant) = args.variant {
        session.variant = variant;
    }
    if args.seed.is_some() {
        session.seed = args.seed;
    }
    if args.columns.is_some() {
        session.columns = args.columns;
    }
    if args.rows.is_some() {
        session.rows = args.rows;
    }
    if let Some(palette_size) = args.palette_size {
        session.palette_size = palette_size;
    }
    if let Some(tick_ms) = args.tick_ms {
        session.tick_ms = tick_ms;
    }
    Ok(settings)
}

fn emit(out: &mut impl Write, format: Format, snapshot: &Snapshot) -> Result<()> {
    match format {
        Format::Json => writeln!(out, "{}", serde_json::to_string(snapshot)?)?,
        Format::Text => writeln!(out, "{snapshot}\n")?,
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    if let Some(path) = &args.write_config {
        settings
            .save_to(path)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        eprintln!("Settings written to {}", path.display());
        return Ok(());
    }

    // Setup tracing to log file
    let run_id: u32 = rand::random();
    let dir = log_dir(&settings);
    let log_file = format!("{run_id:08x}.log");
    let file_appender = tracing_appender::rolling::never(&dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter)),
        )
        .with_ansi(false)
        .init();

    tracing::info!("tetrs-crush starting up, log={}", dir.join(&log_file).display());

    let config = settings.session_config().context("invalid session settings")?;
    let session = GameSession::new(config).context("could not start session")?;
    let input = InputHandler::from_settings(&settings);

    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    let tick_every = Some(Duration::from_millis(settings.session.tick_ms));
    let (handle, task) = runtime::spawn(rt.handle(), session, tick_every);

    let mut out = io::stdout().lock();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read script")?;
        match input.parse_line(index + 1, &line)? {
            None => {}
            Some(ScriptAction::Apply(command)) => {
                handle.blocking_apply(command)?;
            }
            Some(ScriptAction::Print) => emit(&mut out, args.format, &handle.blocking_snapshot()?)?,
            Some(ScriptAction::Quit) => break,
        }
    }

    drop(handle);
    let session = rt.block_on(task).context("session task failed")?;
    emit(&mut out, args.format, &session.snapshot())?;

    tracing::info!(
        score = session.score().points,
        lines = session.score().lines,
        matches = session.score().matches,
        "tetrs-crush shutting down"
    );
    Ok(())
}

//! Hourglass - a countdown timer drawn as an animated hourglass
//!
//! Parses the CLI, sets up file logging and runs the bubbletea program.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use bubbletea_rs::Program;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hourglass_timer::app::{self, App};
use hourglass_timer::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let settings = cli.settings()?;
    info!(
        initial_ms = settings.initial_ms,
        tick_ms = settings.tick.as_millis() as u64,
        width = settings.width,
        height = settings.height,
        "configuration loaded"
    );

    if app::install_settings(settings).is_err() {
        warn!("settings were already installed");
    }

    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;

    info!("hourglass exited");
    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing(cli: &Cli) {
    let level = cli.log_level();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hourglass_timer={level},hourglass={level}")));

    match cli.log_path().map(|path| open_log_file(&path).map(|file| (path, file))) {
        Some(Ok((path, file))) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            info!(path = %path.display(), "logging initialized");
        }
        // Without a log file we stay silent rather than draw over the UI.
        _ => tracing_subscriber::registry().with(env_filter).init(),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

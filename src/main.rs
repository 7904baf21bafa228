// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

mod app;
mod command;
mod config;
mod errors;
mod tui;

use std::env;
use std::fs;
use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use app::{App, SessionOutcome};
use config::load_settings;

const DEFAULT_LOG_FILTER: LevelFilter = LevelFilter::INFO;

/// Browse directories in the terminal and hand the chosen one to your shell.
///
/// On commit (enter) the selected path is written to `.newdir.dtree` in the
/// working directory; the `dt` shell function from the README reads it and
/// changes directory.
#[derive(Parser, Debug)]
#[command(name = "dtree", version, about)]
struct Cli {
    /// Directory to start browsing from (defaults to the current directory)
    path: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = init_logging();
    tracing::info!("STARTING DTREE");

    let cli = Cli::parse();
    let working_dir = env::current_dir()?;
    let start_dir = match cli.path {
        Some(path) => fs::canonicalize(&path)?,
        None => working_dir.clone(),
    };
    if !start_dir.is_dir() {
        return Err(format!("{} is not a directory", start_dir.display()).into());
    }

    let settings = load_settings();

    // the terminal must be restored even when we panic mid-draw
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut session = App::new(settings, start_dir);
    let outcome = session.run(&mut terminal);

    cleanup_terminal()?;

    if let SessionOutcome::Commit(path) = outcome? {
        if let Err(e) = app::deliver_choice(&working_dir, &path) {
            tracing::error!("could not deliver chosen directory: {}", e);
            eprintln!("dtree: could not write {}: {}", app::COMMIT_FILE_NAME, e);
        }
    }

    Ok(())
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let (_, data_dir) = config::get_app_paths()?;
    let log_dir = data_dir.join("logs");
    fs::create_dir_all(&log_dir).ok()?;

    let general_log = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(7)
        .filename_prefix("dtree")
        .filename_suffix("log")
        .build(&log_dir)
        .ok()?;
    let (non_blocking_general, guard) = tracing_appender::non_blocking(general_log);

    let general_layer = fmt::layer()
        .with_writer(non_blocking_general)
        .with_ansi(false)
        .with_filter(Targets::new().with_default(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(general_layer)
        .try_init()
        .ok()?;
    Some(guard)
}

fn cleanup_terminal() -> Result<(), Box<dyn std::error::Error>> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

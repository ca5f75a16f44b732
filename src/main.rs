//! Interactive line-mode front end.
//!
//! ```text
//! ratelist [config.toml]
//! ```
//!
//! Loads the configuration (file, then `RATELIST_*` environment overrides),
//! initialises tracing, opens the JSON store in the data directory and starts
//! a [`Session`]. The current view is printed after every change; commands
//! are read one per line from stdin until `quit` or end of input. Periodic
//! refreshes run between commands.

use ratelist::app::command::{parse_command, Command, HELP};
use ratelist::fetch::{FetchOrchestrator, HttpSource};
use ratelist::infrastructure::store_path;
use ratelist::notify::ConsoleSink;
use ratelist::observability::init_tracing;
use ratelist::storage::{CacheStore, JsonFileStore};
use ratelist::{ui, AppState, Config, Event, Result, Session};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ratelist: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<Config> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    Ok(config.apply_overrides(&Config::env_overrides()))
}

async fn run() -> Result<()> {
    let config = load_config()?;
    let data_dir = config.data_dir();
    let _guard = init_tracing(&config, &data_dir);

    tracing::info!(data_dir = %data_dir.display(), "starting ratelist");

    let store = Arc::new(JsonFileStore::open(store_path(&data_dir)).await?);
    let cache = CacheStore::new(store);
    let source = Arc::new(HttpSource::new(config.request_timeout())?);
    let orchestrator = FetchOrchestrator::new(source, cache.clone(), config.request_timeout(), config.server_url.clone());

    let mut session = Session::new(
        AppState::new(config.in_stock_only),
        orchestrator,
        cache,
        Arc::new(ConsoleSink),
        config.refresh_interval(),
    );

    let ansi = std::io::stdout().is_terminal();
    session.start().await?;
    println!("{}", ui::render(session.state(), ansi));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !session.should_quit() {
        let event = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                match parse_command(&line, session.state()) {
                    Ok(Command::Event(event)) => event,
                    Ok(Command::Help) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(Command::Nothing) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                }
            }
            Some(trigger) = session.next_periodic() => Event::Refresh(trigger),
        };

        if session.dispatch(event).await? && !session.should_quit() {
            println!("{}", ui::render(session.state(), ansi));
        }
    }

    session.shutdown();
    tracing::info!("ratelist stopped");
    Ok(())
}

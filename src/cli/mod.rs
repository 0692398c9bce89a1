use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::App;
use crate::config::ConfigLoader;
use crate::store::HttpNoteStore;

pub mod commands;

use self::commands::{ListArgs, NewArgs};

const LOG_FILE_NAME: &str = "notebook.log";

#[derive(Parser, Debug)]
#[command(
    name = "notebook",
    version,
    about = "Terminal notebook backed by a remote note store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over NOTEBOOK_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the note store (takes precedence over config and url.txt)
    #[arg(long, env = "NOTEBOOK_URL")]
    pub url: Option<String>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive TUI (default)
    Tui,
    /// Print the notes currently in the store
    List(ListArgs),
    /// Create a new note from the command line
    New(NewArgs),
}

enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var("NOTEBOOK_CONFIG", path);
    }

    let loader = ConfigLoader::discover()?;
    loader.paths().ensure_directories()?;
    let paths = loader.paths().clone();

    let command = cli.command.unwrap_or(Commands::Tui);
    let target = if matches!(command, Commands::Tui) {
        LogTarget::File(paths.log_dir.join(LOG_FILE_NAME))
    } else {
        LogTarget::Stderr
    };
    init_tracing(&cli.log_level, target)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;

    let config = loader.load_or_init()?;
    let base_url = config
        .store
        .resolve_base_url(cli.url.as_deref(), &paths)?;
    let store = HttpNoteStore::new(&base_url, &config.store)?;
    tracing::info!(base_url = store.base_url(), "note store configured");

    let config = Arc::new(config);
    match command {
        Commands::Tui => {
            let mut app = App::new(config, store)?;
            commands::run_tui(&mut app)
        }
        Commands::List(args) => commands::list_notes(&config, &store, args),
        Commands::New(args) => commands::new_note(&config, &store, args),
    }
}

fn init_tracing(level: &str, target: LogTarget) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        match target {
            LogTarget::Stderr => fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init(),
            LogTarget::File(path) => {
                let file = File::options()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("opening log file {}", path.display()))?;
                fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
        }
        Ok::<(), anyhow::Error>(())
    })
    .map(|_| ())
}

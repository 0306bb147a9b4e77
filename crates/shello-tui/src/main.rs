//! shello terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server
//! shello
//!
//! # Connect elsewhere, logging to a file
//! shello --server ws://chat.example.org:12000 --log-file /tmp/shello.log --log-level debug
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use shello_app::{App, AppConfig, Runtime};
use shello_core::{KeyValueStore, MemoryStore, SessionConfig};
use shello_tui::{FileStore, SystemEnv, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// shello terminal chat client
#[derive(Parser, Debug)]
#[command(name = "shello")]
#[command(about = "Terminal chat client with a shell-like command line")]
#[command(version)]
struct Args {
    /// WebSocket URL of the chat server
    #[arg(short, long, default_value = "ws://127.0.0.1:12000")]
    server: String,

    /// Path of the key-value state file
    ///
    /// Defaults to `shello/state.json` under the user config directory.
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the UI)
    ///
    /// Logging is off when not given.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seconds to wait before reconnecting after a drop
    #[arg(long, default_value = "3")]
    reconnect_delay_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let writer = Mutex::new(File::create(path)?);

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(filter)
            .init();
    }

    tracing::info!(server = %args.server, "shello starting");

    let store: Box<dyn KeyValueStore + Send> =
        match args.state_file.or_else(FileStore::default_path) {
            Some(path) => Box::new(FileStore::open(path)?),
            None => {
                tracing::warn!("no config directory; session state will not persist");
                Box::new(MemoryStore::new())
            },
        };

    let config = AppConfig {
        session: SessionConfig { reconnect_delay: Duration::from_secs(args.reconnect_delay_secs) },
        ..AppConfig::default()
    };
    let app = App::new(SystemEnv::new(), store, config);

    let driver = TerminalDriver::new(args.server)?;
    Runtime::new(driver, app).run().await?;

    tracing::info!("shello stopped");
    Ok(())
}

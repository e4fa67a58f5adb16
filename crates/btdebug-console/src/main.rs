//! bt-debug: terminal debugger for behavior-tree driven mobs.
//!
//! ```bash
//! # Attach to a running simulation
//! bt-debug --addr 127.0.0.1:7878
//!
//! # Explore the console against the built-in simulated backend
//! bt-debug --demo
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use btdebug_console::config::ConsoleConfig;
use btdebug_console::console::run_console;
use btdebug_console::demo::spawn_demo;
use btdebug_console::link::spawn_link;

/// Behavior tree debug console
#[derive(Parser, Debug)]
#[command(name = "bt-debug", version, about = "Read-only behavior tree debugger")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend address (host:port), overrides the config file
    #[arg(long, env = "BT_DEBUG_ADDR")]
    addr: Option<String>,

    /// Run against the in-process simulated backend
    #[arg(long, default_value = "false")]
    demo: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(addr) = cli.addr {
        config.backend.addr = addr;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config)?;
    tracing::info!(
        addr = %config.backend.addr,
        demo = cli.demo,
        "Starting bt-debug"
    );

    let channels = if cli.demo {
        spawn_demo(config.ui.demo_tick())
    } else {
        spawn_link(&config.backend)
    };

    run_console(channels, &config.ui).await
}

/// Logs go to a file because the console owns the terminal.
fn init_logging(config: &ConsoleConfig) -> anyhow::Result<()> {
    let writer = match config.log_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(())
}

//! mnemon-dash - terminal dashboard for the mnemon bot
//!
//! Usage:
//!   mnemon-dash [OPTIONS]
//!
//! Examples:
//!   mnemon-dash                              # Connect to localhost:8080
//!   mnemon-dash --api http://bot.lan:8080
//!   mnemon-dash --log-level debug --log-file ./dash.log

use anyhow::{Context, Result};
use clap::Parser;
use mnemon_dash::{
    app::{self, App},
    tui::{EventLoop, TerminalManager},
    DashConfig, DashboardSession, HttpApi,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Dashboard CLI arguments
#[derive(Parser)]
#[command(name = "mnemon-dash")]
#[command(about = "Terminal dashboard for the mnemon bot")]
#[command(version)]
struct Args {
    /// Bot API base URL
    #[arg(long, env = "MNEMON_DASH_API_URL")]
    api: Option<String>,

    /// Config file (default: per-user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log file; the terminal is taken by the UI
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut DashConfig) {
        if let Some(api) = self.api {
            config.api_url = api;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(file) = self.log_file {
            config.log_file = file;
        }
    }
}

fn init_logging(config: &DashConfig) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mnemon_dash={}", config.log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    init_logging(&config)?;
    info!("Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    debug!("API URL: {}", config.api_url);

    let api = HttpApi::from_config(&config)?;
    let (mut session, events) = DashboardSession::new(Arc::new(api));
    session.start();
    let mut app = App::new(session, events);

    let input = EventLoop::new(config.tick_rate());
    let result = {
        let mut terminal = TerminalManager::new()?;
        app::run(terminal.terminal_mut(), &mut app, &input)
    };

    app.session.shutdown();

    if let Err(err) = result {
        error!("Error: {:?}", err);
        return Err(err);
    }

    debug!("Dashboard exiting cleanly");
    Ok(())
}

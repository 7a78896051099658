//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::quote_table::QuoteTableAdapter;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::adapters::web::{AppState, build_router};
use crate::domain::error::FinanceError;
use crate::domain::money::usd;
use crate::domain::order::Symbol;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "finance", about = "Paper-trading stock portfolio")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create the database tables if they do not exist
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Look up a quote from the configured price table
    Quote {
        #[arg(short, long)]
        config: PathBuf,
        symbol: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::InitDb { config } => run_init_db(&config),
        Command::Quote { config, symbol } => run_quote(&config, &symbol),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(&e)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, FinanceError> {
    FileConfigAdapter::from_file(path).map_err(|e| FinanceError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// `[web] listen`, falling back to [`DEFAULT_LISTEN`] when unset.
pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, FinanceError> {
    let raw = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    raw.trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| FinanceError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: e.to_string(),
        })
}

fn open_ledger(config: &dyn ConfigPort) -> Result<SqliteAdapter, FinanceError> {
    let ledger = SqliteAdapter::from_config(config)?;
    ledger.initialize_schema()?;
    Ok(ledger)
}

fn run_init_db(config_path: &Path) -> Result<(), FinanceError> {
    let config = load_config(config_path)?;
    let ledger = open_ledger(&config)?;
    info!(
        starting_cash = %ledger.starting_cash(),
        "database ready"
    );
    Ok(())
}

fn run_quote(config_path: &Path, symbol: &str) -> Result<(), FinanceError> {
    let config = load_config(config_path)?;
    let quotes = QuoteTableAdapter::from_config(&config)?;
    let symbol = Symbol::parse(symbol)?;
    let quote = quotes
        .lookup(&symbol)
        .ok_or_else(|| FinanceError::InvalidSymbol {
            symbol: symbol.to_string(),
        })?;
    println!("{} ({}): {}", quote.name, quote.symbol, usd(&quote.price));
    Ok(())
}

fn run_serve(config_path: &Path) -> Result<(), FinanceError> {
    info!("loading config from {}", config_path.display());
    let config = load_config(config_path)?;

    let ledger = open_ledger(&config)?;
    let quotes = QuoteTableAdapter::from_config(&config)?;
    let addr = listen_addr(&config)?;

    let state = AppState {
        ledger: Arc::new(ledger),
        quotes: Arc::new(quotes),
        config: Arc::new(config),
    };
    let router = build_router(state)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "web server listening");
        axum::serve(listener, router).await?;
        Ok::<(), FinanceError>(())
    })
}

//! # Command Line
//!
//! `clientapi` runs the HTTP server. Flags override the layered configuration
//! from `clientapp::config` (environment, then `clientapi.toml`, then defaults).
//!
//! - `clientapi` — serve on the configured address.
//! - `clientapi --check` — load the configured store, report the record count and
//!   exit. Fails with a non-zero status if the store is unreadable or corrupt.
//! - `clientapi --print-config-template` — print a commented TOML template.

use crate::{http, logging};
use anyhow::{bail, Context};
use clap::Parser;
use clientapp::config::{AppConfig, DEFAULT_CONFIG_FILE};
use clientapp::store::fs_backend::FsBackend;
use clientapp::{ClientRepository, ClientService};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug, Default)]
#[command(name = "clientapi", version, about = "Client management HTTP API")]
pub struct Cli {
    /// Config file (defaults to ./clientapi.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON document holding the client records
    #[arg(long, value_name = "FILE")]
    pub clients_file: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log specification, e.g. "debug" or "info, clientapp=debug"
    #[arg(long, value_name = "SPEC")]
    pub log_level: Option<String>,

    /// Verify the store is readable, print the record count and exit
    #[arg(long)]
    pub check: bool,

    /// Print a TOML config template and exit
    #[arg(long)]
    pub print_config_template: bool,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config_template {
        print!("{}", AppConfig::template());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let _logger = logging::init(&config.log_level)
        .with_context(|| format!("invalid log level `{}`", config.log_level))?;

    let repository = ClientRepository::new(FsBackend::new(&config.clients_file));
    let service = ClientService::new(repository);

    if cli.check {
        let count = service.client_count()?;
        info!(
            "event=store_check path={} clients={} status=ok",
            config.clients_file.display(),
            count
        );
        println!("{} clients in {}", count, config.clients_file.display());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(http::serve(&config.bind_addr(), Arc::new(service)))
}

/// Load layered config, then apply command line overrides.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let file = match &cli.config {
        Some(path) if !path.exists() => bail!("config file not found: {}", path.display()),
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let mut config = AppConfig::load(file.as_deref()).context("failed to load configuration")?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(path) = &cli.clients_file {
        config.clients_file = path.clone();
    }
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
}

//! Gotthard CLI
//!
//! Three commands:
//! - **serve**: `gotthard serve [[HOST:]PORT]` run the store server
//! - **inc**: `gotthard inc HOST PORT -n 4 -c 1000` parallel counter increments
//! - **txn**: `gotthard txn HOST PORT -r 1=a -w 1=b` submit one transaction

mod commands;
mod format;
mod logging;
mod parse;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use gotthard_client::{run_increment_clients, Client};
use gotthard_core::{Key, Operation};
use gotthard_engine::Database;
use gotthard_server::{Server, ServerConfig};
use tokio::net::lookup_host;
use tracing::info;

use commands::build_cli;
use format::{format_error, format_reports, format_result, OutputMode};
use parse::{matches_to_action, CliAction};

fn main() {
    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(2);
        }
    };

    let verbosity = matches.get_count("verbose");
    let log_file = matches.get_one::<String>("log").map(PathBuf::from);
    let base_level = match action {
        CliAction::Serve { .. } => "info",
        _ => "warn",
    };
    if let Err(e) = logging::init(base_level, verbosity, log_file.as_deref()) {
        eprintln!("{}", format_error(&e, output_mode));
        process::exit(1);
    }

    if let Err(e) = run(action, output_mode) {
        eprintln!("{}", format_error(&e, output_mode));
        process::exit(1);
    }
}

fn run(action: CliAction, mode: OutputMode) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    match action {
        CliAction::Serve { listen, config } => runtime.block_on(serve(listen, config.as_deref())),
        CliAction::Inc {
            addr,
            clients,
            count,
            key,
        } => runtime.block_on(inc(&addr, clients, count, key, mode)),
        CliAction::Txn {
            addr,
            operations,
            reset,
        } => runtime.block_on(txn(&addr, operations, reset, mode)),
    }
}

async fn serve(listen: Option<String>, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = listen {
        config.listen = listen;
    }

    let db = Database::with_config(config.engine.clone())?;
    let server = Server::bind(&config, db)
        .await
        .with_context(|| format!("cannot listen on {}", config.listen))?;

    server
        .run_until(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted");
            }
        })
        .await?;
    Ok(())
}

async fn inc(
    addr: &str,
    clients: usize,
    count: u64,
    key: Key,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let target = lookup_host(addr)
        .await
        .with_context(|| format!("cannot resolve {}", addr))?
        .next()
        .with_context(|| format!("no address found for {}", addr))?;

    let reports = run_increment_clients(target, clients, count, key).await?;
    println!("{}", format_reports(&reports, mode));
    Ok(())
}

async fn txn(
    addr: &str,
    operations: Vec<Operation>,
    reset: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let mut client = Client::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {}", addr))?;
    let result = if reset {
        client.execute_with_reset(operations).await?
    } else {
        client.execute(operations).await?
    };
    println!("{}", format_result(&result, mode));
    Ok(())
}

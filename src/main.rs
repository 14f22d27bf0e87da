#![forbid(unsafe_code)]
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

mod attendance;
mod cli;
mod config;
mod roster;
mod sheet;
mod timetable;
mod utils;
mod web;
mod webhook;

use attendance::AttendanceService;
use config::Config;
use sheet::GoogleSheetsClient;
use web::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let mut config = Config::load_from_file(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    utils::logging::init_tracing(&config.logging);
    info!("meeting attendance service starting up");
    info!(
        "recording to sheet {} ({}), timetable {}, roster {}",
        config.sheet.sheet_name, config.sheet.spreadsheet_id, config.timetable.path, config.roster.path
    );

    let store = Arc::new(GoogleSheetsClient::new(&config.sheet)?);
    let service = Arc::new(AttendanceService::from_config(&config, store)?);
    let web_server = WebServer::new(config.clone(), service);

    let web_handle = tokio::spawn(async move {
        if let Err(e) = web_server.start().await {
            error!("web server error: {}", e);
        }
    });

    tokio::select! {
        _ = web_handle => {},
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
        },
    }

    info!("meeting attendance service shutting down");
    Ok(())
}

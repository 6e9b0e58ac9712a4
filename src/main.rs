//! tab-bridge - native-messaging host and CLI.
//!
//! Browsers start the host with the manifest path or extension id as
//! arguments, so anything that is not a known CLI category runs host mode.

use std::{env, error::Error, process};

use tab_bridge::{
    cli::{CliService, formatting::format_error},
    config::Config,
    coordinator::Coordinator,
    tracing_config,
};
use tracing::{Instrument, error, info, info_span};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();

    let is_cli_command = matches!(
        args.get(1).map(|s| s.as_str()),
        Some("tabs") | Some("config") | Some("help")
    );

    if is_cli_command {
        tracing_config::init_cli_mode()?;
        run_cli_command(&args[1..]).await?;
    } else {
        run_host().await;
    }

    Ok(())
}

/// Runs the bridge on stdin/stdout until the browser closes the stream.
///
/// Exits the process with status 1 on a startup or top-level failure.
async fn run_host() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    let guard = match tracing_config::init_host(&config.general) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        socket = %config.query.socket_path.display(),
        "Starting tab bridge host"
    );

    let result = Coordinator::new(config)
        .run(tokio::io::stdin(), tokio::io::stdout())
        .instrument(info_span!("tab_bridge_host"))
        .await;

    if let Err(e) = result {
        error!(error = %e, "Bridge host failed");
        drop(guard);
        process::exit(1);
    }
    info!("Tab bridge host exiting");
}

/// Executes CLI commands through the CliService.
///
/// # Errors
/// Returns error if the configuration cannot be loaded.
async fn run_cli_command(args: &[String]) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let cli_service = CliService::new(config);

    let category = args.first().map(|s| s.as_str()).unwrap_or("help");
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");
    let command_args = args.get(2..).unwrap_or(&[]);

    let result = cli_service
        .execute_command(category, command, command_args)
        .await;

    match result {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}

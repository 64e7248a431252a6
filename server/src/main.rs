mod id_generator;
mod identifiers;
mod server_config;
mod session_controller;
mod web_server;
mod ws_handler;

use std::path::PathBuf;

use clap::Parser;
use common::config::Validate;
use common::{log, logger};

use server_config::get_config_manager;

#[derive(Parser)]
#[command(name = "tictactoe_server")]
struct Args {
    /// Path to the YAML config; defaults to a file next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    bind: Option<String>,

    #[arg(long)]
    static_dir: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = get_config_manager(args.config).get_config()?;
    if let Some(bind) = args.bind {
        config.web.bind_address = bind;
    }
    if let Some(static_dir) = args.static_dir {
        config.web.static_files_path = static_dir;
    }
    config.validate()?;

    log!(
        "Starting Tic-Tac-Toe server (mode {}, search {:?}, computer delay {} ms)",
        config.game.default_mode,
        config.game.search,
        config.game.computer_delay_ms
    );

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        log!("Shutdown signal received");
    };

    web_server::run_web_server(config.web, config.game, shutdown_signal).await?;

    log!("Server shut down gracefully");
    Ok(())
}

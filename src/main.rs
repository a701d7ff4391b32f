use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::process::ExitCode;

use switchboard::backend::{BackendClient, health};
use switchboard::core::config;
use switchboard::tui;

#[derive(Parser)]
#[command(name = "switchboard", about = "Terminal shell for dashboard applications")]
struct Args {
    /// Backend base URL (overrides config file and SWITCHBOARD_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Application code to open once the session is validated
    #[arg(short, long)]
    app: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the backend and print the health report as JSON
    Health,
}

#[tokio::main]
async fn main() -> std::io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to switchboard.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("switchboard.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            log::warn!("Config error: {}, using defaults", e);
            config::SwitchboardConfig::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        args.backend_url.as_deref(),
        args.app.as_deref(),
    );
    log::info!("Switchboard starting up against {}", resolved.backend_url);

    match args.command {
        Some(Command::Health) => {
            let client = BackendClient::new(resolved.backend_url);
            let response = health::probe(&client).await;
            let json = serde_json::to_string_pretty(&response.body)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            println!("{json}");
            Ok(if response.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            tui::run(resolved)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

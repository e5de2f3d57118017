use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use agora::core::config::{self, AgoraConfig, CliOverrides};
use agora::tui;

#[derive(Parser)]
#[command(name = "agora", about = "Terminal client for a threaded discussion board")]
struct Args {
    /// Base URL of the board API (overrides config and AGORA_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to agora.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("agora.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        AgoraConfig::default()
    });
    let overrides = CliOverrides {
        api_url: args.api_url,
        timeout_secs: args.timeout_secs,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!("Agora starting up against {}", resolved.api_base_url);

    tui::run(resolved)
}

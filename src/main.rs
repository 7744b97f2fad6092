use anyhow::Result;
use clap::Parser;

use passgate::app::App;
use passgate::config::Config;
use passgate::logging;

#[derive(Parser)]
#[command(name = "passgate")]
#[command(about = "Terminal client for staged identity verification")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Verification service base address (overrides config)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }

    let logging_handle = logging::init_logging(&config, cli.debug)?;

    let mut app = App::new(config)?;
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = logging_handle.log_file_path {
        if log_path.exists() {
            if let Ok(metadata) = log_path.metadata() {
                if metadata.len() > 0 {
                    eprintln!("Session log: {}", log_path.display());
                }
            }
        }
    }

    result
}

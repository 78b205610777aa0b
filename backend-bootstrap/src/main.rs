use anyhow::Result;
use clap::Parser;

use backend_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "scooter-dispatch")]
#[command(about = "Scooter dispatch server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).await?;
    let _log_guard = backend_bootstrap::init_tracing(config.log_dir.as_deref())?;

    backend_bootstrap::run_standalone(config).await
}

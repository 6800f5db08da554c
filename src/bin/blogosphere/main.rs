use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use blogosphere::logger::configure_logger;
use blogosphere::server::server_run;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "blogosphere.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Please run blogosphere --help");
            return Err(err);
        }
    };

    // dropping the guard flushes the log file
    let _log_guard = match configure_logger(&config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error creating logger, continuing without it. Desc={}", err);
            None
        }
    };

    info!("Starting Blogosphere =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
    info!("Serving {} for {}", config.site.domain, config.site.handle);

    server_run(config).await?;
    Ok(())
}

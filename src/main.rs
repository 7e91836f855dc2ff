use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kintai::AttendanceError;
use kintai::cli::{self, Cli};
use kintai::config::Config;
use kintai::utils::format::format_error_message;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "kintai=info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    if let Err(why) = cli::run(cli, config).await {
        match why.downcast_ref::<AttendanceError>() {
            Some(err) if err.is_rejection() => {
                tracing::warn!("Rejected: {}", err);
            }
            _ => tracing::error!("Command failed: {:?}", why),
        }
        eprintln!("{}", format_error_message(&why.to_string()));
        std::process::exit(1);
    }

    Ok(())
}

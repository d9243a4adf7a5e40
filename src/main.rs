use anyhow::Context;
use clipgrab::config::BotConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BotConfig::from_env().context(
        "Failed to load configuration. Set TELEGRAM_BOT_TOKEN (and optional CLIPGRAB_* variables)",
    )?;

    clipgrab::run(config).await
}

use discord_module::BotConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = BotConfig::from_env()?;
    info!(
        "snippet bot starting (delete timeout {}s)",
        config.delete_timeout.as_secs()
    );

    tokio::select! {
        result = discord_module::run(config) => result?,
        _ = tokio::signal::ctrl_c() => info!("received ctrl-c, shutting down"),
    }
    Ok(())
}

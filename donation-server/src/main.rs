use donation_server::utils::result::BoxError;
use donation_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );

    tracing::info!(
        "Starting donation-server (env: {}, db: {})",
        config.environment,
        config.database_path
    );

    Server::new(config).run().await?;
    Ok(())
}

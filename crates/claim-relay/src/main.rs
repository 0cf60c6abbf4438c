use claim_relay::config::Config;
use claim_relay::transport;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    rolling_logger::init_logger(&config.log_dir, "claim-relay")?;

    let transport = transport::from_config(&config).map_err(|e| {
        error!("Refusing to start: {e}");
        e
    })?;
    match &config.mail_api_url {
        Some(url) => info!("Sending claim emails through mail API {url}"),
        None => info!("Sending claim emails over SMTP via {}", config.smtp_host),
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on port {}", config.port);

    axum::serve(listener, claim_relay::build_router(transport)).await?;
    Ok(())
}

use std::sync::Arc;

use back2u_lib::config::Config;
use back2u_lib::http::build_router;
use back2u_lib::notify::RelayNotifier;
use back2u_lib::repository::init_db;
use back2u_lib::AppState;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    rolling_logger::init_logger(&config.log_dir, "back2u")?;

    let db_state = match init_db(&config.db_path).await {
        Ok(db_state) => {
            let _ = rolling_logger::info("DB init success");
            db_state
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("DB init failed: {}", e));
            return Err(e.into());
        }
    };
    let notifier = RelayNotifier::new(config.relay_url.clone(), config.relay_timeout)?;
    tracing::info!("Claim notifications go to {}", notifier.url());

    let state = AppState::new(&db_state, Arc::new(notifier), config.session_idle);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Back2U backend listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

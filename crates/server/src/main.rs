use std::sync::Arc;

use db::{
    DBService,
    validator::{DatabaseValidationError, DatabaseValidator},
};
use server::{AppState, app};
use services::services::config::{ConfigError, Settings};
use thiserror::Error;
use tracing::info;
use utils::logging::init_tracing;

#[derive(Debug, Error)]
pub enum ServiceMasterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    DatabaseValidation(#[from] DatabaseValidationError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServiceMasterError> {
    let settings = Settings::global()?;
    init_tracing(settings.debug_mode).map_err(anyhow::Error::from)?;

    info!(
        app = %settings.app_name,
        version = %settings.version,
        debug_mode = settings.debug_mode,
        "Starting"
    );

    let db = DBService::new(&settings.database_url, settings.debug_mode).await?;
    let validation = DatabaseValidator::new(db.pool.clone())
        .ensure_ready()
        .await?;
    info!("{}", validation.summary());

    let addr = settings.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;
    info!(addr = %actual_addr, "Server running on http://{actual_addr}");

    let state = AppState::new(db.clone(), Arc::new(settings.clone()));
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}

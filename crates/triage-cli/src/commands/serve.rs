//! Serve command implementation.
//!
//! Runs the ticket API (see `triage-api`) until Ctrl+C.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use triage_api::{create_api_state, create_app};
use triage_classifier::Classifier;

use crate::config::Config;

/// Execute the serve command.
pub async fn execute(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.host.clone());
    let port = port.unwrap_or(config.port);

    let classifier = Classifier::from_config(config.classifier);
    let settings = classifier.config();
    if classifier.is_configured() {
        info!(
            model = %settings.model,
            api_url = %settings.api_url,
            "classifier enabled"
        );
    } else {
        warn!(
            credential_env = %settings.credential_env,
            "credential not set; classification will return the default result"
        );
    }

    let app = create_app(create_api_state(classifier));

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;

    println!();
    println!("🚀 Triage Server");
    println!("   API:    http://{}/api/health", listener.local_addr()?);
    println!();
    println!("   Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

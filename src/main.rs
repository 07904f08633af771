use std::sync::Arc;

use email_classifier::api::{self, AppState};
use email_classifier::classifier::ClassifierGateway;
use email_classifier::config::AppConfig;
use email_classifier::nlp::{TextNormalizer, create_linguistics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(1);
    });

    // ── Text normalizer ─────────────────────────────────────────────────
    let linguistics = create_linguistics(config.nlp_backend);
    let normalizer = Arc::new(TextNormalizer::new(linguistics, config.nlp_language));

    // ── Classifier ──────────────────────────────────────────────────────
    let gateway = ClassifierGateway::from_config(&config).unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(1);
    });

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mock = gateway.is_mock(),
        model = %config.model,
        nlp_backend = normalizer.backend_name(),
        language = ?config.nlp_language,
        static_dir = %config.static_dir.display(),
        "Email classifier starting"
    );

    let state = AppState {
        normalizer,
        gateway: Arc::new(gateway),
    };
    let app = api::router(state, &config.static_dir);

    // ── Server ──────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Email classifier stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}

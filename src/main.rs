use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use notes_core::{ChatCompletionsClient, ExtractionService, NotesConfig};

/// Main entry point for the clinical notes extractor.
///
/// Resolves configuration once, builds the model client, and serves the HTML form and JSON API
/// until interrupted.
///
/// # Environment Variables
/// - `GROQ_API_KEY`: model API credential (required)
/// - `GROQ_BASE_URL`: model API base URL (default: "https://api.groq.com/openai/v1")
/// - `NOTES_REST_ADDR`: server address (default: "127.0.0.1:5000")
///
/// A `.env` file in the working directory is loaded first if present.
///
/// # Errors
/// Returns an error if:
/// - `GROQ_API_KEY` is unset or empty, or the base URL is invalid,
/// - the logging/tracing configuration cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notes_run=info".parse()?)
                .add_directive("notes_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = NotesConfig::from_env()?;
    let addr = std::env::var("NOTES_REST_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".into());

    tracing::info!(
        "++ Starting clinical notes extractor on {} (model {} at {})",
        addr,
        cfg.model(),
        cfg.base_url()
    );

    let client = ChatCompletionsClient::new(cfg)?;
    let state = AppState::new(ExtractionService::new(Arc::new(client)));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

mod api;
mod cli;

pub use cli::App;

use crate::llm::RigCompletion;
use crate::prelude::{eprintln, *};
use crate::relay::Relay;
use axum::{routing::post, Router};
use sitegen_core::bundle::MarkerMode;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Read-only state shared by every handler.
pub struct AppState {
    pub relay: Relay,
    pub mode: MarkerMode,
    pub archive_name: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(api::generate_handler))
        .route("/api/preview", post(api::preview_handler))
        .route("/api/archive", post(api::archive_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let service = RigCompletion::from_options(&app.provider)?;

    if global.verbose {
        eprintln!("Using {}", service.describe());
    }

    let state = Arc::new(AppState {
        relay: Relay::new(Arc::new(service), app.provider.completion_options()),
        mode: global.marker_mode.into(),
        archive_name: app.archive_name,
    });

    let addr = format!("{}:{}", app.host, app.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Listening on http://{addr}");

    if global.verbose {
        eprintln!("sitegen listening on http://{}", addr);
        eprintln!("Generate endpoint: http://{}/api/generate", addr);
        eprintln!("Preview endpoint: http://{}/api/preview", addr);
        eprintln!("Archive endpoint: http://{}/api/archive", addr);
    }

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

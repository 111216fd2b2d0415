//! Server side of the portfolio site.
//!
//! Thin endpoints behind the channel pages: guestbook, Spotify now playing,
//! device status ingestion and the resume download. Persistence is Redis,
//! see [`database`].
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/channels` | channel registry in cycle order |
//! | GET | `/api/guestbook` | newest 100 entries |
//! | POST | `/api/guestbook/eligibility` | `{ fingerprint }` → `{ canSign, error? }` |
//! | POST | `/api/guestbook` | `{ message, fingerprint }` → `{ success, entryId }` |
//! | DELETE | `/api/guestbook/{id}` | `{ fingerprint }` → `{ success }` |
//! | GET | `/api/spotify/now-playing` | track or `null` |
//! | GET | `/api/mac-status` | health check |
//! | POST | `/api/mac-status` | telemetry snapshot |
//! | GET | `/api/mac-status/history` | latest snapshots, `?limit=` up to 100 |
//! | GET | `/resume/pdf` | resume attachment |
//!
//! Errors are JSON `{ "success": false, "error": "..." }`.
//!
//!
//!
//! # Configuration
//!
//! Environment variables with defaults, secrets from `/run/secrets`, see
//! [`config::Config`].
//!
//! ```sh
//! RUST_LOG=info RUST_PORT=1111 REDIS_URL=redis://localhost:6379 cargo run -p portfolio-backend
//! ```
use std::{future::pending, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post},
};
use tokio::{
    net::TcpListener,
    signal::{
        ctrl_c,
        unix::{SignalKind, signal},
    },
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod guestbook;
pub mod resume;
pub mod routes;
pub mod spotify;
pub mod state;
pub mod status;
#[cfg(test)]
mod testing;
pub mod utils;

use database::Store;
use routes::{
    channels_handler, create_entry_handler, delete_entry_handler, eligibility_handler,
    list_entries_handler, now_playing_handler, resume_handler, status_health_handler,
    status_history_handler, status_ingest_handler,
};
use state::AppState;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = router(state);

    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");

    Ok(())
}

/// Every endpoint over `state`, with CORS. Handlers extract
/// `ConnectInfo<SocketAddr>`, so serve it with connect info.
pub fn router<S: Store>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(state.config.cors_max_age_secs));

    Router::new()
        .route("/api/channels", get(channels_handler::<S>))
        .route(
            "/api/guestbook",
            get(list_entries_handler::<S>).post(create_entry_handler::<S>),
        )
        .route("/api/guestbook/eligibility", post(eligibility_handler::<S>))
        .route("/api/guestbook/{id}", delete(delete_entry_handler::<S>))
        .route("/api/spotify/now-playing", get(now_playing_handler::<S>))
        .route(
            "/api/mac-status",
            get(status_health_handler::<S>).post(status_ingest_handler::<S>),
        )
        .route("/api/mac-status/history", get(status_history_handler::<S>))
        .route("/resume/pdf", get(resume_handler::<S>))
        .layer(cors)
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM. A handler that fails to install is logged
/// and never fires, the other one still can.
async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => info!("Interrupted, draining connections"),
            Err(e) => {
                error!("Ctrl+C handler unavailable: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Terminated, draining connections");
            }
            Err(e) => {
                error!("SIGTERM handler unavailable: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}

mod api;
mod telemetry;

use anyhow::Context;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware;
use axum::Router;
use jhatpat_core::ai::create_client_from_env;
use jhatpat_core::{AppConfig, FileMedium, RecipeHistory, RecipeSession};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Application state shared across all handlers
pub type AppState = Arc<RecipeSession>;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// How often to look for history changes written by other processes.
const STORAGE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Initialize console logging, filtered by `RUST_LOG`.
fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry::AiCallCountingLayer)
        .init();
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/test", api::testing::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/history", api::history::router())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Don't create a span at all for noisy endpoints
                    if matched_path == "/api/test/ping" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        // Skip logging for noisy endpoints (trace-level spans)
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        let ai_calls = telemetry::get_ai_call_count().unwrap_or(0);
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                ai_calls,
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                ai_calls,
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(
            telemetry::ai_call_count_header_middleware,
        ))
        .layer(middleware::from_fn(telemetry::ai_call_counting_middleware))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .context("Failed to serialize OpenAPI spec")?;
        println!("{}", spec);
        return Ok(());
    }

    init_telemetry();

    let config = AppConfig::from_env()?;
    let client = create_client_from_env().context("AI client unavailable")?;

    let medium = Arc::new(FileMedium::new(&config.data_dir));
    let history = RecipeHistory::on_medium(medium.clone(), config.history_limit);
    history.load();

    // Pick up history written by the CLI or another server.
    let _poller = medium.spawn_poller(STORAGE_POLL_INTERVAL);
    let _watcher = history.store().watch_external_changes();

    tracing::info!(
        data_dir = %config.data_dir.display(),
        entries = history.len(),
        language = %config.translation_language,
        "Loaded recipe history"
    );

    let state: AppState = Arc::new(RecipeSession::new(
        client,
        history,
        config.translation_language,
    ));

    let bind_addr = env::var("JHATPAT_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .await
        .context("Server error")?;

    Ok(())
}

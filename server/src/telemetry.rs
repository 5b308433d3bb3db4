//! Telemetry utilities for tracking per-request metrics.
//!
//! This module provides a tracing Layer that counts AI provider calls per HTTP
//! request. Cache hits never open an `ai.request` span, so they are not counted.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use tracing::{span::Id, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

/// Response header carrying the request's AI call count.
pub const AI_CALL_COUNT_HEADER: &str = "X-AI-Call-Count";

tokio::task_local! {
    /// Task-local counter for AI calls in the current request.
    static AI_CALL_COUNTER: Arc<AtomicU32>;
}

/// Get the current AI call count for this request, if available.
pub fn get_ai_call_count() -> Option<u32> {
    AI_CALL_COUNTER
        .try_with(|counter| counter.load(Ordering::Relaxed))
        .ok()
}

/// A tracing Layer that counts `ai.request` spans per HTTP request.
///
/// The counter is initialized by `ai_call_counting_middleware`. AI calls are
/// awaited inside the handler's task, so the task-local is in scope when
/// their spans are created.
pub struct AiCallCountingLayer;

impl<S> Layer<S> for AiCallCountingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, _attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        if span.name() == "ai.request" {
            let _ = AI_CALL_COUNTER.try_with(|counter| {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
    }
}

/// Middleware that initializes the per-request AI call counter.
///
/// Must be the outermost layer so the counter outlives the trace span.
pub async fn ai_call_counting_middleware(request: Request<Body>, next: Next) -> Response {
    let counter = Arc::new(AtomicU32::new(0));
    AI_CALL_COUNTER.scope(counter, next.run(request)).await
}

/// Middleware that adds the X-AI-Call-Count header to responses.
pub async fn ai_call_count_header_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    if let Some(count) = get_ai_call_count() {
        if let Ok(value) = axum::http::header::HeaderValue::from_str(&count.to_string()) {
            response.headers_mut().insert(AI_CALL_COUNT_HEADER, value);
        }
    }

    response
}

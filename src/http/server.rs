//! Diagnostic HTTP server.
//!
//! # Responsibilities
//! - Create Axum Router with the trace context middleware
//! - Echo the extracted context back to the caller (`GET /context`)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::HeaderMap,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::observability::tracing::{trace_context_middleware, HeaderExtractor};
use crate::propagation::{extractor_for_styles, CompositeExtractor, PropagationError, TraceContextOrSamplingFlags};

/// HTTP server exposing the extractor chain.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig) -> Result<Self, PropagationError> {
        let extractor = extractor_for_styles::<HeaderMap>(&config.propagation.extract)?;
        Ok(Self::with_extractor(extractor))
    }

    pub fn with_extractor(extractor: CompositeExtractor<HeaderMap>) -> Self {
        let router = Self::build_router(Arc::new(extractor));
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(extractor: HeaderExtractor) -> Router {
        Router::new()
            .route("/context", get(context_handler))
            .route("/health", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                extractor,
                trace_context_middleware,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn context_handler(
    Extension(extracted): Extension<TraceContextOrSamplingFlags>,
) -> impl IntoResponse {
    Json(context_json(&extracted))
}

/// JSON view of an extraction result, ids rendered as hex.
pub fn context_json(extracted: &TraceContextOrSamplingFlags) -> Value {
    match extracted {
        TraceContextOrSamplingFlags::Empty => json!({ "kind": "empty" }),
        TraceContextOrSamplingFlags::Context(ctx) => json!({
            "kind": "context",
            "trace_id": ctx.trace_id_string(),
            "span_id": ctx.span_id_string(),
            "parent_id": ctx.parent_id.map(|id| format!("{:016x}", id)),
            "sampled": ctx.sampled,
            "debug": ctx.debug,
        }),
        TraceContextOrSamplingFlags::SamplingFlags(flags) => json!({
            "kind": "sampling_flags",
            "sampled": flags.sampled,
            "debug": flags.debug,
        }),
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! Axum-based HTTP server for the detection gateway.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use cropsight_core::config::UploadConfig;
use cropsight_core::{media, CropDetector, Error};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The detection pipeline.
    pub detector: CropDetector,
    /// Upload limits and allow-list.
    pub upload: UploadConfig,
}

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(config: GatewayConfig, detector: CropDetector, upload: UploadConfig) -> Self {
        Self {
            config,
            state: Arc::new(AppState { detector, upload }),
        }
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        // Headroom over the configured cap: the raw upload may be larger than
        // the normalized JPEG the cap applies to.
        let body_limit = self.state.upload.max_file_size_mb as usize * 2 * 1024 * 1024 + 1024;

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v1/detect", post(detect_handler))
            .layer(DefaultBodyLimit::max(body_limit))
            .with_state(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .context("server error")?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Trace ID.
    pub trace_id: Option<String>,
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Detection handler: multipart image upload in, structured result out.
///
/// "Not a crop" is a 200 with `is_crop_image=false`, never an error.
async fn detect_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();

    tracing::info!(trace_id = %trace_id, "Processing detection request");

    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return error_response(&trace_id, e),
    };

    tracing::info!(
        trace_id = %trace_id,
        filename = %upload.filename,
        size = upload.bytes.len(),
        "Image upload received"
    );

    let encoded = match media::prepare_upload(&upload.filename, &upload.bytes, &state.upload) {
        Ok(encoded) => encoded,
        Err(e) => return error_response(&trace_id, e),
    };

    match state.detector.detect(&encoded).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(&trace_id, e),
    }
}

async fn read_upload(multipart: &mut Multipart) -> cropsight_core::Result<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::input(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| Error::input("upload is missing a filename"))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| Error::input(format!("failed to read upload: {}", e)))?;
            return Ok(Upload {
                filename,
                bytes: bytes.to_vec(),
            });
        }
    }

    Err(Error::input("missing multipart field `file`"))
}

/// Map a pipeline error to a status code and JSON body.
///
/// Input, extraction, and validation failures are the client's problem (the
/// upload or the model contract); only an external-service failure is
/// reported as unavailability.
fn error_response(trace_id: &str, error: Error) -> Response {
    let (status, code) = match &error {
        Error::Input(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        Error::Extraction(_) => (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED"),
        Error::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        Error::ExternalService { .. } => (StatusCode::SERVICE_UNAVAILABLE, "VISION_SERVICE_ERROR"),
    };

    tracing::warn!(trace_id = %trace_id, code = code, error = %error, "Detection request failed");

    (
        status,
        Json(ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
            trace_id: Some(trace_id.to_string()),
        }),
    )
        .into_response()
}

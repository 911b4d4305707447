//! Local admin HTTP service.
//!
//! Serves the portfolio document and image uploads to the browser-based
//! admin panel. All writes go through this service as whole-document
//! overwrites; there is no patching endpoint.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/data` | The full portfolio document |
//! | `POST` | `/api/data` | Overwrite the document with the request body |
//! | `POST` | `/api/upload` | Store a multipart image (field `image`) |
//! | `GET`  | `/uploads/*` | Uploaded files, served statically |
//!
//! # Error Contract
//!
//! Every error response is a flat JSON object:
//!
//! ```json
//! { "error": "Failed to read data file" }
//! ```
//!
//! Successful writes answer `{ "message": ... }`; successful uploads answer
//! `{ "url": "/uploads/<name>" }`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the admin panel can
//! talk to this service from whatever dev server it happens to run on.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::Config;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    /// Application configuration (wrapped in `Arc` for cheap cloning across handlers).
    config: Arc<Config>,
}

/// Starts the local admin HTTP service.
///
/// Binds to the address configured in `[server].bind` and serves the data
/// and upload endpoints until the process is terminated. The uploads
/// directory and the data file's parent directory are created up front so
/// the first write cannot fail on a missing path.
///
/// This is the entry point used by the `folio serve` command. Log output
/// goes through `tracing`; the subscriber is installed by the binary, not
/// here, so tests can run several servers in one process.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let uploads_dir = config.data.uploads_dir.clone();
    let config = Arc::new(config.clone());

    tokio::fs::create_dir_all(&uploads_dir).await?;
    if let Some(parent) = config.data.file.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let state = AppState { config };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/data", get(handle_get_data).post(handle_post_data))
        .route("/api/upload", post(handle_upload))
        .nest_service("/uploads", ServeDir::new(&uploads_dir))
        // Axum caps bodies at 2 MB by default, which is too small for images.
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        .layer(cors)
        .with_state(state);

    println!("Admin server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// Flat JSON error body, e.g. `{ "error": "Failed to read data file" }`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

/// Constructs a 500 Internal Server Error.
fn server_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

// ============ GET /api/data ============

/// Handler for `GET /api/data`.
///
/// Reads the data file and returns its contents verbatim. The service does
/// not interpret the document shape; editors and stores do that.
async fn handle_get_data(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = &state.config.data.file;
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "data file read failed");
        server_error("Failed to read data file")
    })?;

    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "data file is not valid JSON");
        server_error("Failed to read data file")
    })?;

    Ok(Json(value))
}

// ============ POST /api/data ============

/// JSON response body for a successful `POST /api/data`.
#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

/// Handler for `POST /api/data`.
///
/// Overwrites the data file with the pretty-printed request body. The body
/// replaces the whole document; partial updates are not supported.
async fn handle_post_data(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<MessageResponse>, AppError> {
    let path = &state.config.data.file;
    let pretty = serde_json::to_string_pretty(&body)
        .map_err(|_| server_error("Failed to write data file"))?;

    tokio::fs::write(path, pretty).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "data file write failed");
        server_error("Failed to write data file")
    })?;

    tracing::info!(path = %path.display(), "data file updated");
    Ok(Json(MessageResponse {
        message: "Data updated successfully".to_string(),
    }))
}

// ============ POST /api/upload ============

/// JSON response body for a successful `POST /api/upload`.
#[derive(Serialize)]
struct UploadResponse {
    url: String,
}

/// Handler for `POST /api/upload`.
///
/// Stores the multipart field named `image` in the uploads directory under
/// a timestamp-prefixed name and returns its public URL. Requests without
/// an `image` field are rejected with `400`.
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original = field
            .file_name()
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "upload".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Malformed upload: {}", e)))?;

        let filename = format!("{}-{}", chrono::Utc::now().timestamp_millis(), original);
        let dest = state.config.data.uploads_dir.join(&filename);
        tokio::fs::write(&dest, &bytes).await.map_err(|e| {
            tracing::error!(path = %dest.display(), error = %e, "upload write failed");
            server_error("Failed to store upload")
        })?;

        tracing::info!(file = %filename, size = bytes.len(), "image uploaded");
        return Ok(Json(UploadResponse {
            url: format!("/uploads/{}", filename),
        }));
    }

    Err(bad_request("No file uploaded"))
}

/// Strips path components from a client-supplied filename and keeps a
/// conservative character set so the result is safe to join onto the
/// uploads directory.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

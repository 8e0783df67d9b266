use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    clip::{ClipRequest, ValidationError},
    error::{AppError, AppResult},
    ids::{clip_file_name, raw_file_name},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let downloads = ServeDir::new(&state.config.download_dir);

    Router::new()
        .route("/health", get(health))
        .route("/clip", post(create_clip))
        .nest_service("/download", downloads)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request());

    // Credentials cannot be combined with a wildcard origin.
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(origins).allow_credentials(true)
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    download_dir: String,
    ffmpeg: bool,
    yt_dlp: bool,
    pending_deletions: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: "clipserver",
        download_dir: state.config.download_dir.display().to_string(),
        ffmpeg: state.availability.ffmpeg,
        yt_dlp: state.availability.yt_dlp,
        pending_deletions: state.cleanup.pending(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClipResponse {
    success: bool,
    message: &'static str,
    download_url: String,
}

async fn create_clip(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ClipResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable clip body");
        ValidationError::MalformedBody
    })?;
    let request = ClipRequest::from_json(&body)?;

    let id = state.ids.next();
    let download_dir = &state.config.download_dir;
    let raw_path = download_dir.join(raw_file_name(id));
    let clip_name = clip_file_name(id);
    let clip_path = download_dir.join(&clip_name);
    let source_url = request.source_url();
    let span = request.span();

    tracing::info!(id, url = %source_url, start = span.start, end = span.end, "clip requested");

    state
        .tools
        .download(&source_url, &raw_path)
        .await
        .map_err(AppError::Download)?;

    let downloaded = tokio::fs::try_exists(&raw_path)
        .await
        .with_context(|| format!("failed to stat {}", raw_path.display()))?;
    if !downloaded {
        return Err(AppError::MissingDownload(raw_path));
    }

    state
        .tools
        .trim(&raw_path, &clip_path, span)
        .await
        .map_err(AppError::Trim)?;

    if let Err(err) = tokio::fs::remove_file(&raw_path).await {
        tracing::warn!(path = %raw_path.display(), error = %err, "failed to delete raw download");
    }

    state.cleanup.schedule(clip_path, state.config.retention);
    tracing::info!(
        id,
        file = %clip_name,
        retention_secs = state.config.retention.as_secs(),
        "clip ready"
    );

    Ok(Json(ClipResponse {
        success: true,
        message: "Video clipped successfully.",
        download_url: state.config.download_url(&clip_name),
    }))
}

use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Extension;
use axum::Json;
use serde_json::json;
use sqft_listings::listings::{listing_router, ListingApi, ListingStore, MediaStore};
use std::sync::Arc;

pub(crate) fn with_listing_routes<S, M>(api: Arc<ListingApi<S, M>>) -> axum::Router
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    listing_router(api)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/media/:file_name", get(media_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Serve an uploaded image with a content type guessed from its extension.
pub(crate) async fn media_endpoint(
    Extension(state): Extension<AppState>,
    Path(file_name): Path<String>,
) -> Response {
    match state.media.object(&file_name) {
        Some(bytes) => {
            let content_type = mime_guess::from_path(&file_name).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.to_string())],
                bytes,
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "media not found" })),
        )
            .into_response(),
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::spotify::SpotifyError;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    UnsupportedMood,
    NotAuthenticated,
    NoTracksFound,
    Upstream {
        context: &'static str,
        source: SpotifyError,
    },
}

impl AppError {
    pub fn upstream(context: &'static str, source: SpotifyError) -> Self {
        AppError::Upstream { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UnsupportedMood => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Unsupported mood" })),
            )
                .into_response(),
            AppError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Not authenticated with Spotify" })),
            )
                .into_response(),
            AppError::NoTracksFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "No recommended tracks for this mood" })),
            )
                .into_response(),
            AppError::Upstream { context, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": context, "details": source.details() })),
            )
                .into_response(),
        }
    }
}

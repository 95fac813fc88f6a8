//! HTTP handlers for the mood-playlist API.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::error::AppError;
use crate::moods::{self, MoodTargets};
use crate::session;
use crate::spotify::SpotifyClient;

const RECOMMENDATION_LIMIT: u32 = 20;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: SpotifyClient,
}

/// Query parameters on the provider's callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Request body for playlist creation.
#[derive(Debug, Deserialize)]
pub struct FromMoodRequest {
    #[serde(default)]
    pub mood: Option<String>,
}

/// API response for a created playlist.
#[derive(Debug, Serialize)]
pub struct FromMoodResponse {
    pub ok: bool,
    pub playlist: PlaylistSummary,
    #[serde(rename = "tracksAdded")]
    pub tracks_added: usize,
}

#[derive(Debug, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// GET / - service banner.
pub async fn index() -> impl IntoResponse {
    Json(json!({ "ok": true, "service": "moodify" }))
}

/// GET /auth/login - redirect to the provider's consent screen.
pub async fn login(State(state): State<AppState>) -> Response {
    redirect(&state.spotify.authorize_url())
}

/// GET /auth/callback - complete the code exchange, then bounce back to the
/// frontend with an `auth` flag describing the outcome.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let frontend = &state.config.frontend_url;

    if params.error.is_some() {
        return redirect(&format!("{}/?auth=error", frontend));
    }
    let Some(code) = params.code else {
        return redirect(&format!("{}/?auth=missing_code", frontend));
    };

    match state.spotify.exchange_code(&code).await {
        Ok(tokens) => {
            let jar = session::set_auth_cookies(jar, &state.config, &tokens);
            (jar, redirect(&format!("{}/?auth=success", frontend))).into_response()
        }
        Err(err) => {
            tracing::warn!("authorization code exchange failed: {}", err);
            let jar = session::clear_auth_cookies(jar);
            (jar, redirect(&format!("{}/?auth=token_error", frontend))).into_response()
        }
    }
}

/// POST /auth/logout - drop the session cookies unconditionally.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (session::clear_auth_cookies(jar), Json(json!({ "ok": true })))
}

/// GET /api/auth/status - connection state plus the profile when reachable.
/// Provider failures degrade to disconnected rather than erroring.
pub async fn status(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, token) =
        session::get_valid_access_token(jar, &state.config, &state.spotify).await;
    let Some(token) = token else {
        return (jar, Json(json!({ "connected": false })));
    };

    match state.spotify.profile(&token).await {
        Ok(profile) => (
            jar,
            Json(json!({
                "connected": true,
                "profile": { "id": profile.id, "name": profile.display_name },
            })),
        ),
        Err(err) => {
            tracing::debug!("profile fetch failed: {}", err);
            (jar, Json(json!({ "connected": false })))
        }
    }
}

/// POST /api/playlists/from-mood - build a playlist from a mood's targets.
pub async fn create_playlist_from_mood(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<FromMoodRequest>,
) -> Response {
    let mood_key = request.mood.unwrap_or_default().to_lowercase();
    let Some(targets) = moods::mood_targets(&mood_key) else {
        return AppError::UnsupportedMood.into_response();
    };

    // Cookie mutations from a get-or-refresh must survive error responses,
    // so the jar rides alongside the outcome.
    let (jar, token) =
        session::get_valid_access_token(jar, &state.config, &state.spotify).await;
    let result = match token {
        None => Err(AppError::NotAuthenticated),
        Some(token) => playlist_flow(&state, targets, &mood_key, &token).await,
    };

    match result {
        Ok(response) => (jar, Json(response)).into_response(),
        Err(err) => (jar, err).into_response(),
    }
}

async fn playlist_flow(
    state: &AppState,
    targets: &MoodTargets,
    mood_key: &str,
    token: &str,
) -> Result<FromMoodResponse, AppError> {
    let spotify = &state.spotify;

    let me = spotify.profile(token).await.map_err(playlist_error)?;
    let tracks = spotify
        .recommendations(token, targets, RECOMMENDATION_LIMIT)
        .await
        .map_err(playlist_error)?;

    let uris: Vec<String> = tracks.into_iter().filter_map(|t| t.uri).collect();
    if uris.is_empty() {
        return Err(AppError::NoTracksFound);
    }

    let date = chrono::Local::now().format("%b %-d, %Y");
    let name = format!("{} Mood Mix ({})", moods::display_name(mood_key), date);
    let description = format!("Auto-generated by Moodify for a {} vibe", mood_key);

    let playlist = spotify
        .create_playlist(token, &me.id, &name, &description)
        .await
        .map_err(playlist_error)?;
    spotify
        .add_playlist_tracks(token, &playlist.id, &uris)
        .await
        .map_err(playlist_error)?;

    tracing::info!(
        "created playlist {} with {} tracks for mood {}",
        playlist.id,
        uris.len(),
        mood_key
    );

    Ok(FromMoodResponse {
        ok: true,
        playlist: PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            url: playlist.external_urls.spotify,
        },
        tracks_added: uris.len(),
    })
}

fn playlist_error(err: crate::spotify::SpotifyError) -> AppError {
    AppError::upstream("Failed to create playlist", err)
}

/// Build the API router. Auth routes answer on both the bare and
/// `/api`-prefixed paths so the service works with or without a proxy prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/auth/login", get(login))
        .route("/api/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/api/auth/callback", get(callback))
        .route("/auth/logout", post(logout))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/status", get(status))
        .route("/api/playlists/from-mood", post(create_playlist_from_mood))
}

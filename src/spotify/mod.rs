//! Spotify Web API client.
//!
//! Token lifecycle uses the Authorization Code flow; the token endpoints
//! live in the `auth` submodule.

mod auth;

pub use auth::TokenResponse;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::moods::MoodTargets;

/// Spotify API client for per-user, Bearer-authenticated calls.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: String,
    accounts_url: String,
    api_url: String,
}

/// Failure talking to Spotify: transport errors, missing app credentials,
/// or a non-success response with its parsed body.
#[derive(Debug)]
pub enum SpotifyError {
    MissingCredentials,
    Request(reqwest::Error),
    Api {
        status: u16,
        body: serde_json::Value,
    },
}

impl std::fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpotifyError::MissingCredentials => {
                write!(f, "missing SPOTIFY_CLIENT_ID or SPOTIFY_CLIENT_SECRET")
            }
            SpotifyError::Request(err) => write!(f, "request failed: {}", err),
            SpotifyError::Api { status, .. } => {
                write!(f, "Spotify API returned status {}", status)
            }
        }
    }
}

impl std::error::Error for SpotifyError {}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Request(err)
    }
}

impl SpotifyError {
    /// Upstream detail payload attached to 500-class responses.
    pub fn details(&self) -> serde_json::Value {
        match self {
            SpotifyError::Api { body, .. } => body.clone(),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

/// Decode a success body, or capture the status and error body.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    res: reqwest::Response,
) -> Result<T, SpotifyError> {
    if !res.status().is_success() {
        let status = res.status().as_u16();
        let body = res
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);
        return Err(SpotifyError::Api { status, body });
    }
    Ok(res.json::<T>().await?)
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            accounts_url: config.accounts_url.clone(),
            api_url: config.api_url.clone(),
        }
    }

    async fn api_get<T: DeserializeOwned>(
        &self,
        token: &str,
        path_and_query: &str,
    ) -> Result<T, SpotifyError> {
        let res = self
            .http
            .get(format!("{}{}", self.api_url, path_and_query))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;
        parse_response(res).await
    }

    async fn api_post<T: DeserializeOwned, B: Serialize>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> Result<T, SpotifyError> {
        let res = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .header("Authorization", format!("Bearer {}", token))
            .json(body)
            .send()
            .await?;
        parse_response(res).await
    }

    /// GET /me - profile of the token's user.
    pub async fn profile(&self, token: &str) -> Result<Profile, SpotifyError> {
        self.api_get(token, "/me").await
    }

    /// GET /recommendations - tracks matching a mood's targets.
    pub async fn recommendations(
        &self,
        token: &str,
        targets: &MoodTargets,
        limit: u32,
    ) -> Result<Vec<RecommendedTrack>, SpotifyError> {
        let mut query = format!(
            "/recommendations?seed_genres={}&target_valence={}&target_energy={}&limit={}",
            urlencoding::encode(targets.seed_genres),
            targets.target_valence,
            targets.target_energy,
            limit,
        );
        if let Some(danceability) = targets.target_danceability {
            query.push_str(&format!("&target_danceability={}", danceability));
        }
        if let Some(instrumentalness) = targets.target_instrumentalness {
            query.push_str(&format!("&target_instrumentalness={}", instrumentalness));
        }

        let body: Recommendations = self.api_get(token, &query).await?;
        Ok(body.tracks)
    }

    /// POST /users/{user_id}/playlists - create a private playlist.
    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, SpotifyError> {
        let path = format!("/users/{}/playlists", urlencoding::encode(user_id));
        self.api_post(
            token,
            &path,
            &serde_json::json!({
                "name": name,
                "description": description,
                "public": false,
            }),
        )
        .await
    }

    /// POST /playlists/{playlist_id}/tracks - append tracks by URI.
    pub async fn add_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        let path = format!("/playlists/{}/tracks", urlencoding::encode(playlist_id));
        let _: serde_json::Value = self
            .api_post(token, &path, &serde_json::json!({ "uris": uris }))
            .await?;
        Ok(())
    }
}

/// Current user, as returned by GET /me.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
struct Recommendations {
    #[serde(default)]
    tracks: Vec<RecommendedTrack>,
}

/// A recommended track; only the URI matters for playlist insertion.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendedTrack {
    #[serde(default)]
    pub uri: Option<String>,
}

/// A playlist, as returned on creation.
#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

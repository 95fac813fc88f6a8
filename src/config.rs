use std::env;

use axum_extra::extract::cookie::SameSite;

/// Application configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub frontend_url: String,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub redirect_uri: String,
    pub accounts_url: String,
    pub api_url: String,
    pub production: bool,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let spotify_client_id = env::var("SPOTIFY_CLIENT_ID").ok();
        let spotify_client_secret = env::var("SPOTIFY_CLIENT_SECRET").ok();
        if spotify_client_id.is_none() || spotify_client_secret.is_none() {
            tracing::warn!(
                "missing Spotify credentials; set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET \
                 before running the auth flow"
            );
        }

        let redirect_uri = env::var("SPOTIFY_REDIRECT_URI")
            .unwrap_or_else(|_| format!("http://localhost:{}/auth/callback", port));

        let accounts_url = env::var("SPOTIFY_ACCOUNTS_URL")
            .unwrap_or_else(|_| "https://accounts.spotify.com".to_string());

        let api_url = env::var("SPOTIFY_API_URL")
            .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string());

        let production = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let cookie_secure = env::var("COOKIE_SECURE")
            .ok()
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(production);

        // Cross-site cookies need SameSite=None behind a separate frontend origin.
        let cookie_same_site = env::var("COOKIE_SAME_SITE")
            .ok()
            .and_then(|v| parse_same_site(&v))
            .unwrap_or(if production { SameSite::None } else { SameSite::Lax });

        Ok(Self {
            port,
            frontend_url,
            spotify_client_id,
            spotify_client_secret,
            redirect_uri,
            accounts_url,
            api_url,
            production,
            cookie_secure,
            cookie_same_site,
        })
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "none" => Some(SameSite::None),
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        _ => None,
    }
}

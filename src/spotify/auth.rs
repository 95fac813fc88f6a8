//! OAuth 2.0 Authorization Code operations against the accounts host.

use base64::Engine;
use serde::Deserialize;

use super::{parse_response, SpotifyClient, SpotifyError};

const SCOPES: &str = "user-read-private playlist-modify-public playlist-modify-private";

/// Token endpoint response. `refresh_token` is absent on some refresh
/// grants; callers keep the previous one in that case.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl SpotifyClient {
    /// The provider authorization URL the login endpoint redirects to.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize?response_type=code&client_id={}&scope={}&redirect_uri={}&show_dialog=true",
            self.accounts_url,
            urlencoding::encode(self.client_id.as_deref().unwrap_or("")),
            urlencoding::encode(SCOPES),
            urlencoding::encode(&self.redirect_uri),
        )
    }

    /// Exchange a one-time authorization code for a token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, SpotifyError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    /// Obtain a fresh access token from a refresh token.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, SpotifyError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse, SpotifyError> {
        let auth = self.basic_auth()?;
        let res = self
            .http
            .post(format!("{}/api/token", self.accounts_url))
            .header("Authorization", auth)
            .form(params)
            .send()
            .await?;
        parse_response(res).await
    }

    fn basic_auth(&self) -> Result<String, SpotifyError> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", id, secret));
                Ok(format!("Basic {}", credentials))
            }
            _ => Err(SpotifyError::MissingCredentials),
        }
    }
}
